pub mod base_map;
