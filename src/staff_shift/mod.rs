pub mod conflicts;
pub mod shift;
pub mod summarize_shifts;
