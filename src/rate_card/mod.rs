pub mod card;
pub mod pricing_preview;
