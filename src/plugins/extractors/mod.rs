// Extractor plugin implementations
pub mod otto;
pub mod payload;
pub mod price_tag;

pub use otto::OttoExtractor;
pub use price_tag::PriceTagExtractor;
