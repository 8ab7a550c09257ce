// src/extractors/mod.rs
pub mod cleaner;
pub mod content;
pub mod lists;
pub mod locator;
pub mod section;

// Re-export key extraction types for convenience
pub use content::{
    extract_content_from_report,
    extract_content_with_limit,
    ContentExtractor,
    Document,
    DEFAULT_MAX_INPUT_BYTES,
};
pub use section::{
    Conclusion,
    ExtractionResult,
    Introduction,
    Methodology,
    Results,
    SECTION_NAMES,
};
