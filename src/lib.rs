// src/lib.rs
//! Best-effort extraction of presentation content from LaTeX reports.
//!
//! [`extract_content_from_report`] is the entry point for report generators:
//! it returns `None` when nothing can be extracted, and otherwise an
//! [`ExtractionResult`] keyed by the five presentation sections.
pub mod extractors;
pub mod storage;
pub mod utils;

pub use extractors::{extract_content_from_report, ContentExtractor, Document, ExtractionResult};
pub use utils::error::{AppError, ExtractError, StorageError};
