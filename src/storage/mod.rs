// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::extractors::ExtractionResult;
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// File stem used for a report's outputs, e.g. `thesis` for `thesis.tex`.
    pub fn report_stem(report_path: &Path) -> String {
        report_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| "report".to_string())
    }

    /// Saves the template context (`{"extracted_content": ...}`) as pretty JSON
    pub fn save_result(&self, stem: &str, result: &ExtractionResult) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}_extracted.json", stem));

        let body = serde_json::to_string_pretty(&result.to_template_context())
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, body)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved extracted content to {}", file_path.display());

        Ok(file_path)
    }

    /// Saves metadata about the extraction run in JSON format
    pub fn save_result_metadata(
        &self,
        report_path: &Path,
        stem: &str,
        result: &ExtractionResult,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}_extracted_meta.json", stem));

        let metadata = serde_json::json!({
            "report_path": report_path.display().to_string(),
            "sections_found": result.found_sections(),
            "objective_count": result.objectives.len(),
            "technology_count": result.methodology.as_ref().map_or(0, |m| m.technologies.len()),
            "future_work_count": result.conclusion.as_ref().map_or(0, |c| c.future_work.len()),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }
}
