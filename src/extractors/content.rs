// src/extractors/content.rs

use crate::extractors::section::{
    self, Conclusion, ExtractionResult, Introduction, Methodology, Results,
};
use crate::utils::error::ExtractError;
use std::path::{Path, PathBuf};

/// Reports above this size are refused unless a caller raises the limit.
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 16 * 1024 * 1024;

/// The full text of one LaTeX source file, loaded once.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    content: String,
}

impl Document {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        Self::open_with_limit(path, DEFAULT_MAX_INPUT_BYTES)
    }

    /// Reads the file at `path`; invalid UTF-8 sequences are dropped.
    pub fn open_with_limit<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<Self, ExtractError> {
        let path = path.as_ref().to_path_buf();

        let size = match std::fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => metadata.len(),
            _ => return Err(ExtractError::NotFound(path)),
        };
        if size > max_bytes {
            return Err(ExtractError::InputTooLarge { path, size, limit: max_bytes });
        }

        let bytes = std::fs::read(&path).map_err(|source| ExtractError::Io {
            path: path.clone(),
            source,
        })?;
        let content = decode_dropping_invalid(&bytes);
        tracing::debug!("Loaded {} ({} bytes)", path.display(), content.len());

        Ok(Self { path, content })
    }

    pub fn from_text<P: Into<PathBuf>, S: Into<String>>(path: P, content: S) -> Self {
        Self { path: path.into(), content: content.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

fn decode_dropping_invalid(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// Extracts presentation content from one LaTeX report.
pub struct ContentExtractor {
    document: Document,
}

impl ContentExtractor {
    /// Opens the report; fails with [`ExtractError::NotFound`] if the path is
    /// not a readable file.
    pub fn new<P: AsRef<Path>>(report_path: P) -> Result<Self, ExtractError> {
        Ok(Self::from_document(Document::open(report_path)?))
    }

    pub fn with_limit<P: AsRef<Path>>(report_path: P, max_bytes: u64) -> Result<Self, ExtractError> {
        Ok(Self::from_document(Document::open_with_limit(report_path, max_bytes)?))
    }

    pub fn from_document(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn report_path(&self) -> &Path {
        self.document.path()
    }

    pub fn extract_introduction(&self) -> Result<Option<Introduction>, ExtractError> {
        section::extract_introduction(self.document.content())
    }

    pub fn extract_objectives(&self) -> Result<Vec<String>, ExtractError> {
        section::extract_objectives(self.document.content())
    }

    pub fn extract_methodology(&self) -> Result<Option<Methodology>, ExtractError> {
        section::extract_methodology(self.document.content())
    }

    pub fn extract_results(&self) -> Result<Option<Results>, ExtractError> {
        section::extract_results(self.document.content())
    }

    pub fn extract_conclusion(&self) -> Result<Option<Conclusion>, ExtractError> {
        section::extract_conclusion(self.document.content())
    }

    /// Runs all five pipelines. Never fails: a pipeline that errors is logged
    /// and contributes its empty value while the others still run.
    pub fn extract_for_presentation(&self) -> ExtractionResult {
        let result = ExtractionResult {
            introduction: self.degrade("introduction", self.extract_introduction()),
            objectives: self.degrade("objectives", self.extract_objectives()),
            methodology: self.degrade("methodology", self.extract_methodology()),
            results: self.degrade("results", self.extract_results()),
            conclusion: self.degrade("conclusion", self.extract_conclusion()),
        };
        tracing::info!(
            "Extracted sections {:?} from {}",
            result.found_sections(),
            self.report_path().display()
        );
        result
    }

    fn degrade<T: Default>(&self, section: &str, outcome: Result<T, ExtractError>) -> T {
        outcome.unwrap_or_else(|e| {
            tracing::warn!(
                "Extraction of '{}' failed for {}: {}",
                section,
                self.report_path().display(),
                e
            );
            T::default()
        })
    }
}

/// Opens and extracts in one call. `None` means extraction is unavailable and
/// the caller should fall back to placeholder content.
pub fn extract_content_from_report<P: AsRef<Path>>(report_path: P) -> Option<ExtractionResult> {
    extract_content_with_limit(report_path, DEFAULT_MAX_INPUT_BYTES)
}

pub fn extract_content_with_limit<P: AsRef<Path>>(
    report_path: P,
    max_bytes: u64,
) -> Option<ExtractionResult> {
    let report_path = report_path.as_ref();
    match ContentExtractor::with_limit(report_path, max_bytes) {
        Ok(extractor) => Some(extractor.extract_for_presentation()),
        Err(e) => {
            tracing::warn!("Content extraction failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_REPORT: &str = r"
\documentclass{article}
\begin{document}

\section{Introduction}
This project addresses an important problem.

\subsection{Motivation}
The motivation for this work is clear.

\subsection{Problem Statement}
The problem we are solving is significant.

\section{Objectives}
\begin{itemize}
    \item First objective
    \item Second objective
\end{itemize}

\section{Methodology}
Our approach involves several steps.

\subsection{Technologies}
\begin{itemize}
    \item Python
    \item LaTeX
\end{itemize}

\section{Results}
We achieved significant results.

\section{Conclusion}
In conclusion, this work was successful.

\end{document}
";

    fn write_report(content: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".tex")
            .tempfile()
            .expect("create temp report");
        file.write_all(content).expect("write temp report");
        file
    }

    #[test]
    fn test_initialization() {
        let report = write_report(SAMPLE_REPORT.as_bytes());
        let extractor = ContentExtractor::new(report.path()).unwrap();
        assert_eq!(extractor.report_path(), report.path());
        assert_eq!(extractor.document().content(), SAMPLE_REPORT);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = ContentExtractor::new("nonexistent.tex").err().unwrap();
        assert!(matches!(err, ExtractError::NotFound(_)));
    }

    #[test]
    fn test_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(Document::open(dir.path()), Err(ExtractError::NotFound(_))));
    }

    #[test]
    fn test_input_size_limit() {
        let report = write_report(SAMPLE_REPORT.as_bytes());
        let err = Document::open_with_limit(report.path(), 16).unwrap_err();
        assert!(matches!(err, ExtractError::InputTooLarge { limit: 16, .. }));
        assert!(extract_content_with_limit(report.path(), 16).is_none());
    }

    #[test]
    fn test_invalid_utf8_is_dropped() {
        let report = write_report(b"\\section{Intro\xffduction}\nCaf\xc3\xa9 \xfe\xfetext");
        let document = Document::open(report.path()).unwrap();
        assert_eq!(document.content(), "\\section{Introduction}\nCafé text");
    }

    #[test]
    fn test_extract_for_presentation_full_report() {
        let report = write_report(SAMPLE_REPORT.as_bytes());
        let extracted = ContentExtractor::new(report.path()).unwrap().extract_for_presentation();

        let intro = extracted.introduction.as_ref().unwrap();
        assert_eq!(intro.motivation, "The motivation for this work is clear.");
        assert_eq!(intro.problem_statement, "The problem we are solving is significant.");
        assert_eq!(extracted.objectives, vec!["First objective", "Second objective"]);

        let method = extracted.methodology.as_ref().unwrap();
        assert_eq!(method.overview, "Our approach involves several steps.");
        assert_eq!(method.technologies, vec!["Python", "LaTeX"]);

        let results = extracted.results.as_ref().unwrap();
        assert!(results.implementation.is_empty());
        assert_eq!(results.evaluation, "We achieved significant results.");

        let conclusion = extracted.conclusion.as_ref().unwrap();
        assert_eq!(conclusion.summary, "In conclusion, this work was successful.");
        assert!(conclusion.future_work.is_empty());

        assert_eq!(extracted.found_sections(), section::SECTION_NAMES.to_vec());
    }

    #[test]
    fn test_convenience_entry_point() {
        let report = write_report(b"\\section{Introduction}\nContent");
        let extracted = extract_content_from_report(report.path()).unwrap();
        assert_eq!(extracted.introduction.unwrap().motivation, "Content");
        assert!(extracted.objectives.is_empty());
        assert_eq!(extracted.methodology, None);
    }

    #[test]
    fn test_convenience_entry_point_missing_file_is_none() {
        assert!(extract_content_from_report("nonexistent.tex").is_none());
    }

    #[test]
    fn test_failed_pipeline_degrades_to_empty_value() {
        let extractor = ContentExtractor::from_document(Document::from_text("inline.tex", ""));
        let pattern_error = || ExtractError::Pattern("environment 'abstract': too big".to_string());

        let methodology: Option<Methodology> = extractor.degrade("methodology", Err(pattern_error()));
        assert_eq!(methodology, None);
        let objectives: Vec<String> = extractor.degrade("objectives", Err(pattern_error()));
        assert!(objectives.is_empty());
    }

    #[test]
    fn test_failed_pipeline_leaves_others_populated() {
        let report = write_report(SAMPLE_REPORT.as_bytes());
        let extractor = ContentExtractor::new(report.path()).unwrap();
        let result = ExtractionResult {
            introduction: extractor.degrade("introduction", Err(ExtractError::Pattern("boom".to_string()))),
            objectives: extractor.degrade("objectives", extractor.extract_objectives()),
            methodology: extractor.degrade("methodology", extractor.extract_methodology()),
            results: extractor.degrade("results", extractor.extract_results()),
            conclusion: extractor.degrade("conclusion", extractor.extract_conclusion()),
        };
        assert_eq!(result.introduction, None);
        assert_eq!(result.found_sections(), vec!["objectives", "methodology", "results", "conclusion"]);
        assert_eq!(result.section("introduction"), Some(serde_json::json!({})));
    }

    #[test]
    fn test_from_text_needs_no_file() {
        let document = Document::from_text("inline.tex", "\\section{Conclusion}\nWrapped up.");
        let extractor = ContentExtractor::from_document(document);
        let conclusion = extractor.extract_conclusion().unwrap().unwrap();
        assert_eq!(conclusion.summary, "Wrapped up.");
    }
}
