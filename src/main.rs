// src/main.rs
use clap::Parser;
use std::path::{Path, PathBuf};
use tex_extract::extractors::{ContentExtractor, ExtractionResult, DEFAULT_MAX_INPUT_BYTES, SECTION_NAMES};
use tex_extract::storage::StorageManager;
use tex_extract::utils::{self, debug, AppError};

const MAX_INPUT_BYTES_ENV: &str = "TEX_EXTRACT_MAX_INPUT_BYTES";

/// Extract presentation content from LaTeX reports
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// LaTeX report files (proposal.tex, main.tex, ...)
    #[arg(required = true)]
    reports: Vec<PathBuf>,

    /// Output directory for extracted content
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Only print this section (introduction, objectives, methodology, results, conclusion); needs --print
    #[arg(short, long, requires = "print")]
    section: Option<String>,

    /// Print the extracted content as JSON on stdout
    #[arg(long)]
    print: bool,

    /// Debug mode - verbose logging and a heading outline per report
    #[arg(short, long)]
    debug: bool,

    /// Refuse reports larger than this many bytes (default: 16 MiB)
    #[arg(long)]
    max_input_bytes: Option<u64>,
}

/// CLI value first, then the environment, then the built-in default.
fn resolve_max_input_bytes(cli_value: Option<u64>, env_value: Option<String>) -> Result<u64, AppError> {
    if let Some(limit) = cli_value {
        tracing::debug!("Using max input size {} from command-line argument", limit);
        return Ok(limit);
    }
    match env_value {
        Some(raw) => {
            let limit = raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!("{} must be a byte count, got '{}'", MAX_INPUT_BYTES_ENV, raw))
            })?;
            tracing::debug!("Using max input size {} from {}", limit, MAX_INPUT_BYTES_ENV);
            Ok(limit)
        }
        None => Ok(DEFAULT_MAX_INPUT_BYTES),
    }
}

fn validate_section(name: &str) -> Result<&'static str, AppError> {
    let wanted = name.trim().to_lowercase();
    SECTION_NAMES
        .iter()
        .copied()
        .find(|known| *known == wanted)
        .ok_or_else(|| {
            AppError::Config(format!(
                "Unknown section '{}', expected one of: {}",
                name,
                SECTION_NAMES.join(", ")
            ))
        })
}

fn resolve_report_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn extract_one(report: &Path, max_input_bytes: u64, debug_dir: Option<&Path>) -> Result<ExtractionResult, AppError> {
    let extractor = ContentExtractor::with_limit(report, max_input_bytes)?;

    if let Some(dir) = debug_dir {
        let outline_path = dir.join(format!("{}_outline.txt", StorageManager::report_stem(report)));
        if let Err(e) = debug::save_debug_outline(extractor.document(), &outline_path) {
            tracing::warn!("Failed to create debug outline: {}", e);
        }
    }

    Ok(extractor.extract_for_presentation())
}

/// Extracts every report on the blocking pool; outcomes keep input order.
async fn extract_reports(
    reports: Vec<PathBuf>,
    max_input_bytes: u64,
    debug_dir: Option<PathBuf>,
) -> Vec<(PathBuf, Result<ExtractionResult, AppError>)> {
    let tasks: Vec<_> = reports
        .into_iter()
        .map(|report| {
            let path = report.clone();
            let debug_dir = debug_dir.clone();
            let handle = tokio::task::spawn_blocking(move || {
                extract_one(&path, max_input_bytes, debug_dir.as_deref())
            });
            (report, handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(tasks.len());
    for (report, handle) in tasks {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(AppError::Processing(format!(
                "Extraction task for {} aborted: {}",
                report.display(),
                e
            ))),
        };
        outcomes.push((report, outcome));
    }
    outcomes
}

fn print_result(result: &ExtractionResult, section: Option<&str>) -> Result<(), AppError> {
    let value = match section {
        Some(name) => result.section(name).unwrap_or_else(|| serde_json::json!({})),
        None => result.to_template_context(),
    };
    let rendered = serde_json::to_string_pretty(&value)
        .map_err(|e| AppError::Processing(format!("Failed to render JSON: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging(args.debug);
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Resolve configuration
    let max_input_bytes = resolve_max_input_bytes(args.max_input_bytes, std::env::var(MAX_INPUT_BYTES_ENV).ok())?;
    let section = args.section.as_deref().map(validate_section).transpose()?;

    // 4. Initialize storage
    let storage = StorageManager::new(&args.output_dir)?;
    let debug_dir = if args.debug {
        let dir = storage.base_dir().join("debug");
        std::fs::create_dir_all(&dir)?;
        Some(dir)
    } else {
        None
    };

    // 5. Extract every report
    let reports: Vec<PathBuf> = args.reports.iter().map(|p| resolve_report_path(p)).collect();
    tracing::info!("Extracting content from {} report(s)", reports.len());
    let outcomes = extract_reports(reports, max_input_bytes, debug_dir).await;

    // 6. Store results
    let mut success_count = 0;
    let mut failure_count = 0;

    for (report, outcome) in outcomes {
        match outcome {
            Ok(result) => {
                success_count += 1;
                let stem = StorageManager::report_stem(&report);

                if args.print {
                    print_result(&result, section)?;
                }

                match storage.save_result(&stem, &result) {
                    Ok(path) => tracing::info!("Saved extracted content to: {}", path.display()),
                    Err(e) => tracing::error!("Failed to save extracted content: {}", e),
                }

                match storage.save_result_metadata(&report, &stem, &result) {
                    Ok(path) => tracing::info!("Saved extraction metadata to: {}", path.display()),
                    Err(e) => tracing::error!("Failed to save extraction metadata: {}", e),
                }
            }
            Err(e) => {
                tracing::error!("Failed to extract content from {}: {}", report.display(), e);
                failure_count += 1;
            }
        }
    }

    tracing::info!("Processing finished. Success: {}, Failures: {}", success_count, failure_count);

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!(
            "Failed to extract content from any of {} report(s)",
            failure_count
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tex_extract::ExtractError;

    #[test]
    fn test_max_input_bytes_precedence() {
        assert_eq!(resolve_max_input_bytes(Some(10), Some("20".to_string())).unwrap(), 10);
        assert_eq!(resolve_max_input_bytes(None, Some(" 20 ".to_string())).unwrap(), 20);
        assert_eq!(resolve_max_input_bytes(None, None).unwrap(), DEFAULT_MAX_INPUT_BYTES);
        assert!(matches!(
            resolve_max_input_bytes(None, Some("lots".to_string())),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_validate_section() {
        assert_eq!(validate_section("Methodology").unwrap(), "methodology");
        assert!(matches!(validate_section("appendix"), Err(AppError::Config(_))));
    }

    #[test]
    fn test_section_requires_print() {
        let err = Args::try_parse_from(["tex_extract", "--section", "objectives", "a.tex"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let args = Args::try_parse_from(["tex_extract", "--print", "-s", "objectives", "a.tex"]).unwrap();
        assert_eq!(args.section.as_deref(), Some("objectives"));
        assert!(args.print);
    }

    #[test]
    fn test_resolve_report_path_is_absolute() {
        assert!(resolve_report_path(Path::new("report.tex")).is_absolute());
    }

    #[tokio::test]
    async fn test_extract_reports_keeps_order_and_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.tex");
        std::fs::write(&good, "\\section{Conclusion}\nAll good.").unwrap();
        let missing = dir.path().join("missing.tex");
        let debug_dir = dir.path().join("debug");
        std::fs::create_dir_all(&debug_dir).unwrap();

        let outcomes = extract_reports(
            vec![missing.clone(), good.clone()],
            DEFAULT_MAX_INPUT_BYTES,
            Some(debug_dir.clone()),
        )
        .await;

        assert_eq!(outcomes[0].0, missing);
        assert!(matches!(
            outcomes[0].1,
            Err(AppError::Extraction(ExtractError::NotFound(_)))
        ));
        assert_eq!(outcomes[1].0, good);
        let result = outcomes[1].1.as_ref().unwrap();
        assert_eq!(result.conclusion.as_ref().unwrap().summary, "All good.");
        assert!(debug_dir.join("good_outline.txt").is_file());
    }
}
