// src/utils/debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::extractors::locator::{self, Rank};
use crate::extractors::Document;
use crate::utils::error::AppError;

/// Renders every heading the locator sees, indented by rank, with the byte
/// offset of the command and the length of the block it opens.
pub fn render_outline(document: &Document) -> String {
    let text = document.content();
    let mut outline = format!("Outline of {}\n", document.path().display());

    let mut count = 0;
    for heading in locator::headings(text) {
        let indent = match heading.rank {
            Rank::Chapter => "",
            Rank::Section => "  ",
            Rank::Subsection => "    ",
        };
        let end = locator::block_end(text, heading.body_start, heading.rank);
        outline.push_str(&format!(
            "{}\\{}{{{}}} @{} ({} bytes)\n",
            indent,
            heading.rank.command(),
            heading.title,
            heading.start,
            end - heading.body_start
        ));
        count += 1;
    }

    if count == 0 {
        outline.push_str("(no chapter/section/subsection headings)\n");
    }

    let abstract_found = matches!(locator::find_environment(text, "abstract"), Ok(Some(_)));
    outline.push_str(&format!("abstract environment: {}\n", if abstract_found { "yes" } else { "no" }));
    outline
}

/// Saves the heading outline of a document for diagnosing missed sections.
pub fn save_debug_outline(document: &Document, filename: &Path) -> Result<(), AppError> {
    let mut file = File::create(filename)?;
    file.write_all(render_outline(document).as_bytes())?;

    tracing::info!("Saved debug outline to {}", filename.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_lists_headings_by_rank() {
        let doc = Document::from_text(
            "report.tex",
            "\\chapter{Intro}\nA\n\\section{Scope}\nBB\n\\subsection{Limits}\nCCC\n\\chapter{End}",
        );
        let outline = render_outline(&doc);
        assert!(outline.starts_with("Outline of report.tex\n"));
        assert!(outline.contains("\\chapter{Intro} @0 ("));
        assert!(outline.contains("\n  \\section{Scope} @"));
        assert!(outline.contains("\n    \\subsection{Limits} @"));
        assert!(outline.contains("\\subsection{Limits} @") && outline.contains("(5 bytes)"));
        assert!(outline.ends_with("abstract environment: no\n"));
    }

    #[test]
    fn test_outline_without_headings() {
        let doc = Document::from_text("a.tex", "\\begin{abstract}x\\end{abstract}");
        let outline = render_outline(&doc);
        assert!(outline.contains("(no chapter/section/subsection headings)"));
        assert!(outline.ends_with("abstract environment: yes\n"));
    }

    #[test]
    fn test_save_debug_outline() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("outline.txt");
        let doc = Document::from_text("a.tex", "\\section{Only}\nbody");
        save_debug_outline(&doc, &target).unwrap();
        let saved = std::fs::read_to_string(&target).unwrap();
        assert!(saved.contains("\\section{Only}"));
    }
}
