// src/extractors/cleaner.rs

use once_cell::sync::Lazy;
use regex::Regex;

// --- Cleanup Rules (Lazy Static) ---
// Applied strictly in order: later rules assume earlier ones already fired.
// Arguments are matched with `[^}]+`, so a nested `}` ends the argument early.
static CLEANUP_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        // 1. Citations
        (r"\\cite\{[^}]+\}", ""),
        (r"\\cite[pt]?\{[^}]+\}", ""),
        // 2. Cross-references and labels
        (r"\\ref\{[^}]+\}", ""),
        (r"\\label\{[^}]+\}", ""),
        // 3. Formatting wrappers, one command per pass
        (r"\\textbf\{([^}]+)\}", "$1"),
        (r"\\textit\{([^}]+)\}", "$1"),
        (r"\\emph\{([^}]+)\}", "$1"),
        (r"\\texttt\{([^}]+)\}", "$1"),
        // 4. Links
        (r"\\url\{[^}]+\}", ""),
        (r"\\href\{[^}]+\}\{([^}]+)\}", "$1"),
        // 5. Line comments
        (r"(?m)%.*$", ""),
        // 6. Graphics, figures and tables
        (r"\\includegraphics.*?\{[^}]+\}", ""),
        (r"(?s)\\begin\{figure\}.*?\\end\{figure\}", ""),
        (r"(?s)\\begin\{table\}.*?\\end\{table\}", ""),
    ]
    .iter()
    .map(|(pat, rep)| {
        (
            Regex::new(pat).expect("Failed to compile LaTeX cleanup pattern"),
            *rep,
        )
    })
    .collect()
});

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE"));

/// Strips LaTeX markup from a fragment, leaving readable prose.
///
/// Total: a rule whose pattern is absent is a no-op. Whitespace runs collapse
/// to a single space and the result is trimmed.
pub fn clean_latex(text: &str) -> String {
    let mut cleaned = text.to_string();
    for (re, replacement) in CLEANUP_RULES.iter() {
        // Cow::Borrowed means nothing matched, skip the reallocation
        if let std::borrow::Cow::Owned(next) = re.replace_all(&cleaned, *replacement) {
            cleaned = next;
        }
    }
    WHITESPACE_RE.replace_all(&cleaned, " ").trim().to_string()
}
