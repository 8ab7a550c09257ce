// src/extractors/locator.rs

// --- Imports ---
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

// --- Constants ---
// Compiled size cap for per-call environment patterns built from caller input.
const ENVIRONMENT_PATTERN_SIZE_LIMIT: usize = 1 << 20;

// --- Regex Patterns (Lazy Static) ---
// A heading command with its title argument: `\section*[short]{Title}`.
// The title stops at the first `}`; nested braces are not balanced.
static HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(chapter|section|subsection)\*?\s*(?:\[[^\]]*\])?\s*\{([^}]*)\}")
        .expect("Failed to compile HEADING_RE")
});

// Anything that may close a block. Group 1 is absent for `\end{document}`.
static BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(chapter|section|subsection)\b|\\end\s*\{document\}")
        .expect("Failed to compile BOUNDARY_RE")
});

// --- Data Structures ---
/// Heading hierarchy level. Ordering follows the hierarchy: a chapter outranks a
/// section, which outranks a subsection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Subsection,
    Section,
    Chapter,
}

impl Rank {
    pub fn command(self) -> &'static str {
        match self {
            Rank::Subsection => "subsection",
            Rank::Section => "section",
            Rank::Chapter => "chapter",
        }
    }

    fn from_command(command: &str) -> Option<Self> {
        match command {
            "subsection" => Some(Rank::Subsection),
            "section" => Some(Rank::Section),
            "chapter" => Some(Rank::Chapter),
            _ => None,
        }
    }
}

/// A heading command found in the text, with byte offsets into that text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heading<'a> {
    pub rank: Rank,
    pub title: &'a str,
    /// Offset of the backslash that opens the command.
    pub start: usize,
    /// Offset right after the title argument's closing brace.
    pub body_start: usize,
}

/// Iterates over every chapter/section/subsection heading in document order.
pub fn headings(text: &str) -> impl Iterator<Item = Heading<'_>> + '_ {
    HEADING_RE.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let rank = Rank::from_command(caps.get(1)?.as_str())?;
        Some(Heading {
            rank,
            title: caps.get(2)?.as_str(),
            start: whole.start(),
            body_start: whole.end(),
        })
    })
}

/// Right boundary of a block of the given rank whose body starts at `from`:
/// the next heading of equal or higher rank, `\end{document}`, or end of input.
pub fn block_end(text: &str, from: usize, rank: Rank) -> usize {
    for caps in BOUNDARY_RE.captures_iter(&text[from..]) {
        let Some(whole) = caps.get(0) else { continue };
        let closes = match caps.get(1) {
            Some(command) => Rank::from_command(command.as_str()).is_some_and(|r| r >= rank),
            None => true,
        };
        if closes {
            return from + whole.start();
        }
    }
    text.len()
}

/// Finds the block under the first heading of `rank` titled `name`.
///
/// Exact title match is tried over all candidates before falling back to a
/// substring match; both are case-insensitive. An empty block counts as a miss.
fn find_heading<'a>(text: &'a str, rank: Rank, name: &str) -> Option<&'a str> {
    let wanted = name.trim().to_lowercase();
    let candidates: Vec<Heading<'a>> = headings(text).filter(|h| h.rank == rank).collect();

    let hit = candidates
        .iter()
        .find(|h| h.title.trim().to_lowercase() == wanted)
        .or_else(|| candidates.iter().find(|h| h.title.to_lowercase().contains(&wanted)));

    let Some(hit) = hit else {
        tracing::trace!("No \\{} titled '{}'", rank.command(), name);
        return None;
    };

    let end = block_end(text, hit.body_start, rank);
    let block = strip_title_overflow(text[hit.body_start..end].trim(), hit.title);
    tracing::trace!(
        "Located \\{}{{{}}} for '{}' ({} bytes)",
        rank.command(),
        hit.title,
        name,
        block.len()
    );
    (!block.is_empty()).then_some(block)
}

// A title with nested braces stops at its first `}`, leaving the rest of the
// title's closing braces at the head of the block.
fn strip_title_overflow<'a>(block: &'a str, title: &str) -> &'a str {
    let unclosed = title.matches('{').count().saturating_sub(title.matches('}').count());
    let mut rest = block;
    for _ in 0..unclosed {
        match rest.strip_prefix('}') {
            Some(tail) => rest = tail,
            None => break,
        }
    }
    rest.trim_start()
}

pub fn find_section<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    find_heading(text, Rank::Section, name)
}

pub fn find_subsection<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    find_heading(text, Rank::Subsection, name)
}

pub fn find_chapter<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    find_heading(text, Rank::Chapter, name)
}

/// Body of the first `\begin{env}...\end{env}` pair. Not nesting-aware and not
/// rank-aware; the environment name is matched case-sensitively.
pub fn find_environment<'a>(text: &'a str, env_name: &str) -> Result<Option<&'a str>, ExtractError> {
    let name = regex::escape(env_name.trim());
    let pattern = format!(r"(?s)\\begin\s*\{{{name}\}}(.*?)\\end\s*\{{{name}\}}");
    let re = RegexBuilder::new(&pattern)
        .size_limit(ENVIRONMENT_PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| ExtractError::Pattern(format!("environment '{}': {}", env_name, e)))?;

    Ok(re
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|body| !body.is_empty()))
}

// --- Fallback Chains ---
/// One step of a fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    Section(&'static str),
    Subsection(&'static str),
    Chapter(&'static str),
    Environment(&'static str),
}

impl Locator {
    pub fn locate<'a>(&self, text: &'a str) -> Result<Option<&'a str>, ExtractError> {
        match *self {
            Locator::Section(name) => Ok(find_section(text, name)),
            Locator::Subsection(name) => Ok(find_subsection(text, name)),
            Locator::Chapter(name) => Ok(find_chapter(text, name)),
            Locator::Environment(name) => find_environment(text, name),
        }
    }
}

/// Tries each locator in order and returns the first that finds a block,
/// together with the locator that won.
pub fn resolve_chain<'a>(
    text: &'a str,
    chain: &[Locator],
) -> Result<Option<(Locator, &'a str)>, ExtractError> {
    for locator in chain {
        if let Some(block) = locator.locate(text)? {
            tracing::debug!("Fallback chain resolved by {:?}", locator);
            return Ok(Some((*locator, block)));
        }
        tracing::trace!("{:?} missed, trying next fallback", locator);
    }
    Ok(None)
}
