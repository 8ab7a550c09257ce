// src/extractors/section.rs

// --- Imports ---
use crate::extractors::cleaner::clean_latex;
use crate::extractors::lists::{extract_first_paragraph, extract_items, take_items};
use crate::extractors::locator::{find_subsection, resolve_chain, Locator};
use crate::utils::error::ExtractError;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// --- Constants ---
const MOTIVATION_MAX_CHARS: usize = 400;
const PROBLEM_STATEMENT_MAX_CHARS: usize = 300;
const OVERVIEW_MAX_CHARS: usize = 400;
const EVALUATION_MAX_CHARS: usize = 300;
const SUMMARY_MAX_CHARS: usize = 400;

const MAX_OBJECTIVES: usize = 5;
const MAX_APPROACHES: usize = 3;
const MAX_TECHNOLOGIES: usize = 5;
const MAX_IMPLEMENTATION_ITEMS: usize = 4;
const MAX_FUTURE_WORK_ITEMS: usize = 4;

/// Keys of an [`ExtractionResult`], in presentation order.
pub const SECTION_NAMES: [&str; 5] = ["introduction", "objectives", "methodology", "results", "conclusion"];

// --- Fallback Chains ---
// Each chain stops at the first locator that finds a non-empty block.
pub const INTRODUCTION_CHAIN: &[Locator] = &[
    Locator::Section("Introduction"),
    Locator::Chapter("Introduction"),
    Locator::Environment("abstract"),
];

pub const OBJECTIVES_CHAIN: &[Locator] = &[
    Locator::Section("Objectives"),
    Locator::Subsection("Objectives"),
    Locator::Section("Research Objectives"),
    Locator::Section("Project Objectives"),
    Locator::Section("Goals"),
];

pub const METHODOLOGY_CHAIN: &[Locator] = &[
    Locator::Section("Methodology"),
    Locator::Chapter("Methodology"),
    Locator::Section("Proposed Solution"),
    Locator::Section("Approach"),
    Locator::Section("Design"),
    Locator::Section("Implementation"),
];

pub const RESULTS_CHAIN: &[Locator] = &[
    Locator::Section("Results"),
    Locator::Chapter("Results"),
    Locator::Section("Implementation"),
    Locator::Section("Evaluation"),
    Locator::Section("Experiments"),
];

pub const CONCLUSION_CHAIN: &[Locator] = &[
    Locator::Section("Conclusion"),
    Locator::Chapter("Conclusion"),
];

// --- Data Structures ---
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Introduction {
    pub motivation: String,
    pub problem_statement: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Methodology {
    pub overview: String,
    pub approaches: Vec<String>,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Results {
    pub implementation: Vec<String>,
    pub evaluation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Conclusion {
    pub summary: String,
    pub future_work: Vec<String>,
}

/// Content extracted for all five presentation sections.
///
/// A section that was not found is `None` and serializes as `{}`, so the JSON
/// form always carries every key in [`SECTION_NAMES`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    #[serde(serialize_with = "empty_map_if_none")]
    pub introduction: Option<Introduction>,
    pub objectives: Vec<String>,
    #[serde(serialize_with = "empty_map_if_none")]
    pub methodology: Option<Methodology>,
    #[serde(serialize_with = "empty_map_if_none")]
    pub results: Option<Results>,
    #[serde(serialize_with = "empty_map_if_none")]
    pub conclusion: Option<Conclusion>,
}

impl ExtractionResult {
    /// The context a presentation template consults, keyed `extracted_content`.
    pub fn to_template_context(&self) -> serde_json::Value {
        serde_json::json!({ "extracted_content": self })
    }

    /// One section by name as JSON, `None` for an unknown name.
    pub fn section(&self, name: &str) -> Option<serde_json::Value> {
        let value = serde_json::to_value(self).ok()?;
        value.get(name).cloned()
    }

    /// Names of the sections that yielded any content.
    pub fn found_sections(&self) -> Vec<&'static str> {
        let found = [
            self.introduction.is_some(),
            !self.objectives.is_empty(),
            self.methodology.is_some(),
            self.results.is_some(),
            self.conclusion.is_some(),
        ];
        SECTION_NAMES
            .iter()
            .zip(found)
            .filter_map(|(name, hit)| hit.then_some(*name))
            .collect()
    }
}

fn empty_map_if_none<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    match value {
        Some(inner) => inner.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

// --- Pipelines ---
fn first_subsection<'a>(block: &'a str, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| find_subsection(block, name))
}

fn subsection_items(block: &str, names: &[&str], limit: usize) -> Vec<String> {
    first_subsection(block, names)
        .map(|sub| take_items(extract_items(sub), limit))
        .unwrap_or_default()
}

pub fn extract_introduction(document: &str) -> Result<Option<Introduction>, ExtractError> {
    let Some((winner, block)) = resolve_chain(document, INTRODUCTION_CHAIN)? else {
        return Ok(None);
    };

    if let Locator::Environment(_) = winner {
        tracing::debug!("No Introduction heading, using the abstract as motivation");
        return Ok(Some(Introduction {
            motivation: clean_latex(block),
            problem_statement: String::new(),
        }));
    }

    let motivation_block = find_subsection(block, "Motivation").unwrap_or(block);
    let problem_statement = first_subsection(block, &["Problem Statement", "Problem"])
        .map(|sub| extract_first_paragraph(sub, PROBLEM_STATEMENT_MAX_CHARS))
        .unwrap_or_default();

    Ok(Some(Introduction {
        motivation: extract_first_paragraph(motivation_block, MOTIVATION_MAX_CHARS),
        problem_statement,
    }))
}

pub fn extract_objectives(document: &str) -> Result<Vec<String>, ExtractError> {
    Ok(match resolve_chain(document, OBJECTIVES_CHAIN)? {
        Some((_, block)) => take_items(extract_items(block), MAX_OBJECTIVES),
        None => Vec::new(),
    })
}

pub fn extract_methodology(document: &str) -> Result<Option<Methodology>, ExtractError> {
    let Some((_, block)) = resolve_chain(document, METHODOLOGY_CHAIN)? else {
        return Ok(None);
    };

    Ok(Some(Methodology {
        overview: extract_first_paragraph(block, OVERVIEW_MAX_CHARS),
        approaches: subsection_items(block, &["Approach"], MAX_APPROACHES),
        technologies: subsection_items(block, &["Technologies", "Tools"], MAX_TECHNOLOGIES),
    }))
}

pub fn extract_results(document: &str) -> Result<Option<Results>, ExtractError> {
    let Some((_, block)) = resolve_chain(document, RESULTS_CHAIN)? else {
        return Ok(None);
    };

    let evaluation_block = find_subsection(block, "Evaluation").unwrap_or(block);
    Ok(Some(Results {
        implementation: subsection_items(block, &["Implementation"], MAX_IMPLEMENTATION_ITEMS),
        evaluation: extract_first_paragraph(evaluation_block, EVALUATION_MAX_CHARS),
    }))
}

pub fn extract_conclusion(document: &str) -> Result<Option<Conclusion>, ExtractError> {
    let Some((_, block)) = resolve_chain(document, CONCLUSION_CHAIN)? else {
        return Ok(None);
    };

    Ok(Some(Conclusion {
        summary: extract_first_paragraph(block, SUMMARY_MAX_CHARS),
        future_work: subsection_items(block, &["Future Work", "Future Scope"], MAX_FUTURE_WORK_ITEMS),
    }))
}
