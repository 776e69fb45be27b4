use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{SectionKind, SectionSet};

/// Headings that open a section and the headings that close it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingRule {
    pub synonyms: Vec<String>,
    pub boundaries: Vec<String>,
}

impl HeadingRule {
    fn new(synonyms: &[&str], boundaries: &[&str]) -> Self {
        Self {
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
            boundaries: boundaries.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Heading vocabulary for all three sections. Matching is case-insensitive and
/// literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCatalog {
    pub cost: HeadingRule,
    pub technical_merit: HeadingRule,
    pub past_performance: HeadingRule,
}

impl Default for HeadingCatalog {
    fn default() -> Self {
        Self {
            cost: HeadingRule::new(
                &["Cost", "Pricing", "Budget"],
                &["Technical Approach", "Past Performance"],
            ),
            technical_merit: HeadingRule::new(
                &["Technical Approach", "Technical Proposal", "Approach"],
                &["Cost", "Past Performance"],
            ),
            past_performance: HeadingRule::new(
                &["Past Performance", "Experience", "References"],
                &["Cost", "Technical Approach"],
            ),
        }
    }
}

impl HeadingCatalog {
    pub fn rule(&self, kind: SectionKind) -> &HeadingRule {
        match kind {
            SectionKind::Cost => &self.cost,
            SectionKind::TechnicalMerit => &self.technical_merit,
            SectionKind::PastPerformance => &self.past_performance,
        }
    }
}

struct SectionMatcher {
    heading: Option<Regex>,
    boundary: Option<Regex>,
}

impl SectionMatcher {
    fn from_rule(kind: SectionKind, rule: &HeadingRule) -> Self {
        Self {
            heading: alternation(kind, &rule.synonyms),
            boundary: alternation(kind, &rule.boundaries),
        }
    }

    /// First heading wins; the body runs to the next boundary heading or end of text.
    fn find<'t>(&self, text: &'t str) -> &'t str {
        let Some(heading) = self.heading.as_ref().and_then(|re| re.find(text)) else {
            return "";
        };

        let tail = &text[heading.end()..];
        let end = self
            .boundary
            .as_ref()
            .and_then(|re| re.find(tail))
            .map(|boundary| heading.end() + boundary.start())
            .unwrap_or(text.len());

        text[heading.start()..end].trim()
    }
}

fn alternation(kind: SectionKind, terms: &[String]) -> Option<Regex> {
    let escaped: Vec<String> = terms
        .iter()
        .map(|term| term.trim())
        .filter(|term| !term.is_empty())
        .map(regex::escape)
        .collect();
    if escaped.is_empty() {
        return None;
    }

    let pattern = format!("(?i)(?:{})", escaped.join("|"));
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            warn!(section = kind.key(), error = %err, "heading pattern rejected");
            None
        }
    }
}

/// Splits raw proposal text into cost, technical merit, and past performance.
pub struct SectionExtractor {
    cost: SectionMatcher,
    technical_merit: SectionMatcher,
    past_performance: SectionMatcher,
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new(&HeadingCatalog::default())
    }
}

impl SectionExtractor {
    pub fn new(catalog: &HeadingCatalog) -> Self {
        Self {
            cost: SectionMatcher::from_rule(SectionKind::Cost, &catalog.cost),
            technical_merit: SectionMatcher::from_rule(
                SectionKind::TechnicalMerit,
                &catalog.technical_merit,
            ),
            past_performance: SectionMatcher::from_rule(
                SectionKind::PastPerformance,
                &catalog.past_performance,
            ),
        }
    }

    pub fn extract(&self, text: &str) -> SectionSet {
        SectionSet::new(
            self.cost.find(text),
            self.technical_merit.find(text),
            self.past_performance.find(text),
        )
    }
}
