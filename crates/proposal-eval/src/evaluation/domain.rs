use serde::{Deserialize, Serialize};

/// Smallest batch the engine will rank.
pub const MIN_BATCH_SIZE: usize = 2;
/// Largest batch the engine will rank.
pub const MAX_BATCH_SIZE: usize = 3;

/// Raw text of one candidate proposal, identified by its label (usually a filename).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalDocument {
    label: String,
    text: String,
}

impl ProposalDocument {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    /// Builds a document from already-extracted text bytes. Invalid UTF-8 is
    /// replaced rather than rejected.
    pub fn from_bytes(label: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(label, String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A validated set of 2-3 proposals. Constructing one is the only way to reach
/// the engine, so out-of-range batches are rejected before any scoring happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentBatch {
    documents: Vec<ProposalDocument>,
}

impl DocumentBatch {
    pub fn new(documents: Vec<ProposalDocument>) -> Result<Self, BatchError> {
        let count = documents.len();
        if !(MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&count) {
            return Err(BatchError::OutOfRange {
                count,
                min: MIN_BATCH_SIZE,
                max: MAX_BATCH_SIZE,
            });
        }

        Ok(Self { documents })
    }

    pub fn documents(&self) -> &[ProposalDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    #[error("please upload between {min} and {max} proposals (received {count})")]
    OutOfRange { count: usize, min: usize, max: usize },
}

/// The three fixed sections every proposal is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Cost,
    TechnicalMerit,
    PastPerformance,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [
        SectionKind::Cost,
        SectionKind::TechnicalMerit,
        SectionKind::PastPerformance,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SectionKind::Cost => "cost",
            SectionKind::TechnicalMerit => "technical_merit",
            SectionKind::PastPerformance => "past_performance",
        }
    }

    /// Category wording used when asking the remote scorer for a rating.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            SectionKind::Cost => "COST",
            SectionKind::TechnicalMerit => "TECHNICAL APPROACH",
            SectionKind::PastPerformance => "PAST PERFORMANCE",
        }
    }
}

/// Extracted section bodies for one proposal. Missing sections are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionSet {
    cost: String,
    technical_merit: String,
    past_performance: String,
}

impl SectionSet {
    pub fn new(
        cost: impl Into<String>,
        technical_merit: impl Into<String>,
        past_performance: impl Into<String>,
    ) -> Self {
        Self {
            cost: cost.into(),
            technical_merit: technical_merit.into(),
            past_performance: past_performance.into(),
        }
    }

    pub fn get(&self, kind: SectionKind) -> &str {
        match kind {
            SectionKind::Cost => &self.cost,
            SectionKind::TechnicalMerit => &self.technical_merit,
            SectionKind::PastPerformance => &self.past_performance,
        }
    }

    pub fn cost(&self) -> &str {
        &self.cost
    }

    pub fn technical_merit(&self) -> &str {
        &self.technical_merit
    }

    pub fn past_performance(&self) -> &str {
        &self.past_performance
    }

    /// The three section bodies separated by blank lines, in fixed order.
    pub fn summary(&self) -> String {
        [
            self.cost.as_str(),
            self.technical_merit.as_str(),
            self.past_performance.as_str(),
        ]
        .join("\n\n")
    }
}

/// Which scorer produced a free-text section score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    External,
    Heuristic,
}

/// Per-candidate scores. Section scores sit in [0, 100]; the final score is a
/// plain weighted sum and is not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub cost_score: f64,
    pub technical_merit_score: f64,
    pub past_performance_score: f64,
    pub final_score: f64,
    pub technical_merit_source: ScoreSource,
    pub past_performance_source: ScoreSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub candidate_label: String,
    #[serde(flatten)]
    pub scores: ScoreResult,
    pub rank: u32,
    /// Extracted section text the scores were computed from.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
}

/// Candidates ordered by rank (best first). Tied candidates keep input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedResult {
    entries: Vec<RankedEntry>,
}

impl RankedResult {
    pub(crate) fn from_entries(entries: Vec<RankedEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn get(&self, candidate_label: &str) -> Option<&RankedEntry> {
        self.entries
            .iter()
            .find(|entry| entry.candidate_label == candidate_label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<RankedEntry> {
        self.entries
    }
}
