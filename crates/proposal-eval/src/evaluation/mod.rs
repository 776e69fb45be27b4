//! Proposal evaluation: section extraction, cost normalization, heuristic and
//! remote section scoring, weighted aggregation, and ranking.

mod config;
pub mod cost;
mod domain;
mod engine;
pub mod external;
pub mod heuristic;
mod ranking;
pub mod report;
pub mod router;
mod sections;
pub mod service;
mod strategy;

#[cfg(test)]
mod tests;

pub use config::{WeightConfig, WeightConfigError};
pub use domain::{
    BatchError, DocumentBatch, ProposalDocument, RankedEntry, RankedResult, ScoreResult,
    ScoreSource, SectionKind, SectionSet, MAX_BATCH_SIZE, MIN_BATCH_SIZE,
};
pub use engine::EvaluationEngine;
pub use external::{
    CompletionTransport, ExternalScoreError, ExternalScorer, HttpCompletionTransport,
};
pub use ranking::rank_candidates;
pub use report::{CandidateInsight, EvaluationReport, InsightOutcome, ReportExportError};
pub use router::evaluation_router;
pub use sections::{HeadingCatalog, HeadingRule, SectionExtractor};
pub use service::{EvaluationRequest, EvaluationServiceError, ProposalEvaluationService};
pub use strategy::ScoringStrategy;
