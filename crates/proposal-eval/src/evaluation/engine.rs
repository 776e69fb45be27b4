use tracing::{debug, info};

use super::config::WeightConfig;
use super::cost::{minimum_cost, score_cost};
use super::domain::{DocumentBatch, RankedResult, ScoreResult, SectionKind, SectionSet};
use super::external::{
    CompletionTransport, ExternalScoreError, ExternalScorer, HttpCompletionTransport,
};
use super::ranking::rank_with_summaries;
use super::sections::SectionExtractor;
use super::strategy::ScoringStrategy;
use crate::config::ScoringConfig;

/// Extracts, scores, weighs, and ranks a batch of proposals.
pub struct EvaluationEngine<T = HttpCompletionTransport> {
    extractor: SectionExtractor,
    external: ExternalScorer<T>,
}

impl EvaluationEngine<HttpCompletionTransport> {
    pub fn from_config(config: &ScoringConfig) -> Result<Self, ExternalScoreError> {
        let transport = HttpCompletionTransport::from_config(config)?;
        Ok(Self::new(
            SectionExtractor::default(),
            ExternalScorer::new(transport, config.timeout),
        ))
    }
}

impl<T: CompletionTransport> EvaluationEngine<T> {
    pub fn new(extractor: SectionExtractor, external: ExternalScorer<T>) -> Self {
        Self {
            extractor,
            external,
        }
    }

    pub fn extractor(&self) -> &SectionExtractor {
        &self.extractor
    }

    pub fn external(&self) -> &ExternalScorer<T> {
        &self.external
    }

    pub async fn evaluate(
        &self,
        batch: &DocumentBatch,
        weights: &WeightConfig,
        use_external: bool,
        credential: Option<&str>,
    ) -> RankedResult {
        let extracted: Vec<SectionSet> = batch
            .documents()
            .iter()
            .map(|document| self.extractor.extract(document.text()))
            .collect();

        // Every candidate's cost must be known before any cost is scored.
        let peers: Vec<f64> = extracted
            .iter()
            .filter_map(|sections| minimum_cost(sections.cost()))
            .collect();

        let strategy = ScoringStrategy::select(&self.external, use_external, credential);

        let mut scored = Vec::with_capacity(batch.len());
        for (document, sections) in batch.documents().iter().zip(&extracted) {
            let scores = self
                .score_sections(sections, &peers, weights, &strategy)
                .await;
            debug!(
                candidate = document.label(),
                cost = scores.cost_score,
                technical_merit = scores.technical_merit_score,
                past_performance = scores.past_performance_score,
                final_score = scores.final_score,
                "scored proposal"
            );
            scored.push((document.label().to_string(), scores, sections.summary()));
        }

        let ranked = rank_with_summaries(scored);
        info!(
            candidates = ranked.len(),
            external = strategy.is_external(),
            "evaluation run complete"
        );
        ranked
    }

    pub async fn score_sections(
        &self,
        sections: &SectionSet,
        peers: &[f64],
        weights: &WeightConfig,
        strategy: &ScoringStrategy<'_, T>,
    ) -> ScoreResult {
        let cost_score = score_cost(sections.cost(), Some(peers));
        let ((technical_merit_score, technical_merit_source), (past_score, past_source)) = tokio::join!(
            strategy.score(sections.technical_merit(), SectionKind::TechnicalMerit),
            strategy.score(sections.past_performance(), SectionKind::PastPerformance),
        );

        ScoreResult {
            cost_score,
            technical_merit_score,
            past_performance_score: past_score,
            final_score: weights.weighted_sum(cost_score, technical_merit_score, past_score),
            technical_merit_source,
            past_performance_source: past_source,
        }
    }
}
