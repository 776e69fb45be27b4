use super::domain::{ScoreSource, SectionKind};
use super::external::{CompletionTransport, ExternalScorer};
use super::heuristic::score_text;

/// How free-text sections are scored for one run.
pub enum ScoringStrategy<'a, T> {
    Heuristic,
    External {
        scorer: &'a ExternalScorer<T>,
        credential: &'a str,
    },
}

impl<'a, T: CompletionTransport> ScoringStrategy<'a, T> {
    /// External scoring only when requested and a non-blank credential exists.
    pub fn select(
        scorer: &'a ExternalScorer<T>,
        use_external: bool,
        credential: Option<&'a str>,
    ) -> Self {
        match credential.map(str::trim).filter(|value| !value.is_empty()) {
            Some(credential) if use_external => Self::External { scorer, credential },
            _ => Self::Heuristic,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Self::External { .. })
    }

    /// Scores one section, falling back to the heuristic when the remote scorer
    /// is unavailable.
    pub async fn score(&self, text: &str, kind: SectionKind) -> (f64, ScoreSource) {
        match self {
            Self::Heuristic => (score_text(text), ScoreSource::Heuristic),
            Self::External { scorer, credential } => {
                match scorer.score(text, kind.prompt_label(), credential).await {
                    Some(score) => (score, ScoreSource::External),
                    None => (score_text(text), ScoreSource::Heuristic),
                }
            }
        }
    }
}
