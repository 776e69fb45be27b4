use super::domain::{RankedEntry, RankedResult, ScoreResult};

/// Orders candidates by descending final score. Ties share the best rank among
/// them and the next distinct score skips ahead (90, 90, 70 -> 1, 1, 3).
pub fn rank_candidates(scored: Vec<(String, ScoreResult)>) -> RankedResult {
    rank_with_summaries(
        scored
            .into_iter()
            .map(|(candidate_label, scores)| (candidate_label, scores, String::new()))
            .collect(),
    )
}

/// Same ordering as [`rank_candidates`], carrying each candidate's section summary.
pub(crate) fn rank_with_summaries(scored: Vec<(String, ScoreResult, String)>) -> RankedResult {
    let finals: Vec<f64> = scored
        .iter()
        .map(|(_, scores, _)| scores.final_score)
        .collect();

    let mut entries: Vec<RankedEntry> = scored
        .into_iter()
        .map(|(candidate_label, scores, summary)| {
            let ahead = finals
                .iter()
                .filter(|other| **other > scores.final_score)
                .count();
            RankedEntry {
                candidate_label,
                scores,
                rank: ahead as u32 + 1,
                summary,
            }
        })
        .collect();

    entries.sort_by_key(|entry| entry.rank);
    RankedResult::from_entries(entries)
}
