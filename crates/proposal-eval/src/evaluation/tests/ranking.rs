use super::common::*;
use crate::evaluation::rank_candidates;

fn ranked(finals: &[(&str, f64)]) -> Vec<(String, u32)> {
    let scored = finals
        .iter()
        .map(|(label, final_score)| (label.to_string(), scores(*final_score)))
        .collect();
    rank_candidates(scored)
        .into_entries()
        .into_iter()
        .map(|entry| (entry.candidate_label, entry.rank))
        .collect()
}

#[test]
fn ties_share_the_best_rank() {
    assert_eq!(
        ranked(&[("A", 90.0), ("B", 90.0), ("C", 70.0)]),
        vec![
            ("A".to_string(), 1),
            ("B".to_string(), 1),
            ("C".to_string(), 3)
        ]
    );
}

#[test]
fn entries_are_ordered_best_first() {
    assert_eq!(
        ranked(&[("A", 70.0), ("B", 90.0), ("C", 90.0)]),
        vec![
            ("B".to_string(), 1),
            ("C".to_string(), 1),
            ("A".to_string(), 3)
        ]
    );
}

#[test]
fn distinct_scores_rank_sequentially() {
    assert_eq!(
        ranked(&[("A", 10.0), ("B", 120.5), ("C", 55.0)]),
        vec![
            ("B".to_string(), 1),
            ("C".to_string(), 2),
            ("A".to_string(), 3)
        ]
    );
}

#[test]
fn lookup_by_label() {
    let result = rank_candidates(vec![
        ("A".to_string(), scores(1.0)),
        ("B".to_string(), scores(2.0)),
    ]);

    assert_eq!(result.len(), 2);
    assert_eq!(result.get("A").map(|entry| entry.rank), Some(2));
    assert!(result.get("missing").is_none());
}
