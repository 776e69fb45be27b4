const KEYWORDS: [&str; 5] = [
    "experience",
    "quality",
    "performance",
    "reliable",
    "efficient",
];

const POINTS_PER_WORD: f64 = 0.5;
const POINTS_PER_KEYWORD: f64 = 10.0;
const MAX_SCORE: f64 = 100.0;

/// Cheap substance proxy for free-text sections: word count plus keyword hits,
/// capped at 100.
pub fn score_text(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let word_count = text.split_whitespace().count() as f64;
    let lowered = text.to_lowercase();
    let keyword_hits = KEYWORDS
        .iter()
        .map(|keyword| lowered.matches(keyword).count())
        .sum::<usize>() as f64;

    (word_count * POINTS_PER_WORD + keyword_hits * POINTS_PER_KEYWORD).min(MAX_SCORE)
}
