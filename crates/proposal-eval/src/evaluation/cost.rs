use regex::Regex;
use std::sync::LazyLock;

/// Optional dollar sign, digits, optional single decimal group. Applied after
/// thousands separators are stripped.
static COST_FIGURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?(\d+(?:\.\d+)?)").expect("cost figure pattern is valid"));

/// Every monetary figure quoted in a cost section, in order of appearance.
/// Figures too large to represent as a finite `f64` are skipped.
pub fn cost_figures(section_text: &str) -> Vec<f64> {
    let stripped = section_text.replace(',', "");
    COST_FIGURE
        .captures_iter(&stripped)
        .filter_map(|caps| caps.get(1))
        .filter_map(|digits| digits.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .collect()
}

/// The headline figure of a cost section: the smallest number it quotes.
pub fn minimum_cost(section_text: &str) -> Option<f64> {
    cost_figures(section_text).into_iter().reduce(f64::min)
}

/// Scores a cost section against the run's peer costs: the cheapest peer scores
/// 100 and the most expensive 0.
///
/// Without at least two peers any parsed figure scores 100. That path cannot
/// discriminate between candidates; supply peers whenever they are known.
pub fn score_cost(section_text: &str, peers: Option<&[f64]>) -> f64 {
    let Some(candidate) = minimum_cost(section_text) else {
        return 0.0;
    };

    let peers = match peers {
        Some(peers) if peers.len() > 1 => peers,
        _ => return 100.0,
    };

    let min_peer = peers.iter().copied().fold(f64::INFINITY, f64::min);
    let max_peer = peers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max_peer == min_peer {
        return 100.0;
    }

    let score = 100.0 * (max_peer - candidate) / (max_peer - min_peer);
    score.clamp(0.0, 100.0)
}
