use crate::infra::{build_evaluation_service, load_document};
use clap::Args;
use proposal_eval::config::AppConfig;
use proposal_eval::credentials::{CredentialStore, SqliteCredentialStore};
use proposal_eval::error::AppError;
use proposal_eval::evaluation::{EvaluationReport, EvaluationRequest, InsightOutcome};
use proposal_eval::telemetry;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Extracted proposal text files (2 or 3)
    #[arg(required = true)]
    pub(crate) files: Vec<PathBuf>,
    /// Weights file to use instead of PROPOSAL_WEIGHTS_PATH
    #[arg(long)]
    pub(crate) weights: Option<PathBuf>,
    /// Score technical and past-performance sections with the remote scorer
    #[arg(long)]
    pub(crate) external: bool,
    /// Ask the remote scorer for a short summary of each proposal
    #[arg(long)]
    pub(crate) insights: bool,
    /// Directory that receives ranked_output.json and ranked_output.csv
    #[arg(long, default_value = ".")]
    pub(crate) output_dir: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct CredentialSetArgs {
    /// Credential value to store
    #[arg(long)]
    pub(crate) key: String,
    /// Service identifier (defaults to SCORER_SERVICE_ID)
    #[arg(long)]
    pub(crate) service: Option<String>,
}

pub(crate) async fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        files,
        weights,
        external,
        insights,
        output_dir,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(path) = weights {
        config.scoring.weights_path = path;
    }
    telemetry::init(&config.telemetry)?;

    let documents = files
        .iter()
        .map(|path| load_document(path))
        .collect::<Result<Vec<_>, _>>()?;

    let service = build_evaluation_service(&config)?;
    let mut request = EvaluationRequest::new(documents);
    request.use_external = external;
    request.include_insights = insights;

    let report = service.evaluate(request).await?;
    print!("{}", render_report(&report));

    let paths = report.write_to_dir(&output_dir)?;
    println!(
        "\nSaved {} and {}",
        paths.json.display(),
        paths.csv.display()
    );
    Ok(())
}

pub(crate) fn run_credential_set(args: CredentialSetArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service_id = args.service.unwrap_or(config.scoring.service_id);

    let store = SqliteCredentialStore::open(&config.credentials.db_path)?;
    store.set(&service_id, &args.key)?;

    println!(
        "Stored credential for '{}' in {}",
        service_id,
        config.credentials.db_path.display()
    );
    Ok(())
}

pub(crate) fn render_report(report: &EvaluationReport) -> String {
    let weights = &report.weights;
    let mut lines = vec![
        "Proposal evaluation".to_string(),
        format!(
            "Evaluated {} | weights: cost {:.2}, technical merit {:.2}, past performance {:.2}",
            report.evaluated_at.format("%Y-%m-%d %H:%M UTC"),
            weights.cost,
            weights.technical_merit,
            weights.past_performance
        ),
    ];
    lines.push(if report.used_external {
        "Scoring: remote scorer with heuristic fallback".to_string()
    } else {
        "Scoring: keyword heuristic".to_string()
    });

    lines.push("\nRanking".to_string());
    lines.push(format!(
        "{:<5} {:<28} {:>8} {:>10} {:>10} {:>8}",
        "Rank", "Vendor", "Cost", "Technical", "Past perf", "Final"
    ));
    lines.extend(report.results.entries().iter().map(|entry| {
        format!(
            "{:<5} {:<28} {:>8.2} {:>10.2} {:>10.2} {:>8.2}",
            entry.rank,
            entry.candidate_label,
            entry.scores.cost_score,
            entry.scores.technical_merit_score,
            entry.scores.past_performance_score,
            entry.scores.final_score
        )
    }));

    if !report.insights.is_empty() {
        lines.push("\nInsights".to_string());
        lines.extend(
            report
                .insights
                .iter()
                .map(|insight| match &insight.outcome {
                    InsightOutcome::Summary { text } => {
                        format!("- {}:\n{}", insight.candidate_label, text)
                    }
                    InsightOutcome::Unavailable { reason } => format!(
                        "- {}: insights unavailable ({})",
                        insight.candidate_label, reason
                    ),
                }),
        );
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proposal_eval::evaluation::{
        rank_candidates, CandidateInsight, ScoreResult, ScoreSource, WeightConfig,
    };

    fn scores(cost: f64, final_score: f64) -> ScoreResult {
        ScoreResult {
            cost_score: cost,
            technical_merit_score: 12.5,
            past_performance_score: 22.0,
            final_score,
            technical_merit_source: ScoreSource::Heuristic,
            past_performance_source: ScoreSource::Heuristic,
        }
    }

    fn report() -> EvaluationReport {
        EvaluationReport {
            evaluated_at: Utc
                .with_ymd_and_hms(2025, 3, 4, 9, 30, 0)
                .single()
                .expect("valid timestamp"),
            weights: WeightConfig::default(),
            used_external: false,
            results: rank_candidates(vec![
                ("vendor_b.pdf".to_string(), scores(0.0, 4.25)),
                ("vendor_a.pdf".to_string(), scores(100.0, 41.6)),
            ]),
            insights: Vec::new(),
        }
    }

    #[test]
    fn report_lists_candidates_in_rank_order() {
        let rendered = render_report(&report());

        assert!(rendered.contains("Evaluated 2025-03-04 09:30 UTC"));
        assert!(rendered.contains("cost 0.30, technical merit 0.40, past performance 0.30"));
        assert!(rendered.contains("Scoring: keyword heuristic"));
        let a = rendered.find("vendor_a.pdf").expect("vendor a listed");
        let b = rendered.find("vendor_b.pdf").expect("vendor b listed");
        assert!(a < b);
        assert!(rendered.contains("41.60"));
        assert!(!rendered.contains("Insights"));
    }

    #[test]
    fn report_is_one_line_per_row() {
        let rendered = render_report(&report());

        assert!(rendered.ends_with("4.25\n"));
        assert!(!rendered.ends_with("\n\n"));
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Proposal evaluation");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Ranking");
        assert!(lines[6].starts_with("1     vendor_a.pdf"));
        assert!(lines[7].starts_with("2     vendor_b.pdf"));
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn report_includes_insight_outcomes() {
        let mut report = report();
        report.used_external = true;
        report.insights = vec![
            CandidateInsight {
                candidate_label: "vendor_a.pdf".to_string(),
                outcome: InsightOutcome::Summary {
                    text: "- lowest price".to_string(),
                },
            },
            CandidateInsight {
                candidate_label: "vendor_b.pdf".to_string(),
                outcome: InsightOutcome::Unavailable {
                    reason: "scoring request timed out".to_string(),
                },
            },
        ];

        let rendered = render_report(&report);

        assert!(rendered.contains("Scoring: remote scorer with heuristic fallback"));
        assert!(rendered.contains("- vendor_a.pdf:\n- lowest price"));
        assert!(rendered.contains("- vendor_b.pdf: insights unavailable (scoring request timed out)"));
    }
}
