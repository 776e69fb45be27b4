use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::config::WeightConfig;
use super::domain::RankedResult;

pub const JSON_REPORT_FILE: &str = "ranked_output.json";
pub const CSV_REPORT_FILE: &str = "ranked_output.csv";

/// Output of one evaluation run, ready for display or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub evaluated_at: DateTime<Utc>,
    pub weights: WeightConfig,
    pub used_external: bool,
    pub results: RankedResult,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub insights: Vec<CandidateInsight>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInsight {
    pub candidate_label: String,
    #[serde(flatten)]
    pub outcome: InsightOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InsightOutcome {
    Summary { text: String },
    Unavailable { reason: String },
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    vendor: &'a str,
    cost_score: f64,
    technical_merit_score: f64,
    past_performance_score: f64,
    final_score: f64,
    rank: u32,
    summary: &'a str,
}

impl EvaluationReport {
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), ReportExportError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// One row per candidate in rank order.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ReportExportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for entry in self.results.entries() {
            csv_writer.serialize(CsvRow {
                vendor: &entry.candidate_label,
                cost_score: entry.scores.cost_score,
                technical_merit_score: entry.scores.technical_merit_score,
                past_performance_score: entry.scores.past_performance_score,
                final_score: entry.scores.final_score,
                rank: entry.rank,
                summary: &entry.summary,
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Writes `ranked_output.json` and `ranked_output.csv` into `dir`.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<ExportPaths, ReportExportError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let json = dir.join(JSON_REPORT_FILE);
        self.write_json(File::create(&json)?)?;

        let csv = dir.join(CSV_REPORT_FILE);
        self.write_csv(File::create(&csv)?)?;

        Ok(ExportPaths { json, csv })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportExportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode JSON report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode CSV report: {0}")]
    Csv(#[from] csv::Error),
}
