use std::io;
use std::path::PathBuf;

use serde_json::json;

use crate::csv::write_quoted_row;
use crate::persist::AtomicFileWriter;
use crate::{BatchSummary, FetchRecord};

pub const RESULTS_HEADER: [&str; 4] = ["url", "status", "error", "content_preview"];

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub output_dir: PathBuf,
    pub results_filename: String,
    pub manifest_filename: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            results_filename: "scraped_data_output.csv".to_string(),
            manifest_filename: Some("scrape_summary.json".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub results: PathBuf,
    pub manifest: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("nothing to write: no records were collected")]
    Empty,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("manifest encoding failed: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Results table with every field quoted; a missing error is an empty field.
pub fn render_results_csv(records: &[FetchRecord]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    write_quoted_row(&mut out, &RESULTS_HEADER)?;
    for record in records {
        write_quoted_row(
            &mut out,
            &[
                &record.url,
                record.status.as_str(),
                record.error.as_deref().unwrap_or(""),
                &record.content_preview,
            ],
        )?;
    }
    Ok(out)
}

/// Write the results CSV and, if configured, the JSON summary manifest.
pub fn write_report(
    records: &[FetchRecord],
    summary: &BatchSummary,
    options: &ReportOptions,
) -> Result<ReportPaths, ReportError> {
    if records.is_empty() {
        return Err(ReportError::Empty);
    }
    let writer = AtomicFileWriter::new(options.output_dir.clone());
    let results = writer.write(&options.results_filename, &render_results_csv(records)?)?;

    let manifest = match options.manifest_filename.as_deref() {
        Some(name) => {
            let failures: Vec<_> = records
                .iter()
                .filter(|r| !r.is_success())
                .map(|r| json!({ "url": r.url, "error": r.error }))
                .collect();
            let manifest = json!({
                "total": summary.total,
                "success": summary.success,
                "failure": summary.failure,
                "success_rate": round2(summary.success_rate()),
                "failure_rate": round2(summary.failure_rate()),
                "results_file": options.results_filename,
                "failures": failures,
            });
            let body = serde_json::to_vec_pretty(&manifest)?;
            Some(writer.write(name, &body)?)
        }
        None => None,
    };

    Ok(ReportPaths { results, manifest })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
