use std::fmt;

use gleaner_core::FetchResult;
use serde::Serialize;

use crate::preview::content_preview;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordStatus {
    Success,
    Failure,
}

impl RecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Success => "SUCCESS",
            RecordStatus::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output row per processed URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchRecord {
    pub url: String,
    pub status: RecordStatus,
    pub error: Option<String>,
    /// Leading characters of the text on success, empty on failure.
    pub content_preview: String,
}

impl FetchRecord {
    pub fn from_result(url: impl Into<String>, result: FetchResult, preview_chars: usize) -> Self {
        let url = url.into();
        match result {
            FetchResult::Success(text) => Self {
                url,
                status: RecordStatus::Success,
                error: None,
                content_preview: content_preview(&text, preview_chars).to_string(),
            },
            FetchResult::Failure(failure) => Self {
                url,
                status: RecordStatus::Failure,
                error: Some(failure.message),
                content_preview: String::new(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RecordStatus::Success
    }
}

/// Counters for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub success: usize,
    pub failure: usize,
}

impl BatchSummary {
    pub fn record(&mut self, record: &FetchRecord) {
        self.total += 1;
        match record.status {
            RecordStatus::Success => self.success += 1,
            RecordStatus::Failure => self.failure += 1,
        }
    }

    /// Percentage of processed URLs that succeeded; zero for an empty batch.
    pub fn success_rate(&self) -> f64 {
        percent(self.success, self.total)
    }

    pub fn failure_rate(&self) -> f64 {
        percent(self.failure, self.total)
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);
        writeln!(f, "{rule}")?;
        writeln!(f, "SCRAPING SUMMARY")?;
        writeln!(f, "Total URLs processed: {}", self.total)?;
        if self.total > 0 {
            writeln!(f, "{}", "-".repeat(50))?;
            writeln!(f, "SUCCESS COUNT:      {}", self.success)?;
            writeln!(f, "FAILURE COUNT:      {}", self.failure)?;
            writeln!(f, "SUCCESS RATE:      {:.2}%", self.success_rate())?;
            writeln!(f, "FAILURE RATE:      {:.2}%", self.failure_rate())?;
        } else {
            writeln!(f, "No URLs were processed.")?;
        }
        write!(f, "{rule}")
    }
}
