use engine_logging::{engine_info, set_current_fetch};

use crate::browser::BrowserSession;
use crate::orchestrator::FetchOrchestrator;
use crate::preview::DEFAULT_PREVIEW_CHARS;
use crate::transport::Transport;
use crate::{BatchSummary, FetchRecord};

/// Receives one record per processed URL, in input order.
pub trait ResultSink {
    fn accept(&mut self, record: FetchRecord);
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<FetchRecord>,
}

impl MemorySink {
    pub fn records(&self) -> &[FetchRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<FetchRecord> {
        self.records
    }
}

impl ResultSink for MemorySink {
    fn accept(&mut self, record: FetchRecord) {
        self.records.push(record);
    }
}

/// Runs URLs one after another through a single orchestrator and a single
/// borrowed browser session.
pub struct BatchRunner<T: Transport> {
    orchestrator: FetchOrchestrator<T>,
    preview_chars: usize,
}

impl<T: Transport> BatchRunner<T> {
    pub fn new(orchestrator: FetchOrchestrator<T>) -> Self {
        Self {
            orchestrator,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    pub fn orchestrator(&self) -> &FetchOrchestrator<T> {
        &self.orchestrator
    }

    /// Blank entries are skipped and not counted.
    pub async fn run<S, K>(&self, urls: &[String], session: &mut S, sink: &mut K) -> BatchSummary
    where
        S: BrowserSession,
        K: ResultSink + ?Sized,
    {
        let mut summary = BatchSummary::default();

        for url in urls.iter().map(|u| u.trim()).filter(|u| !u.is_empty()) {
            set_current_fetch(summary.total as u64 + 1);
            let result = self.orchestrator.fetch(session, url).await;

            match result.failure() {
                Some(failure) => engine_info!("FAILURE: {} - {}", url, failure),
                None => engine_info!(
                    "SUCCESS: {} - Content length {}",
                    url,
                    result.text().map_or(0, |t| t.chars().count())
                ),
            }

            let record = FetchRecord::from_result(url, result, self.preview_chars);
            summary.record(&record);
            sink.accept(record);
        }

        set_current_fetch(0);
        summary
    }
}
