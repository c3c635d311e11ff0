//! Gleaner engine: HTTP and browser IO, text extraction, and the drivers that
//! execute the core state machine's effects.
mod aggregator;
mod browser;
mod csv;
mod decode;
mod direct;
mod engine;
mod extract;
mod obstacle;
mod orchestrator;
mod pacing;
mod persist;
mod preview;
mod render;
mod report;
mod transport;
mod types;

pub use aggregator::AggregatorResolver;
#[cfg(feature = "browser")]
pub use browser::{launch_chromium, ChromiumLaunch, ChromiumSession};
pub use browser::{BrowserError, BrowserSession, UnavailableSession};
pub use csv::{parse_rows, read_url_list, write_quoted_row, UrlColumn};
pub use decode::{decode_body, DecodedBody};
pub use direct::{DirectFetcher, DirectResponse, RetryState};
pub use engine::{BatchRunner, MemorySink, ResultSink};
pub use extract::{BoilerplateStripper, TextExtractor};
pub use obstacle::{ObstacleHandler, ObstacleReport};
pub use orchestrator::FetchOrchestrator;
pub use pacing::pick;
pub use persist::{ensure_output_dir, AtomicFileWriter};
pub use preview::{content_preview, DEFAULT_PREVIEW_CHARS};
pub use render::RenderedFetcher;
pub use report::{
    render_results_csv, write_report, ReportError, ReportOptions, ReportPaths, RESULTS_HEADER,
};
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError, TransportSettings};
pub use types::{BatchSummary, FetchRecord, RecordStatus};
