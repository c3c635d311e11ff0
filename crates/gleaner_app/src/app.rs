use std::fs;

use anyhow::{Context, Result};
use chrono::Utc;
use engine_logging::engine_info;
use gleaner_engine::{
    read_url_list, write_report, BatchRunner, BatchSummary, FetchOrchestrator, MemorySink,
    ReportError, ReqwestTransport, TransportSettings,
};

use crate::config::AppConfig;

type Runner = BatchRunner<ReqwestTransport>;

/// Read the URL list, fetch every entry, write the report.
pub async fn run(config: &AppConfig) -> Result<BatchSummary> {
    engine_info!("Run started at {}", Utc::now().to_rfc3339());

    let input = fs::read_to_string(&config.input_path)
        .with_context(|| format!("reading URL list {:?}", config.input_path))?;
    let urls = read_url_list(&input, config.url_column());
    engine_info!(
        "Loaded {} unique URLs from {:?}",
        urls.len(),
        config.input_path
    );

    let transport = ReqwestTransport::new(TransportSettings::from(&config.fetch.direct))
        .context("building HTTP client")?;
    let runner = BatchRunner::new(FetchOrchestrator::new(config.fetch.clone(), transport))
        .with_preview_chars(config.preview_chars);

    let mut sink = MemorySink::default();
    let summary = run_batch(&runner, &urls, &mut sink, config).await?;

    match write_report(sink.records(), &summary, &config.report_options()) {
        Ok(paths) => {
            engine_info!("Results written to {:?}", paths.results);
            if let Some(manifest) = paths.manifest {
                engine_info!("Summary manifest written to {:?}", manifest);
            }
        }
        Err(ReportError::Empty) => {
            println!("\nSCRAPING FINISHED: No records were collected to save.");
        }
        Err(err) => return Err(err).context("writing results"),
    }

    Ok(summary)
}

#[cfg(feature = "browser")]
async fn run_batch(
    runner: &Runner,
    urls: &[String],
    sink: &mut MemorySink,
    config: &AppConfig,
) -> Result<BatchSummary> {
    use gleaner_engine::{launch_chromium, pick, ChromiumLaunch};
    use std::time::Duration;

    let options = &config.browser;
    let launch = ChromiumLaunch {
        headless: options.headless,
        user_agent: pick(&config.fetch.direct.user_agents).map(str::to_string),
        chrome_args: options.chrome_args.clone(),
        remote_url: options.remote_url.clone(),
        page_load_timeout: Duration::from_millis(options.page_load_timeout_ms),
    };
    let mut session = launch_chromium(&launch)
        .await
        .context("starting browser")?;
    let summary = runner.run(urls, &mut session, sink).await;
    session.shutdown().await;
    Ok(summary)
}

#[cfg(not(feature = "browser"))]
async fn run_batch(
    runner: &Runner,
    urls: &[String],
    sink: &mut MemorySink,
    _config: &AppConfig,
) -> Result<BatchSummary> {
    use engine_logging::engine_warn;

    engine_warn!("Built without the `browser` feature; pages needing a browser will fail.");
    let mut session = gleaner_engine::UnavailableSession;
    Ok(runner.run(urls, &mut session, sink).await)
}
