use std::time::Duration;

use engine_logging::{engine_error, engine_warn};
use gleaner_core::{DirectConfig, FetchFailure};

use crate::pacing::{jitter, pause, pick};
use crate::transport::{RawResponse, Transport, TransportError};

/// Body handed back by the plain HTTP tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectResponse {
    pub status: u16,
    pub final_url: String,
    pub body: String,
    /// 403 passthrough: the body is most likely a block page.
    pub blocked: bool,
}

/// Attempt counter and backoff history for one URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryState {
    attempts: u32,
    waits: Vec<Duration>,
}

impl RetryState {
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Backoff waits taken so far, in order.
    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }
}

/// What the retry loop does after one attempt.
enum Step {
    Done(Result<DirectResponse, FetchFailure>),
    Retry(Duration),
}

/// Plain HTTP tier with retry/backoff for transient failures.
pub struct DirectFetcher<T: Transport> {
    transport: T,
    config: DirectConfig,
}

impl<T: Transport> DirectFetcher<T> {
    pub fn new(transport: T, config: DirectConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &DirectConfig {
        &self.config
    }

    /// Fetch `url`, spending at most `max_retries` attempts (at least one).
    pub async fn fetch(
        &self,
        url: &str,
        max_retries: u32,
    ) -> (Result<DirectResponse, FetchFailure>, RetryState) {
        let budget = max_retries.max(1);
        let mut retry = RetryState::default();

        loop {
            retry.attempts += 1;
            let user_agent = pick(&self.config.user_agents).unwrap_or("gleaner");
            let outcome = self.transport.get(url, user_agent).await;
            let last = retry.attempts >= budget;

            match self.step(url, outcome, retry.attempts, budget, last) {
                Step::Done(result) => return (result, retry),
                Step::Retry(wait) => {
                    retry.waits.push(wait);
                    pause(wait).await;
                }
            }
        }
    }

    fn step(
        &self,
        url: &str,
        outcome: Result<RawResponse, TransportError>,
        attempt: u32,
        budget: u32,
        last: bool,
    ) -> Step {
        let response = match outcome {
            Ok(response) => response,
            Err(err) if err.is_retryable() && !last => {
                let wait = self.config.backoff_for(attempt) + jitter(&self.config.transport_jitter);
                engine_warn!(
                    "Request error for {}: {}. Retrying in {:?}... (Attempt {}/{})",
                    url,
                    err,
                    wait,
                    attempt,
                    budget
                );
                return Step::Retry(wait);
            }
            Err(err) => {
                engine_error!("Request error for {} after {} attempt(s): {}", url, attempt, err);
                return Step::Done(Err(FetchFailure::transport(err)));
            }
        };

        match response.status {
            200 => Step::Done(Ok(into_direct(response, false))),
            404 => {
                engine_error!("Page not found (404): {}", url);
                Step::Done(Err(FetchFailure::not_found()))
            }
            403 => {
                engine_warn!("403 Forbidden detected. Flagging for browser fallback: {}", url);
                Step::Done(Ok(into_direct(response, true)))
            }
            status @ 500..=599 if !last => {
                let wait = self.config.backoff_for(attempt);
                engine_warn!(
                    "Server Error {} for {}. Retrying in {:?}... (Attempt {}/{})",
                    status,
                    url,
                    wait,
                    attempt,
                    budget
                );
                Step::Retry(wait)
            }
            status @ 500..=599 => {
                engine_error!("Max retries failed for {} error: {}", status, url);
                Step::Done(Err(FetchFailure::server_exhausted(status)))
            }
            status => {
                engine_error!("Failed to load page (status code {}): {}", status, url);
                Step::Done(Err(FetchFailure::http_status(status)))
            }
        }
    }
}

fn into_direct(response: RawResponse, blocked: bool) -> DirectResponse {
    DirectResponse {
        status: response.status,
        final_url: response.final_url,
        body: response.body,
        blocked,
    }
}
