use std::collections::VecDeque;
use std::sync::Arc;

use engine_logging::{engine_debug, engine_info};
use gleaner_core::{
    classify, update, Classification, ClassifierConfig, Effect, FailureKind, FetchFailure,
    FetchRequest, FetchResult, FetchState, GleanerConfig, Msg,
};

use crate::aggregator::AggregatorResolver;
use crate::browser::BrowserSession;
use crate::direct::DirectFetcher;
use crate::extract::{BoilerplateStripper, TextExtractor};
use crate::obstacle::ObstacleHandler;
use crate::render::RenderedFetcher;
use crate::transport::Transport;

/// Per-URL entry point: runs the core state machine and executes its effects
/// against the HTTP transport and a borrowed browser session.
pub struct FetchOrchestrator<T: Transport> {
    direct: DirectFetcher<T>,
    rendered: RenderedFetcher,
    extractor: Arc<dyn TextExtractor>,
    classifier: ClassifierConfig,
    trusted_domains: Vec<String>,
}

impl<T: Transport> FetchOrchestrator<T> {
    pub fn new(config: GleanerConfig, transport: T) -> Self {
        let extractor: Arc<dyn TextExtractor> = Arc::new(BoilerplateStripper::new(&config.extract));
        Self::with_extractor(config, transport, extractor)
    }

    pub fn with_extractor(
        config: GleanerConfig,
        transport: T,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        let GleanerConfig {
            direct,
            classifier,
            aggregator,
            render,
            obstacles,
            extract: _,
        } = config;
        let trusted_domains = aggregator.trusted_domains.clone();
        let rendered = RenderedFetcher::new(
            render,
            classifier.clone(),
            AggregatorResolver::new(aggregator),
            ObstacleHandler::new(obstacles),
            extractor.clone(),
        );
        Self {
            direct: DirectFetcher::new(transport, direct),
            rendered,
            extractor,
            classifier,
            trusted_domains,
        }
    }

    /// Classify a plain-fetch body without fetching anything.
    pub fn classify(&self, body: &str, url: &str) -> Classification {
        let text = self.extractor.extract_text(body);
        classify(body, &text, url, false, &self.classifier, &self.trusted_domains)
    }

    /// Fetch one URL. Never panics and never returns early without a result.
    pub async fn fetch<S: BrowserSession>(&self, session: &mut S, url: &str) -> FetchResult {
        let request = FetchRequest::new(url, self.direct.config().max_retries);
        let (mut state, effects) = update(FetchState::new(request), Msg::Begin);
        let mut pending: VecDeque<Effect> = effects.into();

        while let Some(effect) = pending.pop_front() {
            let msg = self.run_effect(session, effect).await;
            let (next, effects) = update(state, msg);
            state = next;
            pending.extend(effects);
        }

        let phase = state.phase();
        state.into_result().unwrap_or_else(|| {
            FetchResult::Failure(FetchFailure::new(
                FailureKind::Incomplete,
                format!("Fetch stopped before completion ({phase:?})"),
            ))
        })
    }

    async fn run_effect<S: BrowserSession>(&self, session: &mut S, effect: Effect) -> Msg {
        match effect {
            Effect::FetchDirect { url, max_retries } => {
                let (outcome, retry) = self.direct.fetch(&url, max_retries).await;
                engine_debug!(
                    "Direct tier for {} took {} attempt(s), waits {:?}",
                    url,
                    retry.attempts(),
                    retry.waits()
                );
                match outcome {
                    Ok(response) => {
                        let text = self.extractor.extract_text(&response.body);
                        let classification = classify(
                            &response.body,
                            &text,
                            &url,
                            response.blocked,
                            &self.classifier,
                            &self.trusted_domains,
                        );
                        if classification.needs_escalation() {
                            engine_info!(
                                "Content is likely a stub, paywall, or aggregator ({}). Escalating to browser: {}",
                                classification.describe(),
                                url
                            );
                        }
                        Msg::DirectFetched {
                            classification,
                            text,
                        }
                    }
                    Err(failure) => Msg::DirectFailed(failure),
                }
            }
            Effect::FetchRendered { url, aggregator } => {
                let result = self.rendered.fetch_rendered(session, &url, aggregator).await;
                Msg::RenderFinished(result.into())
            }
        }
    }
}
