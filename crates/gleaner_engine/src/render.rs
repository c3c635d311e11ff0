use std::sync::Arc;

use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use gleaner_core::{mentions_paywall, ClassifierConfig, FetchFailure, RenderConfig};

use crate::aggregator::AggregatorResolver;
use crate::browser::{BrowserError, BrowserSession};
use crate::extract::TextExtractor;
use crate::obstacle::ObstacleHandler;
use crate::pacing::settle;

/// Browser tier: navigate with a spoofed referrer, follow aggregator sources,
/// clear obstacles, extract text.
pub struct RenderedFetcher {
    config: RenderConfig,
    classifier: ClassifierConfig,
    resolver: AggregatorResolver,
    obstacles: ObstacleHandler,
    extractor: Arc<dyn TextExtractor>,
}

impl RenderedFetcher {
    pub fn new(
        config: RenderConfig,
        classifier: ClassifierConfig,
        resolver: AggregatorResolver,
        obstacles: ObstacleHandler,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            config,
            classifier,
            resolver,
            obstacles,
            extractor,
        }
    }

    pub async fn fetch_rendered<S: BrowserSession>(
        &self,
        session: &mut S,
        url: &str,
        aggregator: bool,
    ) -> Result<String, FetchFailure> {
        let text = match self.render(session, url, aggregator).await {
            Ok(text) => text,
            Err(err) => {
                let last_url = session.current_url().await.ok();
                engine_error!(
                    "Browser error for {} (current URL: {}): {}",
                    url,
                    last_url.as_deref().unwrap_or("unknown"),
                    err
                );
                return Err(FetchFailure::rendering(last_url, err));
            }
        };

        if mentions_paywall(&text, &self.classifier) {
            engine_warn!("Paywall text detected in cleaned content after browser rendering.");
        }
        if text.chars().count() < self.classifier.min_content_chars {
            return Err(FetchFailure::insufficient_content());
        }
        Ok(text)
    }

    async fn render<S: BrowserSession>(
        &self,
        session: &mut S,
        url: &str,
        aggregator: bool,
    ) -> Result<String, BrowserError> {
        session.navigate(url, Some(&self.config.referrer)).await?;
        self.spoof_document_referrer(session).await;
        session
            .find(&self.config.ready_locator, self.config.ready_timeout)
            .await?;
        settle(&self.config.settle_delay).await;

        if aggregator {
            engine_info!("URL is an aggregator: {}. Attempting two-step navigation to source.", url);
            match self.resolver.resolve_source(session, url).await {
                Some(source) => {
                    session.navigate(&source, Some(&self.config.referrer)).await?;
                    self.spoof_document_referrer(session).await;
                    session
                        .find(&self.config.ready_locator, self.config.source_ready_timeout)
                        .await?;
                    settle(&self.config.source_settle_delay).await;
                    engine_info!("Performed two-step navigation to source {}", source);
                }
                None => {
                    engine_warn!("Could not find external source. Scraping aggregator directly: {}", url);
                }
            }
        }

        let here = session
            .current_url()
            .await
            .unwrap_or_else(|_| url.to_string());
        self.obstacles.clear_obstacles(session, &here).await;

        let markup = session.page_markup().await?;
        Ok(self.extractor.extract_text(&markup))
    }

    /// The navigation already carries the referrer header; this also makes
    /// `document.referrer` agree for scripts on the page.
    async fn spoof_document_referrer<S: BrowserSession>(&self, session: &mut S) {
        let script = format!(
            "Object.defineProperty(document, 'referrer', {{ get: () => {} }});",
            js_string(&self.config.referrer)
        );
        if let Err(err) = session.execute_script(&script).await {
            engine_debug!("Referrer override not applied: {}", err);
        }
    }
}

fn js_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}
