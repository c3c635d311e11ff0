use engine_logging::{engine_debug, engine_info, engine_warn};
use gleaner_core::{judge_candidate, AggregatorConfig, CandidateVerdict, Locator};
use url::Url;

use crate::browser::BrowserSession;
use crate::pacing::settle;

/// Finds the original source an aggregator page links to.
#[derive(Debug, Clone)]
pub struct AggregatorResolver {
    config: AggregatorConfig,
}

impl AggregatorResolver {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Probe the loaded page for a source link, selector by selector.
    ///
    /// Returns the first accepted candidate, or `None` when every selector
    /// misses or yields only rejected links. Never navigates.
    pub async fn resolve_source<S: BrowserSession>(
        &self,
        session: &mut S,
        aggregator_url: &str,
    ) -> Option<String> {
        engine_info!("Attempting to find original source link on: {}", aggregator_url);
        settle(&self.config.settle_delay).await;

        for selector in &self.config.source_selectors {
            let locator = Locator::Css(selector.clone());
            let element = match session.find(&locator, self.config.selector_timeout).await {
                Ok(element) => element,
                Err(err) => {
                    engine_debug!("Selector '{}' found nothing: {}", selector, err);
                    continue;
                }
            };

            let Some(raw) = self.first_attribute(session, &element).await else {
                continue;
            };
            let current = match session.current_url().await {
                Ok(url) => url,
                Err(err) => {
                    engine_debug!("Could not read current url: {}", err);
                    aggregator_url.to_string()
                }
            };
            let candidate = absolutize(&raw, &current);

            match judge_candidate(&candidate, &current, aggregator_url, &self.config.trusted_domains)
            {
                CandidateVerdict::Accepted(url) => {
                    engine_info!("Source found using selector '{}': {}", selector, url);
                    return Some(url);
                }
                verdict => {
                    engine_debug!("Selector '{}' candidate {} rejected: {:?}", selector, raw, verdict);
                }
            }
        }

        engine_warn!("Could not find a reliable external source link.");
        None
    }

    async fn first_attribute<S: BrowserSession>(
        &self,
        session: &mut S,
        element: &S::Element,
    ) -> Option<String> {
        for name in &self.config.link_attributes {
            match session.attribute(element, name).await {
                Ok(Some(value)) if !value.trim().is_empty() => return Some(value),
                Ok(_) => {}
                Err(err) => engine_debug!("Attribute '{}' unreadable: {}", name, err),
            }
        }
        None
    }
}

/// Resolve a possibly relative link against the page it was found on.
fn absolutize(raw: &str, base: &str) -> String {
    let trimmed = raw.trim();
    if Url::parse(trimmed).is_ok() {
        return trimmed.to_string();
    }
    Url::parse(base)
        .and_then(|base| base.join(trimmed))
        .map(String::from)
        .unwrap_or_else(|_| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::absolutize;

    #[test]
    fn relative_links_resolve_against_page() {
        assert_eq!(
            absolutize("/sources/12", "https://www.statista.com/chart/1"),
            "https://www.statista.com/sources/12"
        );
        assert_eq!(
            absolutize(" https://census.gov/x ", "https://www.statista.com/chart/1"),
            "https://census.gov/x"
        );
    }
}
