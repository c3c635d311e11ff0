//! Capability interface over a scriptable browser.
//!
//! The rendered tier, the aggregator resolver and the obstacle handler only
//! ever talk to a page through [`BrowserSession`]. The session is owned by the
//! caller and borrowed for one fetch at a time; nothing in this crate creates
//! or closes it.

use std::time::Duration;

use gleaner_core::Locator;

#[cfg(feature = "browser")]
mod chromium;

#[cfg(feature = "browser")]
pub use chromium::{launch_chromium, ChromiumLaunch, ChromiumSession};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrowserError {
    #[error("timed out after {waited:?} waiting for {locator}")]
    Timeout { locator: String, waited: Duration },
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },
    #[error("script failed: {0}")]
    Script(String),
    #[error("interaction failed: {0}")]
    Interaction(String),
    #[error("no browser session available")]
    Unavailable,
}

impl BrowserError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, BrowserError::Timeout { .. })
    }
}

#[async_trait::async_trait]
pub trait BrowserSession: Send {
    /// Opaque handle to an element of the current page.
    type Element: Send + Sync;

    /// Load `url`, presenting `referrer` to the page when given.
    async fn navigate(&mut self, url: &str, referrer: Option<&str>) -> Result<(), BrowserError>;

    async fn current_url(&mut self) -> Result<String, BrowserError>;

    /// Serialized DOM of the current page.
    async fn page_markup(&mut self) -> Result<String, BrowserError>;

    async fn execute_script(&mut self, script: &str) -> Result<(), BrowserError>;

    /// Wait up to `timeout` for an element matching `locator`.
    async fn find(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Self::Element, BrowserError>;

    /// Wait up to `timeout` for a matching element that is visible and enabled.
    async fn find_clickable(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Self::Element, BrowserError>;

    async fn attribute(
        &mut self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, BrowserError>;

    async fn click(&mut self, element: &Self::Element) -> Result<(), BrowserError>;

    async fn click_and_hold(&mut self, element: &Self::Element) -> Result<(), BrowserError>;

    async fn release(&mut self, element: &Self::Element) -> Result<(), BrowserError>;
}

/// Session used when no browser is configured: every call fails, so any
/// escalated fetch ends as a rendering error.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableSession;

#[async_trait::async_trait]
impl BrowserSession for UnavailableSession {
    type Element = ();

    async fn navigate(&mut self, _url: &str, _referrer: Option<&str>) -> Result<(), BrowserError> {
        Err(BrowserError::Unavailable)
    }

    async fn current_url(&mut self) -> Result<String, BrowserError> {
        Err(BrowserError::Unavailable)
    }

    async fn page_markup(&mut self) -> Result<String, BrowserError> {
        Err(BrowserError::Unavailable)
    }

    async fn execute_script(&mut self, _script: &str) -> Result<(), BrowserError> {
        Err(BrowserError::Unavailable)
    }

    async fn find(&mut self, _locator: &Locator, _timeout: Duration) -> Result<(), BrowserError> {
        Err(BrowserError::Unavailable)
    }

    async fn find_clickable(
        &mut self,
        _locator: &Locator,
        _timeout: Duration,
    ) -> Result<(), BrowserError> {
        Err(BrowserError::Unavailable)
    }

    async fn attribute(&mut self, _element: &(), _name: &str) -> Result<Option<String>, BrowserError> {
        Err(BrowserError::Unavailable)
    }

    async fn click(&mut self, _element: &()) -> Result<(), BrowserError> {
        Err(BrowserError::Unavailable)
    }

    async fn click_and_hold(&mut self, _element: &()) -> Result<(), BrowserError> {
        Err(BrowserError::Unavailable)
    }

    async fn release(&mut self, _element: &()) -> Result<(), BrowserError> {
        Err(BrowserError::Unavailable)
    }
}
