#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use gleaner_core::{GleanerConfig, Locator};
use gleaner_engine::{BrowserError, BrowserSession, RawResponse, Transport, TransportError};

/// Defaults with every pacing delay removed.
pub fn fast_config() -> GleanerConfig {
    GleanerConfig::default().without_delays()
}

pub fn article(words: usize) -> String {
    let body = vec!["word"; words].join(" ");
    format!("<html><body><article><p>{body}</p></article></body></html>")
}

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub attributes: HashMap<String, String>,
    pub clickable: bool,
}

impl FakeElement {
    pub fn clickable() -> Self {
        Self {
            attributes: HashMap::new(),
            clickable: true,
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub markup: String,
    pub elements: HashMap<Locator, FakeElement>,
}

impl FakePage {
    pub fn new(markup: impl Into<String>) -> Self {
        let mut elements = HashMap::new();
        elements.insert(Locator::Tag("body".to_string()), FakeElement::default());
        Self {
            markup: markup.into(),
            elements,
        }
    }

    pub fn with_element(mut self, locator: Locator, element: FakeElement) -> Self {
        self.elements.insert(locator, element);
        self
    }

    pub fn with_link(self, css: &str, attr: &str, value: &str) -> Self {
        self.with_element(
            Locator::Css(css.to_string()),
            FakeElement::default().with_attr(attr, value),
        )
    }
}

/// In-memory browser: pages keyed by URL, every interaction recorded.
#[derive(Debug, Default)]
pub struct FakeSession {
    pages: HashMap<String, FakePage>,
    current: Option<String>,
    pub navigations: Vec<(String, Option<String>)>,
    pub scripts: Vec<String>,
    pub clicks: Vec<Locator>,
    pub gestures: Vec<String>,
    pub broken_markup: bool,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    /// Pretend `url` is already loaded, as after a navigation.
    pub fn at(mut self, url: &str) -> Self {
        self.current = Some(url.to_string());
        self
    }

    pub fn visited(&self) -> Vec<&str> {
        self.navigations.iter().map(|(url, _)| url.as_str()).collect()
    }

    fn page(&self) -> Result<&FakePage, BrowserError> {
        self.current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .ok_or(BrowserError::Unavailable)
    }

    fn element(&self, locator: &Locator) -> Option<&FakeElement> {
        self.page().ok()?.elements.get(locator)
    }
}

#[async_trait::async_trait]
impl BrowserSession for FakeSession {
    type Element = Locator;

    async fn navigate(&mut self, url: &str, referrer: Option<&str>) -> Result<(), BrowserError> {
        self.navigations
            .push((url.to_string(), referrer.map(str::to_string)));
        if !self.pages.contains_key(url) {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String, BrowserError> {
        self.current.clone().ok_or(BrowserError::Unavailable)
    }

    async fn page_markup(&mut self) -> Result<String, BrowserError> {
        if self.broken_markup {
            return Err(BrowserError::Script("target closed".to_string()));
        }
        Ok(self.page()?.markup.clone())
    }

    async fn execute_script(&mut self, script: &str) -> Result<(), BrowserError> {
        self.scripts.push(script.to_string());
        Ok(())
    }

    async fn find(&mut self, locator: &Locator, timeout: Duration) -> Result<Locator, BrowserError> {
        match self.element(locator) {
            Some(_) => Ok(locator.clone()),
            None => Err(BrowserError::Timeout {
                locator: locator.to_string(),
                waited: timeout,
            }),
        }
    }

    async fn find_clickable(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Locator, BrowserError> {
        match self.element(locator) {
            Some(element) if element.clickable => Ok(locator.clone()),
            _ => Err(BrowserError::Timeout {
                locator: locator.to_string(),
                waited: timeout,
            }),
        }
    }

    async fn attribute(
        &mut self,
        element: &Locator,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        Ok(self
            .element(element)
            .and_then(|e| e.attributes.get(name).cloned()))
    }

    async fn click(&mut self, element: &Locator) -> Result<(), BrowserError> {
        self.clicks.push(element.clone());
        Ok(())
    }

    async fn click_and_hold(&mut self, element: &Locator) -> Result<(), BrowserError> {
        self.gestures.push(format!("press {element}"));
        Ok(())
    }

    async fn release(&mut self, element: &Locator) -> Result<(), BrowserError> {
        self.gestures.push(format!("release {element}"));
        Ok(())
    }
}

/// Transport replaying canned replies per URL; the last reply repeats.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Result<RawResponse, TransportError>>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, url: &str, status: u16, body: &str) -> Self {
        let reply = Ok(RawResponse {
            status,
            final_url: url.to_string(),
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: body.to_string(),
        });
        self.push(url, reply)
    }

    pub fn fail(self, url: &str, err: TransportError) -> Self {
        self.push(url, Err(err))
    }

    fn push(self, url: &str, reply: Result<RawResponse, TransportError>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, _user_agent: &str) -> Result<RawResponse, TransportError> {
        self.calls.lock().unwrap().push(url.to_string());
        let mut replies = self.replies.lock().unwrap();
        let queue = replies
            .get_mut(url)
            .ok_or_else(|| TransportError::Network(format!("no reply scripted for {url}")))?;
        match queue.len() {
            0 => Err(TransportError::Network(format!("no reply scripted for {url}"))),
            1 => queue[0].clone(),
            _ => queue.pop_front().unwrap_or_else(|| {
                Err(TransportError::Network(format!("no reply scripted for {url}")))
            }),
        }
    }
}
