//! Chromium-backed session over the DevTools protocol.

use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType, MouseButton,
};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::element::Element;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use engine_logging::{engine_debug, engine_info, engine_warn};
use gleaner_core::Locator;

use super::{BrowserError, BrowserSession};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

const IS_CLICKABLE_JS: &str = r#"function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return !this.disabled
        && rect.width > 0 && rect.height > 0
        && style.visibility !== 'hidden' && style.display !== 'none';
}"#;

/// Options for starting (or attaching to) Chromium.
#[derive(Debug, Clone)]
pub struct ChromiumLaunch {
    pub headless: bool,
    pub user_agent: Option<String>,
    pub chrome_args: Vec<String>,
    /// DevTools endpoint of an already running browser, e.g. `ws://localhost:9222`.
    pub remote_url: Option<String>,
    pub page_load_timeout: Duration,
}

impl Default for ChromiumLaunch {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: None,
            chrome_args: Vec::new(),
            remote_url: None,
            page_load_timeout: Duration::from_secs(30),
        }
    }
}

/// Launch or connect to Chromium and open the single page the batch reuses.
pub async fn launch_chromium(options: &ChromiumLaunch) -> Result<ChromiumSession, BrowserError> {
    let (browser, mut handler) = match options.remote_url.as_deref() {
        Some(remote) => {
            let ws_url = resolve_ws_url(remote).await?;
            engine_info!("Connecting to remote browser at {}", ws_url);
            Browser::connect(ws_url).await.map_err(launch_error)?
        }
        None => {
            engine_info!("Launching browser (headless={})", options.headless);
            let mut builder = BrowserConfig::builder();
            if !options.headless {
                builder = builder.with_head();
            }
            builder = builder
                .arg("--no-sandbox")
                .arg("--disable-dev-shm-usage")
                .arg("--disable-blink-features=AutomationControlled")
                .arg("--disable-gpu");
            for arg in &options.chrome_args {
                builder = builder.arg(arg);
            }
            let config = builder
                .build()
                .map_err(|e| BrowserError::Interaction(format!("browser config: {e}")))?;
            Browser::launch(config).await.map_err(launch_error)?
        }
    };

    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    let page = browser
        .new_page("about:blank")
        .await
        .map_err(launch_error)?;
    if let Some(user_agent) = options.user_agent.as_deref() {
        page.execute(SetUserAgentOverrideParams::new(user_agent.to_string()))
            .await
            .map_err(launch_error)?;
    }

    Ok(ChromiumSession {
        browser,
        page,
        handler_task,
        page_load_timeout: options.page_load_timeout,
    })
}

async fn resolve_ws_url(remote: &str) -> Result<String, BrowserError> {
    if remote.contains("/devtools/browser/") {
        return Ok(remote.to_string());
    }
    let http_url = remote
        .replace("ws://", "http://")
        .replace("wss://", "https://");
    let version_url = format!("{}/json/version", http_url.trim_end_matches('/'));
    let body = reqwest::get(&version_url)
        .await
        .map_err(|e| BrowserError::Navigation {
            url: version_url.clone(),
            message: e.to_string(),
        })?
        .text()
        .await
        .map_err(|e| BrowserError::Navigation {
            url: version_url.clone(),
            message: e.to_string(),
        })?;
    let info: serde_json::Value = serde_json::from_str(&body)
        .map_err(|e| BrowserError::Script(format!("bad /json/version reply: {e}")))?;
    info.get("webSocketDebuggerUrl")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| BrowserError::Script("no webSocketDebuggerUrl in /json/version".into()))
}

fn launch_error(err: impl std::fmt::Display) -> BrowserError {
    BrowserError::Interaction(format!("browser launch: {err}"))
}

fn script_error(err: impl std::fmt::Display) -> BrowserError {
    BrowserError::Script(err.to_string())
}

fn interaction_error(err: impl std::fmt::Display) -> BrowserError {
    BrowserError::Interaction(err.to_string())
}

/// One Chromium tab reused sequentially across URLs.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    page_load_timeout: Duration,
}

impl ChromiumSession {
    /// Close the browser and wait for the event handler to stop.
    pub async fn shutdown(mut self) {
        if let Err(err) = self.browser.close().await {
            engine_warn!("Browser close failed: {}", err);
        }
        let _ = self.browser.wait().await;
        let _ = self.handler_task.await;
    }

    async fn find_once(&self, locator: &Locator) -> Result<Element, BrowserError> {
        let found = match locator {
            Locator::XPath(xpath) => self.page.find_xpath(xpath.as_str()).await,
            other => {
                let css = other.to_css().unwrap_or_default();
                self.page.find_element(css).await
            }
        };
        found.map_err(interaction_error)
    }

    async fn is_clickable(&self, element: &Element) -> bool {
        match element.call_js_fn(IS_CLICKABLE_JS, false).await {
            Ok(ret) => ret
                .result
                .value
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            Err(err) => {
                engine_debug!("Clickability probe failed: {}", err);
                false
            }
        }
    }

    async fn poll(
        &self,
        locator: &Locator,
        timeout: Duration,
        require_clickable: bool,
    ) -> Result<Element, BrowserError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(element) = self.find_once(locator).await {
                if !require_clickable || self.is_clickable(&element).await {
                    return Ok(element);
                }
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout {
                    locator: locator.to_string(),
                    waited: timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn mouse(&self, element: &Element, kind: DispatchMouseEventType) -> Result<(), BrowserError> {
        element.scroll_into_view().await.map_err(interaction_error)?;
        let point = element.clickable_point().await.map_err(interaction_error)?;
        let params = DispatchMouseEventParams::builder()
            .r#type(kind)
            .x(point.x)
            .y(point.y)
            .button(MouseButton::Left)
            .click_count(1)
            .build()
            .map_err(interaction_error)?;
        self.page.execute(params).await.map_err(interaction_error)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl BrowserSession for ChromiumSession {
    type Element = Element;

    async fn navigate(&mut self, url: &str, referrer: Option<&str>) -> Result<(), BrowserError> {
        let nav_error = |message: String| BrowserError::Navigation {
            url: url.to_string(),
            message,
        };
        let mut builder = NavigateParams::builder().url(url);
        if let Some(referrer) = referrer {
            builder = builder.referrer(referrer);
        }
        let params = builder.build().map_err(nav_error)?;

        let navigation = async {
            self.page.execute(params).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        };
        match tokio::time::timeout(self.page_load_timeout, navigation).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(nav_error(err.to_string())),
            Err(_) => Err(nav_error(format!(
                "page load exceeded {:?}",
                self.page_load_timeout
            ))),
        }
    }

    async fn current_url(&mut self) -> Result<String, BrowserError> {
        let url = self.page.url().await.map_err(script_error)?;
        Ok(url.unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn page_markup(&mut self) -> Result<String, BrowserError> {
        self.page.content().await.map_err(script_error)
    }

    async fn execute_script(&mut self, script: &str) -> Result<(), BrowserError> {
        self.page
            .evaluate(script.to_string())
            .await
            .map(|_| ())
            .map_err(script_error)
    }

    async fn find(&mut self, locator: &Locator, timeout: Duration) -> Result<Element, BrowserError> {
        self.poll(locator, timeout, false).await
    }

    async fn find_clickable(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Element, BrowserError> {
        self.poll(locator, timeout, true).await
    }

    async fn attribute(
        &mut self,
        element: &Element,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        element.attribute(name).await.map_err(script_error)
    }

    async fn click(&mut self, element: &Element) -> Result<(), BrowserError> {
        element.click().await.map(|_| ()).map_err(interaction_error)
    }

    async fn click_and_hold(&mut self, element: &Element) -> Result<(), BrowserError> {
        self.mouse(element, DispatchMouseEventType::MousePressed).await
    }

    async fn release(&mut self, element: &Element) -> Result<(), BrowserError> {
        self.mouse(element, DispatchMouseEventType::MouseReleased).await
    }
}
