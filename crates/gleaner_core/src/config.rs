//! Configuration passed into the orchestrator at construction.
//!
//! Every list and threshold the pipeline consults lives here; defaults carry
//! the values the scraper has always shipped with. Durations are written in
//! config files as integer milliseconds (`*_ms`).

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Aggregate configuration for one orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GleanerConfig {
    pub direct: DirectConfig,
    pub classifier: ClassifierConfig,
    pub aggregator: AggregatorConfig,
    pub render: RenderConfig,
    pub obstacles: ObstacleConfig,
    pub extract: ExtractConfig,
}

impl GleanerConfig {
    /// Same lists and thresholds, but every pacing delay and backoff set to zero.
    /// Bounded waits keep their values since they only matter on a miss.
    pub fn without_delays(mut self) -> Self {
        self.direct.backoff_base = Duration::ZERO;
        self.direct.transport_jitter = DelayRange::ZERO;
        self.aggregator.settle_delay = DelayRange::ZERO;
        self.render.settle_delay = DelayRange::ZERO;
        self.render.source_settle_delay = DelayRange::ZERO;
        self.obstacles.hold_duration = Duration::ZERO;
        self
    }
}

/// Plain HTTP tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectConfig {
    pub max_retries: u32,
    #[serde(rename = "request_timeout_ms", with = "millis")]
    pub request_timeout: Duration,
    #[serde(rename = "connect_timeout_ms", with = "millis")]
    pub connect_timeout: Duration,
    /// First retry waits this long; each further retry doubles it.
    #[serde(rename = "backoff_base_ms", with = "millis")]
    pub backoff_base: Duration,
    /// Extra random wait added on top of the backoff after a transport error.
    pub transport_jitter: DelayRange,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agents: Vec<String>,
}

impl Default for DirectConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            backoff_base: Duration::from_secs(2),
            transport_jitter: DelayRange::from_millis(1_000, 2_000),
            redirect_limit: 10,
            max_bytes: 10 * 1024 * 1024,
            user_agents: strings(&[
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.2 Safari/605.1.15",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Edge/114.0.1823.58",
                "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/117.0",
            ]),
        }
    }
}

impl DirectConfig {
    /// Wait before retry number `attempt` (1-based): base, 2*base, 4*base ...
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor)
    }
}

/// Phrases and thresholds used to decide whether a plain fetch was good enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub placeholder_indicators: Vec<String>,
    pub paywall_indicators: Vec<String>,
    pub min_content_chars: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            placeholder_indicators: strings(&[
                "please enable javascript",
                "enable javascript",
                "load full story",
                "continue reading",
                "login to read this story",
                "javascript is required",
                "paywall",
                "subscribe to read",
                "403 forbidden",
                "access denied",
                "client blocked",
                "sorry, you have been blocked",
            ]),
            paywall_indicators: strings(&["paywall", "subscribe to read"]),
            min_content_chars: 100,
        }
    }
}

/// Aggregator hosts and how to find the source they link to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    pub trusted_domains: Vec<String>,
    /// Probed in order; the first selector yielding an accepted link wins.
    pub source_selectors: Vec<String>,
    /// Checked in order on the matched element; first non-empty value is the candidate.
    pub link_attributes: Vec<String>,
    #[serde(rename = "selector_timeout_ms", with = "millis")]
    pub selector_timeout: Duration,
    pub settle_delay: DelayRange,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            trusted_domains: strings(&["statista.com", "fivethirtyeight.com", "kff.org"]),
            source_selectors: strings(&[
                ".source-list__item a",
                ".source-box a",
                "section#statisticHeader[data-url]",
                "a[href*='org/']",
                "a[href*='gov/']",
                "a[title*='source']",
            ]),
            link_attributes: strings(&["href", "data-url", "data-link", "source-url"]),
            selector_timeout: Duration::from_secs(15),
            settle_delay: DelayRange::from_millis(1_500, 3_000),
        }
    }
}

/// Browser tier pacing and readiness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub referrer: String,
    pub ready_locator: Locator,
    #[serde(rename = "ready_timeout_ms", with = "millis")]
    pub ready_timeout: Duration,
    pub settle_delay: DelayRange,
    #[serde(rename = "source_ready_timeout_ms", with = "millis")]
    pub source_ready_timeout: Duration,
    pub source_settle_delay: DelayRange,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            referrer: "https://www.google.com/".to_string(),
            ready_locator: Locator::Tag("body".to_string()),
            ready_timeout: Duration::from_secs(20),
            settle_delay: DelayRange::from_millis(4_000, 5_000),
            source_ready_timeout: Duration::from_secs(15),
            source_settle_delay: DelayRange::from_millis(1_000, 2_000),
        }
    }
}

/// Pop-up and press-and-hold handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub popup_keywords: Vec<String>,
    pub close_locators: Vec<Locator>,
    #[serde(rename = "close_timeout_ms", with = "millis")]
    pub close_timeout: Duration,
    pub hold_locator: Locator,
    #[serde(rename = "hold_timeout_ms", with = "millis")]
    pub hold_timeout: Duration,
    #[serde(rename = "hold_duration_ms", with = "millis")]
    pub hold_duration: Duration,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            popup_keywords: strings(&[
                "cookie-banner",
                "modal-backdrop",
                "overlay-container",
                "subscription-modal",
                "newsletter-popup",
                "ccpa",
            ]),
            close_locators: vec![
                Locator::Css(r#"button[aria-label="Close"]"#.to_string()),
                Locator::ClassName("modal-close".to_string()),
                Locator::XPath(r#"//button[contains(text(), "No Thanks")]"#.to_string()),
                Locator::XPath(r#"//button[contains(text(), "Skip")]"#.to_string()),
            ],
            close_timeout: Duration::from_secs(3),
            hold_locator: Locator::Id("confirm-human-button".to_string()),
            hold_timeout: Duration::from_secs(5),
            hold_duration: Duration::from_secs(3),
        }
    }
}

/// Markup stripped before text is collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub removed_tags: Vec<String>,
    /// Substrings matched against the raw `class` attribute.
    pub class_patterns: Vec<String>,
    /// Substrings matched against the raw `id` attribute.
    pub id_patterns: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            removed_tags: strings(&[
                "aside", "footer", "header", "nav", "iframe", "script", "style", "noscript",
                "template",
            ]),
            class_patterns: strings(&["ad-", "paywall-", "advertisement"]),
            id_patterns: strings(&["ad-", "paywall-", "sidebar"]),
        }
    }
}

/// How to find an element in a rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locator {
    Css(String),
    #[serde(rename = "xpath")]
    XPath(String),
    Id(String),
    ClassName(String),
    Tag(String),
}

impl Locator {
    /// CSS equivalent, when one exists. XPath has none.
    pub fn to_css(&self) -> Option<String> {
        match self {
            Locator::Css(css) => Some(css.clone()),
            Locator::Id(id) => Some(format!("[id=\"{}\"]", escape_attr(id))),
            Locator::ClassName(class) => Some(format!(".{class}")),
            Locator::Tag(tag) => Some(tag.clone()),
            Locator::XPath(_) => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(v) => write!(f, "css `{v}`"),
            Locator::XPath(v) => write!(f, "xpath `{v}`"),
            Locator::Id(v) => write!(f, "id `{v}`"),
            Locator::ClassName(v) => write!(f, "class `{v}`"),
            Locator::Tag(v) => write!(f, "tag `{v}`"),
        }
    }
}

fn escape_attr(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Inclusive range a randomized pacing delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    #[serde(rename = "min_ms", with = "millis")]
    pub min: Duration,
    #[serde(rename = "max_ms", with = "millis")]
    pub max: Duration,
}

impl DelayRange {
    pub const ZERO: DelayRange = DelayRange {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    pub const fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min: Duration::from_millis(min_ms),
            max: Duration::from_millis(max_ms),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.max.is_zero()
    }

    /// Bounds in milliseconds with `min <= max` enforced.
    pub fn bounds_ms(&self) -> (u64, u64) {
        let lo = self.min.as_millis() as u64;
        let hi = self.max.as_millis() as u64;
        (lo.min(hi), lo.max(hi))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
