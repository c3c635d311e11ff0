use crate::config::ClassifierConfig;
use crate::domain::{classify_domain, DomainClass};

/// Verdict on a plain-fetch response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    pub is_stub: bool,
    pub is_short: bool,
    pub is_aggregator: bool,
}

impl Classification {
    pub fn needs_escalation(&self) -> bool {
        self.is_stub || self.is_short || self.is_aggregator
    }

    /// Short human label of why escalation happens, for logs.
    pub fn describe(&self) -> String {
        let mut reasons = Vec::new();
        if self.is_stub {
            reasons.push("stub");
        }
        if self.is_short {
            reasons.push("short");
        }
        if self.is_aggregator {
            reasons.push("aggregator");
        }
        if reasons.is_empty() {
            "complete".to_string()
        } else {
            reasons.join("+")
        }
    }
}

/// Classify a plain-fetch body.
///
/// `extracted_text` is the body after boilerplate stripping; `blocked` marks a
/// 403 passthrough, which counts as a stub whatever its body says.
pub fn classify(
    body: &str,
    extracted_text: &str,
    url: &str,
    blocked: bool,
    config: &ClassifierConfig,
    trusted_domains: &[String],
) -> Classification {
    Classification {
        is_stub: blocked || contains_any(body, &config.placeholder_indicators),
        is_short: extracted_text.chars().count() < config.min_content_chars,
        is_aggregator: classify_domain(url, trusted_domains) == DomainClass::Aggregator,
    }
}

/// Paywall wording in already-extracted text.
pub fn mentions_paywall(text: &str, config: &ClassifierConfig) -> bool {
    contains_any(text, &config.paywall_indicators)
}

/// Case-insensitive substring test against a phrase list.
pub fn contains_any(haystack: &str, phrases: &[String]) -> bool {
    let lowered = haystack.to_lowercase();
    phrases
        .iter()
        .filter(|p| !p.is_empty())
        .any(|p| lowered.contains(&p.to_lowercase()))
}
