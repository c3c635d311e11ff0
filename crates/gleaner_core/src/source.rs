//! Rules for accepting a source link found on an aggregator page.

use url::Url;

use crate::domain::{classify_domain, host_of, DomainClass};

/// Why a candidate link was or was not taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateVerdict {
    Accepted(String),
    Empty,
    NotHttp,
    SelfLoop,
    SameHost,
}

/// Drop the query string and fragment.
pub fn normalize_candidate(raw: &str) -> String {
    let trimmed = raw.trim();
    let end = trimmed.find(['?', '#']).unwrap_or(trimmed.len());
    trimmed[..end].to_string()
}

/// Judge one candidate link.
///
/// `current_url` is where the browser is now, `aggregator_url` the URL that was
/// requested. A candidate that normalizes to the current page is always
/// rejected. Trusted aggregators accept any other http(s) link; other pages
/// only accept links to a different host.
pub fn judge_candidate(
    raw: &str,
    current_url: &str,
    aggregator_url: &str,
    trusted_domains: &[String],
) -> CandidateVerdict {
    let candidate = normalize_candidate(raw);
    if candidate.is_empty() {
        return CandidateVerdict::Empty;
    }
    match Url::parse(&candidate) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        _ => return CandidateVerdict::NotHttp,
    }
    if same_page(&candidate, current_url) {
        return CandidateVerdict::SelfLoop;
    }
    if classify_domain(aggregator_url, trusted_domains) == DomainClass::Aggregator {
        return CandidateVerdict::Accepted(candidate);
    }
    match (host_of(&candidate), host_of(current_url)) {
        (Some(candidate_host), Some(current_host)) if candidate_host == current_host => {
            CandidateVerdict::SameHost
        }
        _ => CandidateVerdict::Accepted(candidate),
    }
}

fn same_page(candidate: &str, current_url: &str) -> bool {
    let current = current_url.trim();
    let bare = normalize_candidate(current);
    let strip = |s: &str| s.trim_end_matches('/').to_ascii_lowercase();
    strip(candidate) == strip(current) || strip(candidate) == strip(&bare)
}
