use url::Url;

/// Whether a URL belongs to a known aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainClass {
    Aggregator,
    Ordinary,
}

/// Lower-cased host of `url`, if it parses as an absolute URL with a host.
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url.trim())
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_end_matches('.').to_ascii_lowercase()))
}

/// `host` equals `domain` or is a subdomain of it.
pub fn host_matches(host: &str, domain: &str) -> bool {
    let domain = domain.trim().trim_start_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        return false;
    }
    host == domain
        || host
            .strip_suffix(domain.as_str())
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Classify `url` against the aggregator allow-list. Unparsable URLs are ordinary.
pub fn classify_domain(url: &str, trusted_domains: &[String]) -> DomainClass {
    match host_of(url) {
        Some(host) if trusted_domains.iter().any(|d| host_matches(&host, d)) => {
            DomainClass::Aggregator
        }
        _ => DomainClass::Ordinary,
    }
}
