use std::time::Duration;

use gleaner_core::{DelayRange, GleanerConfig, Locator};
use pretty_assertions::assert_eq;

#[test]
fn empty_config_file_yields_defaults() {
    let cfg: GleanerConfig = ron::from_str("()").unwrap();
    assert_eq!(cfg, GleanerConfig::default());
}

#[test]
fn partial_config_overrides_only_named_fields() {
    let text = r#"(
        direct: (max_retries: 5, backoff_base_ms: 250),
        aggregator: (trusted_domains: ["ourworldindata.org"]),
        render: (settle_delay: (min_ms: 10, max_ms: 20)),
        obstacles: (hold_locator: id("press-here")),
    )"#;
    let cfg: GleanerConfig = ron::from_str(text).unwrap();

    assert_eq!(cfg.direct.max_retries, 5);
    assert_eq!(cfg.direct.backoff_base, Duration::from_millis(250));
    assert_eq!(cfg.direct.request_timeout, Duration::from_secs(30));
    assert_eq!(cfg.aggregator.trusted_domains, vec!["ourworldindata.org"]);
    assert_eq!(cfg.aggregator.link_attributes.len(), 4);
    assert_eq!(cfg.render.settle_delay, DelayRange::from_millis(10, 20));
    assert_eq!(cfg.obstacles.hold_locator, Locator::Id("press-here".into()));
}

#[test]
fn defaults_survive_a_round_trip() {
    let text = ron::ser::to_string_pretty(&GleanerConfig::default(), Default::default()).unwrap();
    let back: GleanerConfig = ron::from_str(&text).unwrap();
    assert_eq!(back, GleanerConfig::default());
}
