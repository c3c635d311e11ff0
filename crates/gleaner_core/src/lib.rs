//! Gleaner core: configuration, classification rules and the per-URL fetch
//! state machine. Nothing in here touches the network or a browser.
mod classify;
mod config;
mod domain;
mod effect;
mod msg;
mod result;
mod source;
mod state;
mod update;

pub use classify::{classify, contains_any, mentions_paywall, Classification};
pub use config::{
    AggregatorConfig, ClassifierConfig, DelayRange, DirectConfig, ExtractConfig, GleanerConfig,
    Locator, ObstacleConfig, RenderConfig,
};
pub use domain::{classify_domain, host_matches, host_of, DomainClass};
pub use effect::Effect;
pub use msg::Msg;
pub use result::{FailureKind, FetchFailure, FetchResult};
pub use source::{judge_candidate, normalize_candidate, CandidateVerdict};
pub use state::{FetchRequest, FetchState, Phase};
pub use update::update;
