use std::sync::Once;

use gleaner_core::{
    update, Classification, Effect, FailureKind, FetchFailure, FetchRequest, FetchResult,
    FetchState, Msg, Phase,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn begin(url: &str) -> (FetchState, Vec<Effect>) {
    update(FetchState::new(FetchRequest::new(url, 3)), Msg::Begin)
}

fn long_text() -> String {
    "word ".repeat(40).trim().to_string()
}

#[test]
fn begin_always_runs_the_direct_fetch_first() {
    init_logging();
    let (state, effects) = begin("http://example.com/a");

    assert_eq!(state.phase(), Phase::DirectAttempted);
    assert_eq!(
        effects,
        vec![Effect::FetchDirect {
            url: "http://example.com/a".to_string(),
            max_retries: 3,
        }]
    );
}

#[test]
fn direct_failure_is_terminal_without_escalation() {
    init_logging();
    let (state, _) = begin("http://example.com/missing");
    let (state, effects) = update(state, Msg::DirectFailed(FetchFailure::not_found()));

    assert_eq!(state.phase(), Phase::DoneFailure);
    assert!(effects.is_empty());
    assert!(state.escalation().is_none());
    assert_eq!(
        state.result(),
        Some(&FetchResult::Failure(FetchFailure::not_found()))
    );
}

#[test]
fn complete_direct_fetch_succeeds_locally() {
    init_logging();
    let (state, _) = begin("http://example.com/article");
    let (state, effects) = update(
        state,
        Msg::DirectFetched {
            classification: Classification::default(),
            text: long_text(),
        },
    );

    assert_eq!(state.phase(), Phase::DoneSuccess);
    assert!(effects.is_empty());
    assert_eq!(state.into_result(), Some(FetchResult::Success(long_text())));
}

#[test]
fn stub_classification_escalates_to_render() {
    init_logging();
    let (state, _) = begin("http://example.com/a");
    let classification = Classification {
        is_stub: true,
        is_short: true,
        is_aggregator: false,
    };
    let (state, effects) = update(
        state,
        Msg::DirectFetched {
            classification,
            text: "Enable JavaScript to continue".into(),
        },
    );

    assert_eq!(state.phase(), Phase::EscalateRender);
    assert_eq!(state.escalation(), Some(&classification));
    assert_eq!(
        effects,
        vec![Effect::FetchRendered {
            url: "http://example.com/a".to_string(),
            aggregator: false,
        }]
    );
}

#[test]
fn aggregator_escalates_even_with_ample_content() {
    init_logging();
    let (state, _) = begin("http://statista.com/chart/1");
    let (state, effects) = update(
        state,
        Msg::DirectFetched {
            classification: Classification {
                is_stub: false,
                is_short: false,
                is_aggregator: true,
            },
            text: long_text(),
        },
    );

    assert_eq!(state.phase(), Phase::EscalateRender);
    assert_eq!(
        effects,
        vec![Effect::FetchRendered {
            url: "http://statista.com/chart/1".to_string(),
            aggregator: true,
        }]
    );
}

#[test]
fn render_outcome_decides_terminal_state() {
    init_logging();
    let escalated = || {
        let (state, _) = begin("http://example.com/a");
        let (state, _) = update(
            state,
            Msg::DirectFetched {
                classification: Classification {
                    is_stub: true,
                    ..Classification::default()
                },
                text: String::new(),
            },
        );
        state
    };

    let (ok, effects) = update(escalated(), Msg::RenderFinished(FetchResult::Success(long_text())));
    assert_eq!(ok.phase(), Phase::DoneSuccess);
    assert!(effects.is_empty());

    let failure = FetchFailure::rendering(Some("http://example.com/a".into()), "timed out");
    let (failed, _) = update(escalated(), Msg::RenderFinished(FetchResult::Failure(failure.clone())));
    assert_eq!(failed.phase(), Phase::DoneFailure);
    assert_eq!(failed.into_result(), Some(FetchResult::Failure(failure)));
}

#[test]
fn empty_render_text_is_insufficient_content() {
    init_logging();
    let (state, _) = begin("http://example.com/a");
    let (state, _) = update(
        state,
        Msg::DirectFetched {
            classification: Classification {
                is_short: true,
                ..Classification::default()
            },
            text: String::new(),
        },
    );
    let (state, _) = update(state, Msg::RenderFinished(FetchResult::Success(String::new())));

    let failure = state.result().and_then(FetchResult::failure).cloned();
    assert_eq!(failure.map(|f| f.kind), Some(FailureKind::InsufficientContent));
}
