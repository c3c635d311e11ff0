use crate::{Effect, FetchFailure, FetchResult, FetchState, Msg, Phase};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that do not fit the current phase leave the state untouched, so a
/// terminal state never changes and the browser tier can be requested at most
/// once per state.
pub fn update(mut state: FetchState, msg: Msg) -> (FetchState, Vec<Effect>) {
    let effects = match (state.phase(), msg) {
        (Phase::Init, Msg::Begin) => {
            state.enter(Phase::DirectAttempted);
            vec![Effect::FetchDirect {
                url: state.request().url.clone(),
                max_retries: state.request().max_retries,
            }]
        }
        (Phase::DirectAttempted, Msg::DirectFailed(failure)) => {
            state.finish(FetchResult::Failure(failure));
            Vec::new()
        }
        (Phase::DirectAttempted, Msg::DirectFetched { classification, text }) => {
            if classification.needs_escalation() {
                escalate(&mut state, classification)
            } else {
                state.finish(FetchResult::Success(text));
                Vec::new()
            }
        }
        (Phase::EscalateRender, Msg::RenderFinished(result)) => {
            state.finish(match result {
                FetchResult::Success(text) if text.is_empty() => {
                    FetchResult::Failure(FetchFailure::insufficient_content())
                }
                other => other,
            });
            Vec::new()
        }
        _ => Vec::new(),
    };

    (state, effects)
}

fn escalate(state: &mut FetchState, classification: crate::Classification) -> Vec<Effect> {
    state.escalate(classification);
    vec![Effect::FetchRendered {
        url: state.request().url.clone(),
        aggregator: classification.is_aggregator,
    }]
}
