use crate::{Classification, FetchResult};

/// A single URL plus its plain-fetch retry budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub max_retries: u32,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, max_retries: u32) -> Self {
        Self {
            url: url.into(),
            max_retries,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    DirectAttempted,
    EscalateRender,
    DoneSuccess,
    DoneFailure,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::DoneSuccess | Phase::DoneFailure)
    }
}

/// Orchestrator state for one URL. Only [`crate::update`] moves it forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchState {
    request: FetchRequest,
    phase: Phase,
    escalation: Option<Classification>,
    outcome: Option<FetchResult>,
}

impl FetchState {
    pub fn new(request: FetchRequest) -> Self {
        Self {
            request,
            phase: Phase::Init,
            escalation: None,
            outcome: None,
        }
    }

    pub fn request(&self) -> &FetchRequest {
        &self.request
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Classification that caused the browser tier to run, if it did.
    pub fn escalation(&self) -> Option<&Classification> {
        self.escalation.as_ref()
    }

    pub fn result(&self) -> Option<&FetchResult> {
        self.outcome.as_ref()
    }

    pub fn into_result(self) -> Option<FetchResult> {
        self.outcome
    }

    pub(crate) fn enter(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn escalate(&mut self, classification: Classification) {
        self.escalation = Some(classification);
        self.phase = Phase::EscalateRender;
    }

    pub(crate) fn finish(&mut self, result: FetchResult) {
        self.phase = if result.is_success() {
            Phase::DoneSuccess
        } else {
            Phase::DoneFailure
        };
        self.outcome = Some(result);
    }
}
