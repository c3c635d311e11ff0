use std::fmt;

/// Terminal outcome for one URL: exactly one of text or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Success(String),
    Failure(FetchFailure),
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            FetchResult::Success(text) => Some(text),
            FetchResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            FetchResult::Success(_) => None,
            FetchResult::Failure(failure) => Some(failure),
        }
    }

    /// `(content, error)` pair; never both populated.
    pub fn into_pair(self) -> (Option<String>, Option<String>) {
        match self {
            FetchResult::Success(text) => (Some(text), None),
            FetchResult::Failure(failure) => (None, Some(failure.message)),
        }
    }
}

impl From<Result<String, FetchFailure>> for FetchResult {
    fn from(value: Result<String, FetchFailure>) -> Self {
        match value {
            Ok(text) => FetchResult::Success(text),
            Err(failure) => FetchResult::Failure(failure),
        }
    }
}

/// A failure with the human-readable reason handed to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(FailureKind::PermanentNotFound, "404 Not Found")
    }

    pub fn server_exhausted(status: u16) -> Self {
        Self::new(
            FailureKind::TransientServerError { status },
            format!("Max retries failed due to {status} error"),
        )
    }

    pub fn http_status(status: u16) -> Self {
        Self::new(
            FailureKind::HttpStatus(status),
            format!("Failed to load, status code {status}"),
        )
    }

    pub fn transport(cause: impl fmt::Display) -> Self {
        Self::new(FailureKind::TransportError, cause.to_string())
    }

    pub fn insufficient_content() -> Self {
        Self::new(
            FailureKind::InsufficientContent,
            "Scraped page contained insufficient content after rendering.",
        )
    }

    pub fn rendering(last_url: Option<String>, cause: impl fmt::Display) -> Self {
        let message = match &last_url {
            Some(url) => format!("Rendering error: {cause} (last URL: {url})"),
            None => format!("Rendering error: {cause}"),
        };
        Self::new(FailureKind::RenderingError { last_url }, message)
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FetchFailure {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    PermanentNotFound,
    TransientServerError { status: u16 },
    TransportError,
    HttpStatus(u16),
    InsufficientContent,
    RenderingError { last_url: Option<String> },
    /// The state machine stopped without reaching a terminal state.
    Incomplete,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::PermanentNotFound => write!(f, "not found"),
            FailureKind::TransientServerError { status } => {
                write!(f, "server error {status} after retries")
            }
            FailureKind::TransportError => write!(f, "transport error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::InsufficientContent => write!(f, "insufficient content"),
            FailureKind::RenderingError { last_url } => match last_url {
                Some(url) => write!(f, "rendering error at {url}"),
                None => write!(f, "rendering error"),
            },
            FailureKind::Incomplete => write!(f, "incomplete"),
        }
    }
}
