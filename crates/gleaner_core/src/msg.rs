use crate::{Classification, FetchFailure, FetchResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Start processing the request.
    Begin,
    /// The plain fetch gave up; nothing is escalated after this.
    DirectFailed(FetchFailure),
    /// The plain fetch returned a body; `text` is its extracted text.
    DirectFetched {
        classification: Classification,
        text: String,
    },
    /// The browser tier finished.
    RenderFinished(FetchResult),
}
