/// Work the driver must perform and report back as a [`crate::Msg`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchDirect { url: String, max_retries: u32 },
    FetchRendered { url: String, aggregator: bool },
}
