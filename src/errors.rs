use thiserror::Error;

//create types errors for easy testability

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("failed to fetch {endpoint}: {source}")]
    FetchError {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("fetch of {endpoint} timed out after {timeout_ms}ms")]
    Timeout { endpoint: String, timeout_ms: u64 },

    #[error("{endpoint} answered with HTTP {status}")]
    BadStatus { endpoint: String, status: u16 },

    #[error("failed to parse {field} from {metric}: {raw}")]
    ParseError {
        metric: String,
        field: String,
        raw: String,
    },

    #[error("cpu {cpu} counter for mode {mode} went backwards between samples")]
    CounterReset { cpu: String, mode: &'static str },
}

impl CollectorError {
    /// True for failures reaching the endpoint, as opposed to bad data.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::FetchError { .. } | Self::Timeout { .. } | Self::BadStatus { .. }
        )
    }
}
