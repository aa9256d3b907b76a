use thiserror::Error;

/// Top-level error type for Switchboard.
#[derive(Debug, Error)]
pub enum SwitchboardError {
    #[error("{namespace} command `{id}` is already registered")]
    DuplicateCommand { namespace: &'static str, id: String },

    #[error("command `{0}` has no callback attached")]
    MissingCallback(String),

    #[error("command `{id}` is declared as {declared} but its callback handles {callback}")]
    CallbackMismatch {
        id: String,
        declared: String,
        callback: String,
    },

    #[error("invalid prefix {0:?}: must be non-empty and contain no whitespace")]
    InvalidPrefix(String),

    #[error("outbound registration failed ({scope}): {message}")]
    SinkFailed { scope: String, message: String },
}

pub type Result<T, E = SwitchboardError> = std::result::Result<T, E>;
