use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PanelError {
    #[error("unknown valve '{0}'")]
    UnknownValve(String),

    #[error("unknown gas source '{0}'")]
    UnknownGasSource(String),

    #[error("a confirmation is pending: {0}")]
    ConfirmationPending(&'static str),

    #[error("no confirmation is pending")]
    NoPendingConfirmation,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}
