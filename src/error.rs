use thiserror::Error;

use crate::window::WindowKey;

#[derive(Debug, Error)]
pub enum RealmError {
    /// A command type no reducer understands. Fatal for the receiving window.
    #[error("unknown command type: {0}")]
    UnknownCommand(String),
    #[error("window {0} halted after a fatal command")]
    WindowFaulted(WindowKey),
    #[error("malformed state patch: {0}")]
    MalformedPatch(#[from] serde_json::Error),
}

pub type Result<T, E = RealmError> = std::result::Result<T, E>;
