use thiserror::Error;

use crate::control::RequestId;

/// Errors that end a decision flow without a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The request was aborted while the flow waited for the user. No
    /// headers were changed.
    #[error("request {0} aborted while waiting for a decision")]
    Aborted(RequestId),
}
