//! Common error types used across the workspace.
//!
//! Registration-time and query-time failures surface as [`CadenceError`].
//! Failures that happen *inside* an iteration never do: they are converted
//! into [`StepFault`](crate::step::StepFault) values and stored in history.

/// Top-level error returned by the scheduler's public operations.
#[derive(Debug, thiserror::Error)]
pub enum CadenceError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The scheduler's execution context is no longer running.
    #[error("scheduler is not running")]
    Unavailable,
}

/// A malformed registration request. No state is mutated when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("action name must not be blank")]
    BlankName,

    #[error("the scheduled action interval must not be negative, got {0}")]
    NegativeInterval(i64),

    #[error("the amount of provided action steps must be greater than zero")]
    NoSteps,

    #[error("the amount of maximum action history items must be greater than zero, got {0}")]
    HistoryTooSmall(i64),

    #[error("an action named '{0}' has already been scheduled, remove it first")]
    AlreadyScheduled(String),
}

/// Lookup of an action name that is not registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("the action '{name}' is not known, has it been scheduled?")]
pub struct NotFoundError {
    pub name: String,
}

impl NotFoundError {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Fault raised by an external device collaborator (gesture executor,
/// hierarchy dumper, cache refresher, screen capturer).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("no element matches {0}")]
    ElementNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Failed(String),
}
