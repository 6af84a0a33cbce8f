//! Typed errors for the string-addressed surface.

use thiserror::Error;

/// An identifier string that names nothing in a closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseIdError {
    /// Which set was searched (`screen`, `modal`, `tab`, ...).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseIdError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Failure to turn an action name and argument into an [`crate::session::Action`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// No action has this name.
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    /// The action needs an argument but none was given.
    #[error("action `{0}` requires an argument")]
    MissingArgument(&'static str),
    /// The argument could not be interpreted.
    #[error("invalid argument `{value}` for `{action}`")]
    InvalidArgument {
        /// Action being parsed.
        action: &'static str,
        /// Offending argument.
        value: String,
    },
    /// The argument named an unknown identifier.
    #[error(transparent)]
    UnknownId(#[from] ParseIdError),
}
