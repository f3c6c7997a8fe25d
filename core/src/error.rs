//! Typed failures of the core operations.
//!
//! Nothing here is allowed to abort the request loop: a `CheckerFailure`
//! drops one checker's contribution from a validation pass, and
//! `RefactorUnavailable` renders as an empty result, not a protocol error.

use thiserror::Error;

/// A linter, type-checker, or engine invocation failed or returned
/// malformed output.
#[derive(Debug, Clone, Error)]
#[error("{checker}: {message}")]
pub struct CheckerFailure {
    /// Tool tag ("engine", "pyflakes", "pycodestyle", "mypy", "yapf").
    pub checker: &'static str,
    pub message: String,
}

impl CheckerFailure {
    #[must_use]
    pub fn new(checker: &'static str, message: impl Into<String>) -> Self {
        Self {
            checker,
            message: message.into(),
        }
    }
}

/// A rename/inline/extract was requested at a position where no
/// refactoring applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no refactoring applies at this position")]
pub struct RefactorUnavailable;
