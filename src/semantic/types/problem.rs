//! Problems (diagnostics) attached to a top context.
//!
//! The graph only stores and clears them; producing problems is the job of
//! whoever builds the graph.

use std::fmt;
use std::sync::Arc;

use crate::base::Span;

/// Severity level of a problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Hint,
}

/// Which stage reported a problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ProblemSource {
    #[default]
    Unknown,
    Lexer,
    Parser,
    SemanticAnalysis,
    Preprocessor,
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Problem {
    pub severity: Severity,
    pub message: Arc<str>,
    pub range: Span,
    pub source: ProblemSource,
}

impl Problem {
    /// Create a new error problem.
    pub fn error(range: Span, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            range,
            source: ProblemSource::Unknown,
        }
    }

    /// Create a new warning problem.
    pub fn warning(range: Span, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            range,
            source: ProblemSource::Unknown,
        }
    }

    pub fn hint(range: Span, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Hint,
            message: message.into(),
            range,
            source: ProblemSource::Unknown,
        }
    }

    /// Set the reporting stage.
    pub fn with_source(mut self, source: ProblemSource) -> Self {
        self.source = source;
        self
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Hint => "hint",
        };
        write!(f, "{level} at {}: {}", self.range, self.message)
    }
}
