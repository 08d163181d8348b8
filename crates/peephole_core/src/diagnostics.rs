//! Diagnostics produced by the engine.
//!
//! The engine never fails past its boundary: every problem becomes a [`Diagnostic`] that the host reports.

use std::fmt;

use crate::tree::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// The declaration a diagnostic concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Type(String),
    Member { owner: String, name: String },
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Type(name) => write!(f, "{name}"),
            Subject::Member { owner, name } => write!(f, "{owner}::{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub subject: Subject,
    pub span: Option<Span>,
    pub hints: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, subject: Subject) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            subject,
            span: None,
            hints: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>, subject: Subject) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            subject,
            span: None,
            hints: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.severity, self.message, self.subject)
    }
}

/// `true` when any diagnostic is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

// ============================================================================
// Message catalog
// ============================================================================

/// The diagnostics the engine emits, in one place so front ends and tests agree on the wording.
pub mod messages {
    use super::*;
    use crate::names::Rejected;

    pub fn unsupported_target(subject: Subject) -> Diagnostic {
        Diagnostic::error("#[peep_in] is only supported on a struct or a named field", subject)
            .with_hint("enums, traits and tuple fields have no named fields to mirror")
    }

    pub fn multi_field(subject: Subject) -> Diagnostic {
        Diagnostic::error("#[peep_in] is not supported for multi fields", subject)
            .with_hint("annotate each field separately")
    }

    pub fn name_rejected(subject: Subject, rejected: &Rejected) -> Diagnostic {
        Diagnostic::warning(
            "Not generating a name constant for this field: it does not fit the naming rule",
            subject,
        )
        .with_hint(rejected.to_string())
        .with_hint("pass `customer = \"NAME\"` to pick the constant name explicitly")
    }

    pub fn already_exists(subject: Subject, constant: &str) -> Diagnostic {
        Diagnostic::warning(format!("Not generating {constant}: already exists"), subject)
    }

    pub fn flagged(subject: Subject, severity: Severity) -> Diagnostic {
        let message = "Use of #[peep_in] is flagged according to configuration";
        match severity {
            Severity::Error => Diagnostic::error(message, subject),
            Severity::Warning => Diagnostic::warning(message, subject),
        }
    }
}
