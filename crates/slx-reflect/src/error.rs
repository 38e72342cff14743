//! Diagnostics collected during reflection.
//!
//! Reflection never aborts its traversal: field-level failures are recorded
//! as [`Report`]s and the default value stands.

use std::fmt;

use slx_ast::{MapError, SourceArea};

/// Severity of a reflection report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// What went wrong while interpreting a state block.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReportKind {
    /// A state keyword failed to resolve to an enumerator.
    #[error(transparent)]
    MapFailure(#[from] MapError),

    /// The field requires a literal value.
    #[error("expected literal value")]
    ExpectedLiteral,

    /// The field requires an enumeration keyword.
    #[error("expected state keyword")]
    ExpectedStateKeyword,

    /// The field requires a nested state initializer.
    #[error("expected state initializer block")]
    ExpectedStateInitializer,

    /// The field name is not recognized in this block.
    #[error("unknown state keyword in {0} block")]
    UnknownStateKeyword(&'static str),

    /// A value had the wrong number of arguments (e.g. `BorderColor`).
    #[error("invalid argument count for {0}")]
    InvalidArgCount(&'static str),

    /// A value had the wrong type (e.g. a non-vector `BorderColor`).
    #[error("invalid argument type for {0}")]
    InvalidArgType(&'static str),
}

/// A diagnostic attached to the source area of the offending node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub severity: Severity,
    pub kind: ReportKind,
    pub area: SourceArea,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.area.is_valid() {
            write!(f, "{} ({}): {}", self.severity, self.area, self.kind)
        } else {
            write!(f, "{}: {}", self.severity, self.kind)
        }
    }
}

/// Collects reports during a reflection pass.
#[derive(Debug, Default)]
pub struct Reporter {
    reports: Vec<Report>,
    warnings_enabled: bool,
}

impl Reporter {
    pub fn new(warnings_enabled: bool) -> Self {
        Self {
            reports: Vec::new(),
            warnings_enabled,
        }
    }

    /// Records a warning, if warnings are enabled.
    pub fn warning(&mut self, kind: ReportKind, area: SourceArea) {
        if !self.warnings_enabled {
            return;
        }
        log::warn!("{kind}");
        self.reports.push(Report {
            severity: Severity::Warning,
            kind,
            area,
        });
    }

    /// Records an error. The traversal continues regardless.
    pub fn error(&mut self, kind: ReportKind, area: SourceArea) {
        self.reports.push(Report {
            severity: Severity::Error,
            kind,
            area,
        });
    }

    pub fn into_reports(self) -> Vec<Report> {
        self.reports
    }
}
