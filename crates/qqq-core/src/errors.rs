//! Structured error types shared across the QQQ crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`QqqError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, indices, offending values).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for QQQ assembly.
///
/// Every family is fatal for an assembly run: the inputs are hand-authored
/// tables, so a failure means the tables or the run configuration need fixing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum QqqError {
    /// Malformed, short or inconsistent coefficient and list files.
    #[error("format error: {0}")]
    Format(ErrorInfo),
    /// Two distinct operator origins produced the same derived name.
    #[error("naming error: {0}")]
    Naming(ErrorInfo),
    /// An index field does not fit the canonical key layout.
    #[error("hash range error: {0}")]
    HashRange(ErrorInfo),
    /// Invalid run or solver configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Filesystem access failures.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Serialization and artifact decoding errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Linear solver failures.
    #[error("solver error: {0}")]
    Solver(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl QqqError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            QqqError::Format(info)
            | QqqError::Naming(info)
            | QqqError::HashRange(info)
            | QqqError::Config(info)
            | QqqError::Io(info)
            | QqqError::Serde(info)
            | QqqError::Solver(info) => info,
        }
    }

    /// Wraps an I/O failure for the given path.
    pub fn io(path: impl Display, err: std::io::Error) -> Self {
        QqqError::Io(ErrorInfo::new("io", err.to_string()).with_context("path", path))
    }
}
