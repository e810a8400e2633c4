// SPDX-License-Identifier: MIT OR Apache-2.0
//! A status-coded error value that can wrap an arbitrary cause.

use crate::codes::code_name;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tonic::{Code, Status};

/// Error carrying a gRPC status code, a message, an optional cause and
/// structured context.
///
/// ```
/// use retriable_core::{Code, StatusError};
///
/// let err = StatusError::new(Code::Unavailable, "upstream refused connection")
///     .with_context("endpoint", "firehose:443")
///     .with_context("attempt", 2);
/// assert_eq!(err.code, Code::Unavailable);
/// ```
pub struct StatusError {
    /// Status code carried by this link.
    pub code: Code,
    /// Human-readable description.
    pub message: String,
    /// Optional underlying cause.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    /// Arbitrary structured context for diagnostics.
    pub context: BTreeMap<String, serde_json::Value>,
}

impl StatusError {
    /// Create a new error with the given code and message.
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
            context: BTreeMap::new(),
        }
    }

    /// Attach a key-value pair to the diagnostic context. Values that fail to
    /// serialise are dropped.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Attach an underlying cause.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Whether this link's own code is retriable. The cause is not consulted.
    pub fn is_retriable(&self) -> bool {
        crate::lookup(self.code)
    }
}

impl fmt::Debug for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("StatusError");
        d.field("code", &self.code);
        d.field("message", &self.message);
        if let Some(ref src) = self.source {
            d.field("source", &src.to_string());
        }
        if !self.context.is_empty() {
            d.field("context", &self.context);
        }
        d.finish()
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", code_name(self.code), self.message)?;
        if !self.context.is_empty()
            && let Ok(ctx) = serde_json::to_string(&self.context)
        {
            write!(f, " {ctx}")?;
        }
        Ok(())
    }
}

impl std::error::Error for StatusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<Status> for StatusError {
    fn from(status: Status) -> Self {
        Self::new(status.code(), status.message())
    }
}

impl From<StatusError> for Status {
    fn from(err: StatusError) -> Self {
        Status::new(err.code, err.message)
    }
}
