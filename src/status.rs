//! Status values reported by bus operations and carried as message content.
//!
//! Failures on the dispatch path are data, not raised faults: an unresolved
//! request travels back to its sender as a [`Status`] entity inside the
//! response, and serialization failures compose an outer status wrapping the
//! inner cause. `Status` also implements [`std::error::Error`] so fallible
//! APIs outside the dispatch path can return it with `?`.

use std::any::Any;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::entity::Entity;

/// Outcome categories understood by every bus participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusCode {
    /// The operation succeeded.
    Ok,
    /// No controller claims a request, or no client matches a receiver.
    NotFound,
    /// The operation is deliberately unsupported.
    NotImplemented,
    /// A composite failure wrapping an inner status.
    InternalServerError,
}

impl StatusCode {
    /// Human readable reason phrase.
    pub fn reason(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
            StatusCode::NotImplemented => "Not Implemented",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// A status code with a message and, for composite failures, the inner
/// status that caused it.
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct Status {
    code: StatusCode,
    message: String,
    #[source]
    inner: Option<Box<Status>>,
}

impl Status {
    /// The success status.
    pub fn ok() -> Self {
        Self {
            code: StatusCode::Ok,
            message: "OK".to_string(),
            inner: None,
        }
    }

    /// A `NotFound` status with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::NotFound,
            message: message.into(),
            inner: None,
        }
    }

    /// A `NotImplemented` status with the given message.
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::NotImplemented,
            message: message.into(),
            inner: None,
        }
    }

    /// An `InternalServerError` status with the given message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::InternalServerError,
            message: message.into(),
            inner: None,
        }
    }

    /// Attaches the status that caused this one, forming a composite.
    pub fn wrapping(mut self, inner: Status) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn inner(&self) -> Option<&Status> {
        self.inner.as_deref()
    }

    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::Ok
    }
}

impl Entity for Status {
    fn entity_type(&self) -> &'static str {
        "status"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
