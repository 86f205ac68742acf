use std::fmt;

use crate::documents::ListError;
use crate::upload::UploadError;

/// Identity tag carried by every query command and settlement event. The
/// controller compares it against its live session before applying anything.
pub type SessionId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The query for `session_id` resolved to exactly one outcome.
    QuerySettled {
        session_id: SessionId,
        result: Result<QueryResponse, QueryError>,
    },
    /// The configured wait budget for `session_id` elapsed without a
    /// settlement having been delivered yet.
    QueryDeadline { session_id: SessionId },
    UploadFinished {
        result: Result<String, UploadError>,
    },
    DocumentsListed {
        result: Result<Vec<String>, ListError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<SourceSnippet>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSnippet {
    pub content: String,
    pub document: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    pub kind: QueryFailureKind,
    /// Diagnostic text for logging; user-facing wording is derived from
    /// `kind` by the controller.
    pub message: String,
}

impl QueryError {
    pub(crate) fn new(kind: QueryFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryFailureKind {
    /// The transport-level request timeout fired.
    Timeout,
    /// The cancellation token was triggered while the call was in flight.
    Cancelled,
    Network,
    /// The endpoint returned an error payload; `message` is its `message`
    /// field when one was present.
    Server { message: Option<String> },
}

impl fmt::Display for QueryFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryFailureKind::Timeout => write!(f, "timeout"),
            QueryFailureKind::Cancelled => write!(f, "cancelled"),
            QueryFailureKind::Network => write!(f, "network error"),
            QueryFailureKind::Server { message } => match message {
                Some(message) => write!(f, "server error: {message}"),
                None => write!(f, "server error"),
            },
        }
    }
}
