use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag identifying how a remote query failed.
///
/// Negative cases declare one of these; the oracle compares it with the
/// tag carried by the error the remote side actually produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The service answered and refused the query (e.g. page too large).
    ServiceRejected,
    /// The predicate uses a construct the translator cannot express.
    PredicateNotTranslatable,
    /// Rejected client-side before any request (negative paging, bad id).
    InvalidArgument,
    /// The request never completed (connect failure, timeout).
    Transport,
    /// The service answered with a body that could not be decoded.
    MalformedResponse,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ServiceRejected => "service_rejected",
            ErrorKind::PredicateNotTranslatable => "predicate_not_translatable",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::Transport => "transport",
            ErrorKind::MalformedResponse => "malformed_response",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
