use verity_model::ErrorKind;

/// Everything that can go wrong between a descriptor and a decoded page.
///
/// Each variant maps onto exactly one [`ErrorKind`], which is what
/// negative cases match against.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The service answered with an error status.
    #[error("service rejected the request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The predicate uses something the query language cannot express.
    #[error("predicate not translatable: {reason}")]
    NotTranslatable { reason: String },

    /// Caught before any request was sent.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The request did not complete (connect failure, timeout, I/O).
    #[error("transport failure: {message}")]
    Transport { message: String },

    /// The service answered but the body could not be decoded.
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },
}

impl RemoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RemoteError::Rejected { .. } => ErrorKind::ServiceRejected,
            RemoteError::NotTranslatable { .. } => ErrorKind::PredicateNotTranslatable,
            RemoteError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            RemoteError::Transport { .. } => ErrorKind::Transport,
            RemoteError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
        }
    }
}
