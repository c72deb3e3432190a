use std::sync::Arc;

use verity_model::{QueryDescriptor, Record};

use crate::error::RemoteError;
use crate::transport::{Page, QueryTransport};
use crate::translate::translate;

/// Client handle for one remote table.
///
/// Validation and translation happen here, so a failure at this layer
/// never costs a round trip.
#[derive(Clone)]
pub struct RemoteTable {
    transport: Arc<dyn QueryTransport>,
}

impl RemoteTable {
    pub fn new(transport: Arc<dyn QueryTransport>) -> Self {
        RemoteTable { transport }
    }

    pub fn transport_id(&self) -> &str {
        self.transport.transport_id()
    }

    /// Translate `descriptor` and issue exactly one read.
    pub async fn read(&self, descriptor: &QueryDescriptor) -> Result<Page, RemoteError> {
        let query = translate(descriptor)?;
        tracing::debug!(transport = self.transport_id(), query = %query, "issuing table read");
        self.transport.query(&query).await
    }

    /// Fetch a single record by identity.
    pub async fn lookup(&self, id: i64) -> Result<Record, RemoteError> {
        if id <= 0 {
            return Err(RemoteError::InvalidArgument {
                reason: format!("record id must be positive, got {}", id),
            });
        }
        tracing::debug!(transport = self.transport_id(), id, "issuing lookup");
        self.transport.lookup(id).await
    }
}
