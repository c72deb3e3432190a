//! Remote side of the oracle: descriptor translation, the transport
//! seam, and its HTTP, loopback and fault-injecting implementations.

pub mod error;
pub mod fault;
pub mod http;
pub mod loopback;
pub mod query;
pub mod table;
pub mod translate;
pub mod transport;

pub use error::RemoteError;
pub use fault::{Fault, FaultInjection};
pub use http::{HttpTransport, DEFAULT_APP_KEY_HEADER};
pub use loopback::{LoopbackService, DEFAULT_MAX_PAGE_SIZE};
pub use query::TableQuery;
pub use table::RemoteTable;
pub use translate::translate;
pub use transport::{Page, QueryTransport};
