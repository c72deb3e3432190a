//! The seam between the oracle and whatever answers table queries.

use async_trait::async_trait;
use serde::Deserialize;
use verity_model::Record;

use crate::error::RemoteError;
use crate::query::TableQuery;

/// One decoded response to a table read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub records: Vec<Record>,
    /// Present only when the query asked for an inline count and the
    /// service supplied one.
    pub total_count: Option<u64>,
}

/// Something that can answer table reads and single-record lookups.
///
/// Implementations must be usable from many concurrent runs.
#[async_trait]
pub trait QueryTransport: Send + Sync {
    async fn query(&self, query: &TableQuery) -> Result<Page, RemoteError>;

    async fn lookup(&self, id: i64) -> Result<Record, RemoteError>;

    /// Short name for logs.
    fn transport_id(&self) -> &str;
}

#[derive(Deserialize)]
struct CountedBody {
    results: Vec<Record>,
    #[serde(default)]
    count: Option<u64>,
}

/// Decode a table-read body: either a bare array of records or
/// `{"results": [...], "count": N}`.
pub fn decode_page(body: serde_json::Value) -> Result<Page, RemoteError> {
    let malformed = |e: serde_json::Error| RemoteError::MalformedResponse {
        message: e.to_string(),
    };
    match body {
        serde_json::Value::Array(_) => Ok(Page {
            records: serde_json::from_value(body).map_err(malformed)?,
            total_count: None,
        }),
        serde_json::Value::Object(_) => {
            let counted: CountedBody = serde_json::from_value(body).map_err(malformed)?;
            Ok(Page {
                records: counted.results,
                total_count: counted.count,
            })
        }
        other => Err(RemoteError::MalformedResponse {
            message: format!("expected an array or object, got {}", json_kind(&other)),
        }),
    }
}

pub fn decode_record(body: serde_json::Value) -> Result<Record, RemoteError> {
    serde_json::from_value(body).map_err(|e| RemoteError::MalformedResponse {
        message: e.to_string(),
    })
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
