//! In-process stand-in for the table service.
//!
//! Receives the same [`TableQuery`] the HTTP transport would send, parses
//! it back into a descriptor and answers from its own copy of the dataset
//! using the reference evaluator. Identities are assigned `1..=N` in
//! dataset order, as the service does on insert.

pub mod parse;

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use verity_eval::EvalConfig;
use verity_model::{Dataset, QueryDescriptor, Record};

use crate::error::RemoteError;
use crate::query::TableQuery;
use crate::transport::{Page, QueryTransport};

pub use parse::{parse_filter, parse_order_by, ParseError};

pub const DEFAULT_MAX_PAGE_SIZE: u64 = 1000;

pub struct LoopbackService {
    dataset: Dataset,
    config: EvalConfig,
    max_page_size: u64,
    calls: AtomicUsize,
}

impl LoopbackService {
    pub fn new(dataset: &Dataset) -> Self {
        LoopbackService {
            dataset: dataset.with_identities(),
            config: EvalConfig::default(),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_page_size(mut self, max_page_size: u64) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    /// Number of requests received so far (reads and lookups).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn bad_request(message: String) -> RemoteError {
        RemoteError::Rejected {
            status: 400,
            message,
        }
    }

    fn descriptor_for(&self, query: &TableQuery) -> Result<QueryDescriptor, RemoteError> {
        let mut descriptor = QueryDescriptor::new();

        if let Some(filter) = &query.filter {
            let predicate = parse_filter(filter)
                .map_err(|e| Self::bad_request(format!("invalid $filter: {}", e)))?;
            descriptor = descriptor.filter(predicate);
        }
        if let Some(order_by) = &query.order_by {
            let clauses = parse_order_by(order_by)
                .map_err(|e| Self::bad_request(format!("invalid $orderby: {}", e)))?;
            descriptor = clauses
                .into_iter()
                .fold(descriptor, |d, clause| d.order_by(clause));
        }
        if let Some(top) = query.top {
            if top > self.max_page_size {
                return Err(Self::bad_request(format!(
                    "The value of the $top parameter ({}) exceeds the maximum of {}",
                    top, self.max_page_size
                )));
            }
            descriptor = descriptor.take(to_i64(top)?);
        }
        if let Some(skip) = query.skip {
            descriptor = descriptor.skip(to_i64(skip)?);
        }
        if query.inline_count {
            descriptor = descriptor.include_total_count();
        }
        Ok(descriptor)
    }
}

fn to_i64(v: u64) -> Result<i64, RemoteError> {
    i64::try_from(v).map_err(|_| LoopbackService::bad_request(format!("{} is out of range", v)))
}

#[async_trait]
impl QueryTransport for LoopbackService {
    async fn query(&self, query: &TableQuery) -> Result<Page, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let descriptor = self.descriptor_for(query)?;
        let expected = verity_eval::evaluate(&descriptor, &self.dataset, &self.config).map_err(
            |e| RemoteError::Rejected {
                status: 500,
                message: e.to_string(),
            },
        )?;
        Ok(Page {
            records: expected.records,
            total_count: expected.total_count,
        })
    }

    async fn lookup(&self, id: i64) -> Result<Record, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.dataset
            .by_identity(id)
            .cloned()
            .ok_or_else(|| RemoteError::Rejected {
                status: 404,
                message: format!("no record with id {}", id),
            })
    }

    fn transport_id(&self) -> &str {
        "loopback"
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn dataset() -> Dataset {
        (1990..2000)
            .map(|year| Record {
                id: None,
                title: format!("Movie {}", year),
                year,
                duration: 90 + (year - 1990),
                rating: "PG".to_string(),
                release_date: datetime!(1990-06-01 0:00 UTC),
                best_picture_winner: year % 2 == 0,
            })
            .collect()
    }

    #[tokio::test]
    async fn answers_filtered_counted_pages() {
        let service = LoopbackService::new(&dataset());
        let query = TableQuery {
            filter: Some("(bestPictureWinner eq true)".to_string()),
            order_by: Some("year desc".to_string()),
            top: Some(2),
            skip: None,
            inline_count: true,
        };
        let page = service.query(&query).await.unwrap();
        let years: Vec<i64> = page.records.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![1998, 1996]);
        assert_eq!(page.total_count, Some(5));
        assert_eq!(page.records[0].id, Some(9));
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn oversized_page_is_rejected() {
        let service = LoopbackService::new(&dataset()).with_max_page_size(5);
        let query = TableQuery {
            top: Some(6),
            ..TableQuery::default()
        };
        let err = service.query(&query).await.unwrap_err();
        assert!(matches!(err, RemoteError::Rejected { status: 400, .. }));
    }

    #[tokio::test]
    async fn bad_filter_is_rejected() {
        let service = LoopbackService::new(&dataset());
        let query = TableQuery {
            filter: Some("(year gt".to_string()),
            ..TableQuery::default()
        };
        let err = service.query(&query).await.unwrap_err();
        assert!(matches!(err, RemoteError::Rejected { status: 400, .. }));
    }

    #[tokio::test]
    async fn lookup_by_identity() {
        let service = LoopbackService::new(&dataset());
        let record = service.lookup(1).await.unwrap();
        assert_eq!(record.title, "Movie 1990");
        assert_eq!(record.id, Some(1));
        let err = service.lookup(11).await.unwrap_err();
        assert!(matches!(err, RemoteError::Rejected { status: 404, .. }));
        assert_eq!(service.calls(), 2);
    }
}
