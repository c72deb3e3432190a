//! Deliberately wrong transports, for proving the oracle notices.

use std::sync::Arc;

use async_trait::async_trait;
use verity_model::Record;

use crate::error::RemoteError;
use crate::query::TableQuery;
use crate::transport::{Page, QueryTransport};

/// One way of corrupting a successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Drop the last record of every page.
    DropLast,
    /// Repeat the first record of every page.
    DuplicateFirst,
    /// Append a marker to every title.
    PerturbTitle,
    /// Return records in reverse order.
    Reverse,
    /// Report one more than the real total count.
    SkewCount,
    /// Never report a total count.
    OmitCount,
}

impl Fault {
    pub const ALL: [Fault; 6] = [
        Fault::DropLast,
        Fault::DuplicateFirst,
        Fault::PerturbTitle,
        Fault::Reverse,
        Fault::SkewCount,
        Fault::OmitCount,
    ];

    fn apply(self, mut page: Page) -> Page {
        match self {
            Fault::DropLast => {
                page.records.pop();
            }
            Fault::DuplicateFirst => {
                if let Some(first) = page.records.first().cloned() {
                    page.records.insert(0, first);
                }
            }
            Fault::PerturbTitle => page.records.iter_mut().for_each(perturb),
            Fault::Reverse => page.records.reverse(),
            Fault::SkewCount => page.total_count = page.total_count.map(|c| c + 1),
            Fault::OmitCount => page.total_count = None,
        }
        page
    }
}

fn perturb(record: &mut Record) {
    record.title.push_str(" (altered)");
}

/// Wraps a transport and corrupts what it returns.
pub struct FaultInjection {
    inner: Arc<dyn QueryTransport>,
    fault: Fault,
}

impl FaultInjection {
    pub fn new(inner: Arc<dyn QueryTransport>, fault: Fault) -> Self {
        FaultInjection { inner, fault }
    }
}

#[async_trait]
impl QueryTransport for FaultInjection {
    async fn query(&self, query: &TableQuery) -> Result<Page, RemoteError> {
        let page = self.inner.query(query).await?;
        tracing::warn!(fault = ?self.fault, "injecting fault into page");
        Ok(self.fault.apply(page))
    }

    async fn lookup(&self, id: i64) -> Result<Record, RemoteError> {
        let mut record = self.inner.lookup(id).await?;
        if self.fault == Fault::PerturbTitle {
            tracing::warn!(fault = ?self.fault, id, "injecting fault into lookup");
            perturb(&mut record);
        }
        Ok(record)
    }

    fn transport_id(&self) -> &str {
        "fault-injection"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn page() -> Page {
        let movie = |title: &str| Record {
            id: None,
            title: title.to_string(),
            year: 2000,
            duration: 100,
            rating: "R".to_string(),
            release_date: datetime!(2000-01-01 0:00 UTC),
            best_picture_winner: false,
        };
        Page {
            records: vec![movie("A"), movie("B")],
            total_count: Some(2),
        }
    }

    #[test]
    fn each_fault_changes_the_page() {
        for fault in Fault::ALL {
            assert_ne!(fault.apply(page()), page(), "{fault:?}");
        }
    }

    #[test]
    fn duplicate_first_of_empty_page_is_harmless() {
        let empty = Page::default();
        assert_eq!(Fault::DuplicateFirst.apply(empty.clone()), empty);
    }
}
