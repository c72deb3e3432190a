//! Local reference evaluator for query descriptors.
//!
//! Computes, entirely in memory, what a correct service should return for
//! a descriptor over the reference dataset: filter, optional total count,
//! stable ordering, then skip and take.

pub mod config;
pub mod error;
pub mod numeric;
pub mod order;
pub mod predicate;

pub use config::{EvalConfig, RoundingMode, TextCollation};
pub use error::EvalError;
pub use predicate::{eval_expr, eval_pred};

use verity_model::{Dataset, OrderingPlan, QueryDescriptor, Record};

/// Reference result for one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expected {
    pub records: Vec<Record>,
    /// Number of filtered records before paging, when the descriptor asks
    /// for it.
    pub total_count: Option<u64>,
}

/// Evaluate `descriptor` against `dataset`.
///
/// Negative `skip` is treated as zero and negative `take` yields no
/// records. Whether the service should accept such values is a separate
/// question answered by the translator.
pub fn evaluate(
    descriptor: &QueryDescriptor,
    dataset: &Dataset,
    config: &EvalConfig,
) -> Result<Expected, EvalError> {
    let plan = OrderingPlan::resolve(descriptor.ordering())?;
    let predicate = descriptor.predicate();

    let mut matched = Vec::new();
    for record in dataset.iter() {
        if eval_pred(predicate, record, config)? {
            matched.push(record.clone());
        }
    }

    let total_count = descriptor
        .wants_total_count()
        .then_some(matched.len() as u64);

    if let Some(plan) = plan {
        order::sort_records(&mut matched, plan, config.collation)?;
    }

    let skip = descriptor
        .offset()
        .map_or(0, |s| usize::try_from(s).unwrap_or(0));
    let take = descriptor
        .limit()
        .map_or(usize::MAX, |t| usize::try_from(t).unwrap_or(0));

    let records: Vec<Record> = matched.into_iter().skip(skip).take(take).collect();

    tracing::debug!(
        filter = %predicate,
        total_count = ?total_count,
        returned = records.len(),
        "reference evaluation complete"
    );

    Ok(Expected {
        records,
        total_count,
    })
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
