//! Per-case orchestration: evaluate locally, query remotely, compare,
//! decide.

use std::sync::Arc;

use verity_eval::{EvalConfig, EvalError};
use verity_model::{Dataset, ErrorKind, OrderingPlan, QueryDescriptor, UnsupportedOrdering};
use verity_remote::{QueryTransport, RemoteError, RemoteTable};

use crate::compare::{check, record_mismatches, SequenceMode};
use crate::verdict::{RunOutcome, Verdict};

/// Errors that abort a run instead of producing a verdict.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// The case asks for something the oracle cannot check.
    #[error("configuration error: {0}")]
    Configuration(#[from] UnsupportedOrdering),

    /// The reference evaluation itself failed.
    #[error("local evaluator defect: {0}")]
    LocalDefect(EvalError),
}

impl From<EvalError> for OracleError {
    fn from(e: EvalError) -> Self {
        match e {
            EvalError::UnsupportedOrdering(u) => OracleError::Configuration(u),
            other => OracleError::LocalDefect(other),
        }
    }
}

/// Runs cases against one remote table and one reference dataset.
pub struct Oracle {
    table: RemoteTable,
    dataset: Arc<Dataset>,
    config: EvalConfig,
}

impl Oracle {
    pub fn new(transport: Arc<dyn QueryTransport>, dataset: Arc<Dataset>) -> Self {
        Oracle {
            table: RemoteTable::new(transport),
            dataset,
            config: EvalConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// Check one descriptor, optionally declaring the remote failure it
    /// should produce.
    pub async fn run(
        &self,
        descriptor: &QueryDescriptor,
        expect: Option<ErrorKind>,
    ) -> Result<RunOutcome, OracleError> {
        let mut trail = vec![format!("query: {}", descriptor)];

        OrderingPlan::resolve(descriptor.ordering())?;
        tracing::debug!(stage = "built", query = %descriptor);

        let expected = verity_eval::evaluate(descriptor, &self.dataset, &self.config)?;
        tracing::debug!(
            stage = "local_executed",
            records = expected.records.len(),
            total_count = ?expected.total_count
        );

        let remote = self.table.read(descriptor).await;
        tracing::debug!(stage = "remote_executed", ok = remote.is_ok());

        let verdict = match remote {
            Err(err) => remote_failure(err, expect, &mut trail),
            Ok(page) => match expect {
                Some(kind) => {
                    trail.push(format!(
                        "expected {} but the service returned {} records",
                        kind,
                        page.records.len()
                    ));
                    Verdict::ExpectedFailureMissing {
                        expected: kind,
                        observed: None,
                    }
                }
                None => {
                    let mode = if descriptor.is_unordered() {
                        SequenceMode::Multiset
                    } else {
                        SequenceMode::Positional
                    };
                    let comparison = check(&expected, &page, mode);
                    tracing::debug!(
                        stage = "compared",
                        mismatches = comparison.mismatches.len()
                    );
                    trail.extend(comparison.mismatches.iter().map(|m| m.to_string()));
                    match comparison.mismatches.first() {
                        None => Verdict::Pass,
                        Some(first) => Verdict::Fail {
                            reason: summarize(comparison.mismatches.len(), first),
                        },
                    }
                }
            },
        };

        Ok(decide(verdict, trail))
    }

    /// Fetch one record by identity and compare it with the reference
    /// record at position `id - 1`, including the identity itself.
    pub async fn run_lookup(&self, id: i64, expect: Option<ErrorKind>) -> RunOutcome {
        let mut trail = vec![format!("lookup: id {}", id)];

        let remote = self.table.lookup(id).await;
        tracing::debug!(stage = "remote_executed", ok = remote.is_ok());

        let verdict = match (remote, expect) {
            (Err(err), expect) => remote_failure(err, expect, &mut trail),
            (Ok(record), Some(kind)) => {
                trail.push(format!("expected {} but the service returned {}", kind, record));
                Verdict::ExpectedFailureMissing {
                    expected: kind,
                    observed: None,
                }
            }
            (Ok(record), None) => match self.dataset.by_identity(id) {
                None => {
                    let reason = format!("no reference record for id {}", id);
                    trail.push(reason.clone());
                    Verdict::Fail { reason }
                }
                Some(reference) => {
                    let reference = reference.clone().with_id(id);
                    let mismatches = record_mismatches(0, &reference, &record);
                    trail.extend(mismatches.iter().map(|m| m.to_string()));
                    match mismatches.first() {
                        None => Verdict::Pass,
                        Some(first) => Verdict::Fail {
                            reason: summarize(mismatches.len(), first),
                        },
                    }
                }
            },
        };

        decide(verdict, trail)
    }
}

fn remote_failure(err: RemoteError, expect: Option<ErrorKind>, trail: &mut Vec<String>) -> Verdict {
    let observed = err.kind();
    match expect {
        Some(kind) if kind == observed => {
            trail.push(format!("failed as expected: {}", err));
            Verdict::ExpectedFailureObserved { kind }
        }
        Some(kind) => {
            trail.push(format!("expected {}, got: {}", kind, err));
            Verdict::ExpectedFailureMissing {
                expected: kind,
                observed: Some(observed),
            }
        }
        None => {
            trail.push(err.to_string());
            Verdict::Fail {
                reason: err.to_string(),
            }
        }
    }
}

fn summarize(count: usize, first: &impl std::fmt::Display) -> String {
    if count == 1 {
        first.to_string()
    } else {
        format!("{} ({} more mismatches)", first, count - 1)
    }
}

fn decide(verdict: Verdict, trail: Vec<String>) -> RunOutcome {
    if verdict.is_pass() {
        tracing::info!(verdict = %verdict, "case decided");
    } else {
        tracing::warn!(verdict = %verdict, "case decided");
    }
    RunOutcome { verdict, trail }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
