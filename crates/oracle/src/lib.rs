//! Dual-evaluation oracle.
//!
//! Every case is answered twice: once by the reference evaluator over the
//! in-memory dataset, once by the remote service through a
//! [`QueryTransport`](verity_remote::QueryTransport). The answers are
//! compared and reduced to a [`Verdict`] with a diagnostic trail.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use verity_oracle::{run_suite, Oracle};
//!
//! let oracle = Arc::new(Oracle::new(transport, Arc::new(dataset)));
//! let report = run_suite(oracle, cases, 8).await;
//! assert!(report.all_passed(), "{report}");
//! ```

pub mod compare;
pub mod controller;
pub mod suite;
pub mod verdict;

pub use compare::{check, Comparison, Mismatch, SequenceMode};
pub use controller::{Oracle, OracleError};
pub use suite::{run_case, run_suite, CaseBody, CaseResult, QueryCase, SuiteReport};
pub use verdict::{RunOutcome, Verdict};
