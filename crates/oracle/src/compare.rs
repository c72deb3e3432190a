//! Equivalence checking between the reference result and a remote page.
//!
//! The checker never fails: every discrepancy becomes a [`Mismatch`].

use std::fmt;

use serde::Serialize;
use verity_eval::Expected;
use verity_model::{FieldId, Record};
use verity_remote::Page;

/// One discrepancy between expected and actual results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mismatch {
    /// The total count differs, or was requested and not returned.
    TotalCount { expected: u64, actual: Option<u64> },
    Length { expected: usize, actual: usize },
    /// A field differs at a position (positional comparison only).
    Field {
        index: usize,
        field: FieldId,
        expected: String,
        actual: String,
    },
    /// An expected record with no counterpart (multiset comparison only).
    Missing { record: String },
    /// A returned record with no counterpart (multiset comparison only).
    Unexpected { record: String },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::TotalCount { expected, actual } => match actual {
                Some(actual) => write!(f, "total count: expected {}, got {}", expected, actual),
                None => write!(f, "total count: expected {}, got none", expected),
            },
            Mismatch::Length { expected, actual } => {
                write!(f, "length: expected {}, got {}", expected, actual)
            }
            Mismatch::Field {
                index,
                field,
                expected,
                actual,
            } => write!(
                f,
                "record {} field {}: expected {}, got {}",
                index, field, expected, actual
            ),
            Mismatch::Missing { record } => write!(f, "missing: {}", record),
            Mismatch::Unexpected { record } => write!(f, "unexpected: {}", record),
        }
    }
}

/// How the two sequences are lined up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceMode {
    /// Record `i` must match record `i`.
    Positional,
    /// Order is irrelevant; records are matched one-to-one.
    Multiset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    pub mismatches: Vec<Mismatch>,
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Compare a reference result with what the service returned.
///
/// A total-count discrepancy is reported alone: once the counts disagree
/// the records are not compared.
pub fn check(expected: &Expected, actual: &Page, mode: SequenceMode) -> Comparison {
    if let Some(want) = expected.total_count {
        if actual.total_count != Some(want) {
            return Comparison {
                mismatches: vec![Mismatch::TotalCount {
                    expected: want,
                    actual: actual.total_count,
                }],
            };
        }
    }

    let mut mismatches = Vec::new();
    if expected.records.len() != actual.records.len() {
        mismatches.push(Mismatch::Length {
            expected: expected.records.len(),
            actual: actual.records.len(),
        });
    }

    match mode {
        SequenceMode::Positional => {
            for (index, (want, got)) in expected.records.iter().zip(&actual.records).enumerate() {
                mismatches.extend(record_mismatches(index, want, got));
            }
        }
        SequenceMode::Multiset => mismatches.extend(multiset_mismatches(
            &expected.records,
            &actual.records,
        )),
    }

    Comparison { mismatches }
}

/// Field-by-field differences between two records at `index`.
///
/// The identity is only compared when the expected record carries one.
pub fn record_mismatches(index: usize, expected: &Record, actual: &Record) -> Vec<Mismatch> {
    let identity = expected.id.is_some().then_some(FieldId::Id);
    identity
        .into_iter()
        .chain(FieldId::CONTENT)
        .filter_map(|field| {
            let want = expected.field(field);
            let got = actual.field(field);
            (want != got).then(|| Mismatch::Field {
                index,
                field,
                expected: want.to_string(),
                actual: got.to_string(),
            })
        })
        .collect()
}

fn multiset_mismatches(expected: &[Record], actual: &[Record]) -> Vec<Mismatch> {
    let mut used = vec![false; actual.len()];
    let mut mismatches = Vec::new();

    for want in expected {
        let found = actual
            .iter()
            .enumerate()
            .position(|(i, got)| !used[i] && record_mismatches(0, want, got).is_empty());
        match found {
            Some(i) => used[i] = true,
            None => mismatches.push(Mismatch::Missing {
                record: want.to_string(),
            }),
        }
    }

    for (got, used) in actual.iter().zip(used) {
        if !used {
            mismatches.push(Mismatch::Unexpected {
                record: got.to_string(),
            });
        }
    }
    mismatches
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
