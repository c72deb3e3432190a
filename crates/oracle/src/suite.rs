//! Named cases and the concurrent suite runner.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;
use verity_model::{ErrorKind, QueryDescriptor};

use crate::controller::{Oracle, OracleError};
use crate::verdict::{RunOutcome, Verdict};

// ──────────────────────────────────────────────
// Cases
// ──────────────────────────────────────────────

/// What a case asks of the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseBody {
    Query(QueryDescriptor),
    Lookup { id: i64 },
}

/// A named check, optionally declaring the remote failure it expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCase {
    pub name: String,
    pub body: CaseBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect: Option<ErrorKind>,
}

impl QueryCase {
    pub fn query(name: &str, descriptor: QueryDescriptor) -> Self {
        QueryCase {
            name: name.to_string(),
            body: CaseBody::Query(descriptor),
            expect: None,
        }
    }

    pub fn lookup(name: &str, id: i64) -> Self {
        QueryCase {
            name: name.to_string(),
            body: CaseBody::Lookup { id },
            expect: None,
        }
    }

    /// Mark this as a negative case.
    pub fn expecting(mut self, kind: ErrorKind) -> Self {
        self.expect = Some(kind);
        self
    }
}

/// Run one case.
pub async fn run_case(oracle: &Oracle, case: &QueryCase) -> Result<RunOutcome, OracleError> {
    match &case.body {
        CaseBody::Query(descriptor) => oracle.run(descriptor, case.expect).await,
        CaseBody::Lookup { id } => Ok(oracle.run_lookup(*id, case.expect).await),
    }
}

// ──────────────────────────────────────────────
// Reports
// ──────────────────────────────────────────────

/// Result of a single case within a suite.
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub name: String,
    /// Absent when the run aborted with an error.
    pub verdict: Option<Verdict>,
    pub error: Option<String>,
    pub trail: Vec<String>,
}

impl CaseResult {
    fn from_outcome(name: String, outcome: Result<RunOutcome, OracleError>) -> Self {
        match outcome {
            Ok(RunOutcome { verdict, trail }) => CaseResult {
                name,
                verdict: Some(verdict),
                error: None,
                trail,
            },
            Err(e) => Self::errored(name, e.to_string()),
        }
    }

    fn errored(name: String, message: String) -> Self {
        CaseResult {
            name,
            verdict: None,
            error: Some(message),
            trail: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict.as_ref().is_some_and(Verdict::is_pass)
    }

    pub fn is_error(&self) -> bool {
        self.verdict.is_none()
    }
}

/// Aggregated report from a suite run, in declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub results: Vec<CaseResult>,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub total: usize,
}

impl SuiteReport {
    pub fn from_results(results: Vec<CaseResult>) -> Self {
        let passed = results.iter().filter(|r| r.passed()).count();
        let errored = results.iter().filter(|r| r.is_error()).count();
        let total = results.len();
        SuiteReport {
            passed,
            errored,
            failed: total - passed - errored,
            total,
            results,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Oracle: {}/{} passed ({} failed, {} errors)",
            self.passed, self.total, self.failed, self.errored
        )?;
        for r in &self.results {
            match (&r.verdict, &r.error) {
                (Some(v), _) if !v.is_pass() => {
                    writeln!(f, "  FAIL [{}]: {}", r.name, v)?;
                    for line in &r.trail {
                        writeln!(f, "      {}", line)?;
                    }
                }
                (None, error) => writeln!(
                    f,
                    "  ERROR [{}]: {}",
                    r.name,
                    error.as_deref().unwrap_or("(no message)")
                )?,
                _ => {}
            }
        }
        Ok(())
    }
}

// ──────────────────────────────────────────────
// Runner
// ──────────────────────────────────────────────

/// Run `cases` with at most `concurrency` in flight.
///
/// Each case gets its own `oracle_run` span. Results come back in the
/// order the cases were given, regardless of completion order.
pub async fn run_suite(oracle: Arc<Oracle>, cases: Vec<QueryCase>, concurrency: usize) -> SuiteReport {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut set = JoinSet::new();

    for (index, case) in cases.iter().cloned().enumerate() {
        let oracle = Arc::clone(&oracle);
        let semaphore = Arc::clone(&semaphore);
        let span = tracing::info_span!("oracle_run", case = %case.name);
        set.spawn(
            async move {
                let _permit = semaphore.acquire_owned().await;
                let outcome = run_case(&oracle, &case).await;
                (index, CaseResult::from_outcome(case.name, outcome))
            }
            .instrument(span),
        );
    }

    let mut slots: Vec<Option<CaseResult>> = vec![None; cases.len()];
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(e) => tracing::error!(error = %e, "case task failed"),
        }
    }

    let results = slots
        .into_iter()
        .zip(cases)
        .map(|(slot, case)| {
            slot.unwrap_or_else(|| CaseResult::errored(case.name, "case task aborted".to_string()))
        })
        .collect();

    let report = SuiteReport::from_results(results);
    tracing::info!(
        passed = report.passed,
        failed = report.failed,
        errored = report.errored,
        "suite finished"
    );
    report
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use verity_model::predicate::field;
    use verity_model::{Dataset, FieldId, OrderClause, Record};
    use verity_remote::LoopbackService;

    fn oracle() -> Arc<Oracle> {
        let data: Dataset = (1..=20)
            .map(|n| Record {
                id: None,
                title: format!("Film {:02}", n),
                year: 1980 + n,
                duration: 80 + n,
                rating: "G".to_string(),
                release_date: datetime!(1990-01-01 0:00 UTC),
                best_picture_winner: false,
            })
            .collect();
        let service = Arc::new(LoopbackService::new(&data).with_max_page_size(10));
        Arc::new(Oracle::new(service, Arc::new(data)))
    }

    fn cases() -> Vec<QueryCase> {
        vec![
            QueryCase::query(
                "titles",
                QueryDescriptor::new().order_by(OrderClause::asc(FieldId::Title)),
            ),
            QueryCase::query("too_big", QueryDescriptor::new().take(11))
                .expecting(ErrorKind::ServiceRejected),
            QueryCase::query("unexpectedly_big", QueryDescriptor::new().take(11)),
            QueryCase::query(
                "bad_order",
                QueryDescriptor::new().order_by(OrderClause::desc(FieldId::Title)),
            ),
            QueryCase::lookup("lookup_zero", 0).expecting(ErrorKind::InvalidArgument),
            QueryCase::query(
                "eighties",
                QueryDescriptor::new().filter(field(FieldId::Year).lt(1990)),
            ),
        ]
    }

    #[tokio::test]
    async fn report_counts_and_order() {
        let report = run_suite(oracle(), cases(), 3).await;
        let names: Vec<&str> = report.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["titles", "too_big", "unexpectedly_big", "bad_order", "lookup_zero", "eighties"]
        );
        assert_eq!(report.total, 6);
        assert_eq!(report.passed, 4);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errored, 1);
        assert!(!report.all_passed());

        let text = report.to_string();
        assert!(text.starts_with("Oracle: 4/6 passed (1 failed, 1 errors)"));
        assert!(text.contains("FAIL [unexpectedly_big]"));
        assert!(text.contains("ERROR [bad_order]"));
    }

    #[tokio::test]
    async fn concurrency_of_zero_still_runs() {
        let report = run_suite(oracle(), cases(), 0).await;
        assert_eq!(report.total, 6);
    }

    #[test]
    fn cases_round_trip_through_json() {
        let json = serde_json::json!([
            {
                "name": "nineties",
                "body": { "query": {
                    "filter": { "compare": {
                        "left": { "field": "year" },
                        "op": "ge",
                        "right": { "literal": { "type": "Int", "value": 1990 } }
                    } },
                    "include_total_count": true
                } }
            },
            { "name": "bad_id", "body": { "lookup": { "id": -1 } }, "expect": "invalid_argument" }
        ]);
        let cases: Vec<QueryCase> = serde_json::from_value(json).unwrap();
        assert_eq!(
            cases[0],
            QueryCase::query(
                "nineties",
                QueryDescriptor::new()
                    .filter(field(FieldId::Year).ge(1990))
                    .include_total_count()
            )
        );
        assert_eq!(cases[1], QueryCase::lookup("bad_id", -1).expecting(ErrorKind::InvalidArgument));
    }
}
