use std::fmt;

use serde::Serialize;
use verity_model::ErrorKind;

/// Outcome of one oracle run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail {
        reason: String,
    },
    /// A negative case failed remotely with the declared kind.
    ExpectedFailureObserved {
        kind: ErrorKind,
    },
    /// A negative case succeeded, or failed with a different kind.
    ExpectedFailureMissing {
        expected: ErrorKind,
        observed: Option<ErrorKind>,
    },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(
            self,
            Verdict::Pass | Verdict::ExpectedFailureObserved { .. }
        )
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("pass"),
            Verdict::Fail { reason } => write!(f, "fail: {}", reason),
            Verdict::ExpectedFailureObserved { kind } => {
                write!(f, "pass (failed with {} as expected)", kind)
            }
            Verdict::ExpectedFailureMissing { expected, observed } => match observed {
                Some(observed) => write!(f, "fail: expected {}, got {}", expected, observed),
                None => write!(f, "fail: expected {}, but the query succeeded", expected),
            },
        }
    }
}

/// A verdict and the diagnostic lines that led to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub verdict: Verdict,
    pub trail: Vec<String>,
}
