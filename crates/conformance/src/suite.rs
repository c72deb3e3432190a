//! The `query_oracle_tests!` macro.
//!
//! Generates one `#[tokio::test]` per case family for any [`Oracle`]
//! expression. Each generated test runs its family through
//! [`run_family`] and fails with the full report if any case does not
//! pass.
//!
//! # Usage
//!
//! ```rust,ignore
//! use verity_conformance::query_oracle_tests;
//!
//! fn oracle() -> verity_oracle::Oracle { /* ... */ }
//!
//! query_oracle_tests!(oracle());
//! ```
//!
//! Generated test functions are named `oracle_<family>` and can be run
//! with `cargo test oracle_`.

use std::sync::Arc;

use verity_oracle::{run_suite, Oracle, SuiteReport};

use crate::catalog::{family_cases, Family};

pub const FAMILY_CONCURRENCY: usize = 4;

/// Run every case of one family.
pub async fn run_family(oracle: Arc<Oracle>, family: Family) -> SuiteReport {
    run_suite(oracle, family_cases(family), FAMILY_CONCURRENCY).await
}

/// Generate oracle tests for one oracle configuration.
///
/// `$oracle_expr` is evaluated fresh for each test.
#[macro_export]
macro_rules! query_oracle_tests {
    ($oracle_expr:expr) => {
        $crate::query_oracle_tests!(@family $oracle_expr,
            oracle_numeric_fields => NumericFields,
            oracle_string_functions => StringFunctions,
            oracle_numeric_functions => NumericFunctions,
            oracle_date_fields => DateFields,
            oracle_date_functions => DateFunctions,
            oracle_bool_fields => BoolFields,
            oracle_top_and_skip => TopAndSkip,
            oracle_order_by => OrderBy,
            oracle_negative => Negative,
            oracle_lookup => Lookup,
        );
    };
    (@family $oracle_expr:expr, $($test:ident => $family:ident,)*) => {
        $(
            #[tokio::test]
            async fn $test() {
                let oracle = ::std::sync::Arc::new($oracle_expr);
                let report = $crate::suite::run_family(
                    oracle,
                    $crate::catalog::Family::$family,
                )
                .await;
                assert!(report.all_passed(), "{}", report);
            }
        )*
    };
}
