//! Verity conformance material: the reference movie dataset, the named
//! query cases, and the `query_oracle_tests!` macro that turns them into
//! `#[tokio::test]` functions for any oracle.

pub mod catalog;
pub mod fixtures;
pub mod suite;

pub use catalog::{all_cases, family_cases, find, Family};
pub use fixtures::movies;
pub use suite::run_family;
