pub(crate) mod expect;
pub(crate) mod list;
pub(crate) mod run;
pub(crate) mod translate;

use verity_oracle::QueryCase;

use crate::{report_error, OutputFormat, EXIT_USAGE};

/// Look up a catalog case, reporting unknown names as usage errors.
pub(crate) fn catalog_case(name: &str, output: OutputFormat, quiet: bool) -> Result<QueryCase, i32> {
    verity_conformance::find(name).ok_or_else(|| {
        report_error(
            &format!("error: unknown case '{}' (see `verity list`)", name),
            output,
            quiet,
        );
        EXIT_USAGE
    })
}
