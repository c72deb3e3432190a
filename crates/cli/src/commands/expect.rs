use std::path::Path;

use verity_oracle::CaseBody;

use super::catalog_case;
use crate::config::VerityConfig;
use crate::{report_error, OutputFormat, EXIT_FAILED, EXIT_OK, EXIT_USAGE};

/// Prints JSON regardless of `--output`.
pub(crate) fn cmd_expect(name: &str, config_path: Option<&Path>, output: OutputFormat, quiet: bool) -> i32 {
    let case = match catalog_case(name, output, quiet) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let config = match VerityConfig::load(config_path) {
        Ok(c) => c,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            return EXIT_USAGE;
        }
    };
    let dataset = verity_conformance::movies();

    let value = match case.body {
        CaseBody::Query(descriptor) => {
            match verity_eval::evaluate(&descriptor, &dataset, &config.eval) {
                Ok(expected) => serde_json::json!({
                    "records": expected.records,
                    "total_count": expected.total_count,
                }),
                Err(e) => {
                    report_error(&format!("error: {}", e), output, quiet);
                    return EXIT_FAILED;
                }
            }
        }
        CaseBody::Lookup { id } => match dataset.by_identity(id) {
            Some(record) => serde_json::json!({ "records": [record.clone().with_id(id)] }),
            None => {
                report_error(&format!("error: no reference record for id {}", id), output, quiet);
                return EXIT_FAILED;
            }
        },
    };

    match serde_json::to_string_pretty(&value) {
        Ok(json) => {
            println!("{}", json);
            EXIT_OK
        }
        Err(e) => {
            report_error(&format!("serialization error: {}", e), output, quiet);
            EXIT_FAILED
        }
    }
}
