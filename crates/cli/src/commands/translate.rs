use verity_oracle::CaseBody;

use super::catalog_case;
use crate::{report_error, OutputFormat, EXIT_FAILED, EXIT_OK};

pub(crate) fn cmd_translate(name: &str, output: OutputFormat, quiet: bool) -> i32 {
    let case = match catalog_case(name, output, quiet) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let descriptor = match case.body {
        CaseBody::Query(d) => d,
        CaseBody::Lookup { id } => {
            match output {
                OutputFormat::Text => println!("lookup id {}", id),
                OutputFormat::Json => println!("{}", serde_json::json!({ "lookup": id })),
            }
            return EXIT_OK;
        }
    };
    match verity_remote::translate(&descriptor) {
        Ok(query) => {
            match output {
                OutputFormat::Text => println!("{}", query),
                OutputFormat::Json => match serde_json::to_string_pretty(&query) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        report_error(&format!("serialization error: {}", e), output, quiet);
                        return EXIT_FAILED;
                    }
                },
            }
            EXIT_OK
        }
        Err(e) => {
            report_error(&format!("{} ({})", e, e.kind()), output, quiet);
            EXIT_FAILED
        }
    }
}
