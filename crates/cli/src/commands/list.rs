use verity_conformance::{family_cases, Family};

use crate::{OutputFormat, EXIT_OK};

pub(crate) fn cmd_list(output: OutputFormat) -> i32 {
    match output {
        OutputFormat::Text => {
            for family in Family::ALL {
                println!("{}:", family.name());
                for case in family_cases(family) {
                    match case.expect {
                        Some(kind) => println!("  {} (expects {})", case.name, kind),
                        None => println!("  {}", case.name),
                    }
                }
            }
        }
        OutputFormat::Json => {
            let listing: Vec<serde_json::Value> = Family::ALL
                .into_iter()
                .flat_map(|family| {
                    family_cases(family).into_iter().map(move |case| {
                        serde_json::json!({
                            "family": family.name(),
                            "name": case.name,
                            "expect": case.expect,
                        })
                    })
                })
                .collect();
            println!("{}", serde_json::Value::Array(listing));
        }
    }
    EXIT_OK
}
