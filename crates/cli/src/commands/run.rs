use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use verity_oracle::{run_suite, Oracle, QueryCase, SuiteReport};
use verity_remote::{HttpTransport, LoopbackService, QueryTransport};

use crate::config::{ConfigError, VerityConfig};
use crate::tap::Tap;
use crate::{report_error, OutputFormat, EXIT_FAILED, EXIT_OK, EXIT_USAGE};

pub(crate) struct RunOptions<'a> {
    pub config_path: Option<&'a Path>,
    pub endpoint: Option<String>,
    pub loopback: bool,
    pub filter: Option<&'a str>,
    pub cases_file: Option<&'a Path>,
    pub concurrency: Option<usize>,
    pub output: OutputFormat,
    pub quiet: bool,
}

pub(crate) fn cmd_run(opts: RunOptions<'_>) -> i32 {
    let config = match VerityConfig::load(opts.config_path) {
        Ok(c) => c,
        Err(e) => {
            report_error(&format!("error: {}", e), opts.output, opts.quiet);
            return EXIT_USAGE;
        }
    };

    let mut cases = verity_conformance::all_cases();
    if let Some(path) = opts.cases_file {
        match load_case_file(path) {
            Ok(extra) => cases.extend(extra),
            Err(msg) => {
                report_error(&msg, opts.output, opts.quiet);
                return EXIT_USAGE;
            }
        }
    }
    if let Some(filter) = opts.filter {
        cases.retain(|c| c.name.contains(filter));
    }

    let dataset = Arc::new(verity_conformance::movies());
    let transport: Arc<dyn QueryTransport> = if opts.loopback {
        Arc::new(
            LoopbackService::new(&dataset)
                .with_config(config.eval)
                .with_max_page_size(config.service.max_page_size),
        )
    } else {
        match http_transport(&config, opts.endpoint) {
            Ok(t) => Arc::new(t),
            Err(e) => {
                report_error(&format!("error: {}", e), opts.output, opts.quiet);
                return EXIT_USAGE;
            }
        }
    };
    tracing::info!(
        transport = transport.transport_id(),
        cases = cases.len(),
        "starting run"
    );

    let oracle = Arc::new(Oracle::new(transport, dataset).with_config(config.eval));
    let concurrency = opts.concurrency.unwrap_or(config.suite.concurrency);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            report_error(
                &format!("error: failed to start async runtime: {}", e),
                opts.output,
                opts.quiet,
            );
            return EXIT_FAILED;
        }
    };
    let report = runtime.block_on(run_suite(oracle, cases, concurrency));

    match opts.output {
        OutputFormat::Text => tap_report(&report).finish(),
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                report_error(&format!("serialization error: {}", e), opts.output, opts.quiet);
                return EXIT_FAILED;
            }
        },
    }

    if report.all_passed() {
        EXIT_OK
    } else {
        EXIT_FAILED
    }
}

fn http_transport(config: &VerityConfig, endpoint: Option<String>) -> Result<HttpTransport, ConfigError> {
    let service = &config.service;
    let endpoint = endpoint
        .or_else(|| service.endpoint.clone())
        .ok_or(ConfigError::MissingEndpoint)?;
    let mut transport = HttpTransport::new(&endpoint, &service.table)
        .with_timeout(Duration::from_secs(service.timeout_secs));
    if let Some(key) = &service.app_key {
        transport = transport.with_app_key(&service.app_key_header, key);
    }
    Ok(transport)
}

fn load_case_file(path: &Path) -> Result<Vec<QueryCase>, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("error reading case file '{}': {}", path.display(), e))?;
    serde_json::from_str(&text)
        .map_err(|e| format!("error parsing case file '{}': {}", path.display(), e))
}

fn tap_report(report: &SuiteReport) -> Tap {
    let mut tap = Tap::new();
    for result in &report.results {
        match (&result.verdict, &result.error) {
            (Some(v), _) if v.is_pass() => tap.ok(&result.name),
            (Some(v), _) => {
                let mut diagnostic = v.to_string();
                for line in &result.trail {
                    diagnostic.push('\n');
                    diagnostic.push_str(line);
                }
                tap.not_ok(&result.name, diagnostic)
            }
            (None, error) => tap.not_ok(
                &result.name,
                format!("error: {}", error.as_deref().unwrap_or("(no message)")),
            ),
        }
    }
    tap
}
