mod commands;
mod config;
mod logging;
mod tap;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Everything passed, or the command succeeded.
pub(crate) const EXIT_OK: i32 = 0;
/// At least one case failed or errored.
pub(crate) const EXIT_FAILED: i32 = 1;
/// Bad arguments or configuration.
pub(crate) const EXIT_USAGE: i32 = 2;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Query oracle for a remote movie table service.
#[derive(Parser)]
#[command(
    name = "verity",
    version,
    about = "Query oracle for a remote movie table service"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Path to the config file (default: ./verity.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log stage transitions (debug level)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the case catalog against a service and report in TAP or JSON
    Run {
        /// Service base URL, overriding the config file and VERITY_ENDPOINT
        #[arg(long, conflicts_with = "loopback")]
        endpoint: Option<String>,
        /// Use the in-process loopback service instead of HTTP
        #[arg(long)]
        loopback: bool,
        /// Only run cases whose name contains this substring
        #[arg(long)]
        filter: Option<String>,
        /// JSON file of additional cases
        #[arg(long)]
        cases: Option<PathBuf>,
        /// Maximum number of cases in flight
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// List the built-in cases with their families and expectations
    List,

    /// Print the query parameters a case translates to
    Translate {
        /// Case name (see `verity list`)
        case: String,
    },

    /// Print the locally expected records and total count for a case
    Expect {
        /// Case name (see `verity list`)
        case: String,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(logging::Verbosity::from_flags(cli.verbose, cli.quiet));

    let code = match cli.command {
        Commands::Run {
            endpoint,
            loopback,
            filter,
            cases,
            concurrency,
        } => commands::run::cmd_run(commands::run::RunOptions {
            config_path: cli.config.as_deref(),
            endpoint,
            loopback,
            filter: filter.as_deref(),
            cases_file: cases.as_deref(),
            concurrency,
            output: cli.output,
            quiet: cli.quiet,
        }),
        Commands::List => commands::list::cmd_list(cli.output),
        Commands::Translate { case } => commands::translate::cmd_translate(&case, cli.output, cli.quiet),
        Commands::Expect { case } => {
            commands::expect::cmd_expect(&case, cli.config.as_deref(), cli.output, cli.quiet)
        }
    };
    process::exit(code);
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
