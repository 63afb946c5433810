//! failtest - decide whether an incremental build must re-run tests
//!
//! Reads the module's `pom.xml`, scans the Surefire reports left by the
//! previous run and maintains `target/failtest.mark`.

use clap::{Parser, Subcommand, crate_version};
use convenient_failtest::{BuildContext, FailTestConfig, FailedTestStrategy, MarkerStore};
use std::path::PathBuf;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

/// Options for the application.
#[derive(Parser)]
#[command(name = "failtest", version = crate_version!())]
#[command(about = "Failed-test detection for incremental Maven builds")]
struct Opts {
    /// Build descriptor of the module.
    #[arg(short, long, default_value = "pom.xml", env = "FAILTEST_POM")]
    pom: PathBuf,

    /// Compiled-output directory; its parent is the output root.
    /// Defaults to the descriptor's build output directory.
    #[arg(short, long)]
    output_directory: Option<PathBuf>,

    /// Print debug information
    #[arg(short)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the reports, update the marker and print the decision
    Check {
        /// Initial skipTests value; defaults to the descriptor property
        #[arg(long, env = "FAILTEST_SKIP_TESTS")]
        skip_tests: Option<String>,

        /// Do not suppress skipTests before detection
        #[arg(long)]
        no_suppress: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show whether the previous run left a failure marker
    Status,

    /// Remove the failure marker
    Clear,
}

/// Gets the log level enum variant from a level string.
fn get_log_level(level: &str) -> Level {
    match level.to_uppercase().as_ref() {
        "DEBUG" => Level::DEBUG,
        "INFO" => Level::INFO,
        "WARN" => Level::WARN,
        "ERROR" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Opts::parse();

    let log_level = if opts.debug { "debug" } else { "info" };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(get_log_level(log_level))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = FailTestConfig::default();
    let mut ctx = BuildContext::load(&opts.pom)?;
    if let Some(output_directory) = opts.output_directory {
        ctx = ctx.with_output_directory(output_directory);
    }
    debug!("Output directory: {}", ctx.output_directory().display());

    match opts.command {
        Commands::Check {
            skip_tests,
            no_suppress,
            json,
        } => {
            if let Some(value) = skip_tests {
                let _ = ctx.set_property(config.skip_tests_property.clone(), value);
            }
            let skip_tests_property = config.skip_tests_property.clone();
            let strategy = FailedTestStrategy::for_context(config, &ctx);
            if !no_suppress {
                let _ = ctx.set_property(skip_tests_property.clone(), "true");
            }

            let detection = strategy.apply(&mut ctx)?;
            let skip_tests = ctx.property(&skip_tests_property);
            if json {
                let report = serde_json::json!({
                    "strategy": if strategy.is_noop() { "noop" } else { "surefire" },
                    "detection": detection,
                    "hasFailedTests": detection.has_failed_tests(),
                    "skipTests": skip_tests,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Failed suites:    {}", detection.failed_suites);
                println!("Previous failure: {}", detection.had_mark);
                println!("Has failed tests: {}", detection.has_failed_tests());
                println!("skipTests:        {}", skip_tests.unwrap_or("<unset>"));
            }
        }
        Commands::Status => {
            let root = ctx.output_root(&config)?;
            let marker = MarkerStore::new(&config);
            println!(
                "{}: {}",
                marker.path(&root).display(),
                if marker.has_mark(&root) { "previous run failed" } else { "no failures recorded" }
            );
        }
        Commands::Clear => {
            let root = ctx.output_root(&config)?;
            let marker = MarkerStore::new(&config);
            marker.set_mark(&root, false);
            println!("Cleared {}", marker.path(&root).display());
        }
    }

    Ok(())
}
