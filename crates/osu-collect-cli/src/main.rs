//! osu-collect - Assemble osu! collection files from remote or local beatmap lists
//!
//! Usage:
//!   osu-collect collector <id-or-url>   Build from an osu!Collector collection
//!   osu-collect file <path>             Build from a local identifier list
//!   osu-collect --help                  Show all options

mod cli;
mod credentials;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        cli::print_help();
        return Ok(());
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("osu-collect v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let (command, options) = match cli::parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            cli::print_help();
            std::process::exit(1);
        }
    };

    init_logging(&options);

    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&cancelled);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!();
                eprintln!("Interrupt received, stopping...");
                flag.store(true, Ordering::SeqCst);
            }
        });
    }

    cli::run(command, options, cancelled).await
}

/// Logs go to stderr so `--json` output on stdout stays parseable
fn init_logging(options: &cli::CliOptions) {
    let default = if options.quiet {
        "warn"
    } else if options.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
