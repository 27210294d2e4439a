//! Command-line interface for osu-collect
//!
//! Usage:
//!   osu-collect collector <id-or-url> [options]   Build from an osu!Collector collection
//!   osu-collect file <path> [options]             Build from a local identifier list

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use osu_collect_core::{
    parse_collection_id, Collection, CollectionFactory, CollectorClient, CollectorSource, Config,
    FileSource, FilterSpec, Metric, OsuApiClient, OutputFormat, OutputTarget, SortKey, Warning,
};

use crate::credentials::EnvCredentials;

/// CLI command to execute
#[derive(Debug, Clone)]
pub enum CliCommand {
    /// Assemble from a remote osu!Collector collection
    Collector { collection: String },
    /// Assemble from a local list of beatmap links and IDs
    File { path: PathBuf },
}

/// CLI options
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub stars: Option<(f64, f64)>,
    pub bpm: Option<(f64, f64)>,
    pub sort: Option<SortKey>,
    pub name: Option<String>,
    pub output: Option<PathBuf>,
    pub text: bool,
    pub json: bool,
    pub quiet: bool,
    pub verbose: bool,
}

/// Parse command-line arguments (without the binary name)
pub fn parse_args(args: &[String]) -> Result<(CliCommand, CliOptions), String> {
    let mut options = CliOptions::default();
    let mut command: Option<CliCommand> = None;

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--stars" => {
                options.stars = Some(take_range(args, &mut i, "--stars")?);
            }
            "--bpm" => {
                options.bpm = Some(take_range(args, &mut i, "--bpm")?);
            }
            "--sort" => {
                i += 1;
                if i >= args.len() {
                    return Err("--sort requires a value".to_string());
                }
                options.sort = Some(parse_sort(&args[i])?);
            }
            "--name" => {
                i += 1;
                if i >= args.len() {
                    return Err("--name requires a value".to_string());
                }
                options.name = Some(args[i].clone());
            }
            "--output" | "-o" => {
                i += 1;
                if i >= args.len() {
                    return Err("--output requires a value".to_string());
                }
                options.output = Some(PathBuf::from(&args[i]));
            }
            "--text" => options.text = true,
            "--json" => options.json = true,
            "--quiet" | "-q" => options.quiet = true,
            "--verbose" | "-v" => options.verbose = true,
            "collector" => {
                i += 1;
                if i >= args.len() {
                    return Err("collector requires a collection ID or URL".to_string());
                }
                command = Some(CliCommand::Collector {
                    collection: args[i].clone(),
                });
            }
            "file" => {
                i += 1;
                if i >= args.len() {
                    return Err("file requires a path".to_string());
                }
                command = Some(CliCommand::File {
                    path: PathBuf::from(&args[i]),
                });
            }
            _ => {
                if arg.starts_with('-') {
                    return Err(format!("Unknown option: {}", arg));
                }
                return Err(format!("Unknown command: {}", arg));
            }
        }
        i += 1;
    }

    match command {
        Some(command) => Ok((command, options)),
        None => Err("No command specified. Use: collector <id-or-url> or file <path>".to_string()),
    }
}

/// Consume the two bound values that follow a range flag
fn take_range(args: &[String], i: &mut usize, flag: &str) -> Result<(f64, f64), String> {
    if *i + 2 >= args.len() {
        return Err(format!(
            "{} requires two values: <min> <max> (0 for unbounded)",
            flag
        ));
    }
    let min = parse_bound(&args[*i + 1], flag)?;
    let max = parse_bound(&args[*i + 2], flag)?;
    *i += 2;
    Ok((min, max))
}

fn parse_bound(value: &str, flag: &str) -> Result<f64, String> {
    let bound: f64 = value
        .parse()
        .map_err(|_| format!("Invalid {} bound: {}", flag, value))?;
    if bound < 0.0 || !bound.is_finite() {
        return Err(format!("Invalid {} bound: {}", flag, value));
    }
    Ok(bound)
}

fn parse_sort(value: &str) -> Result<SortKey, String> {
    match value.to_lowercase().as_str() {
        "stars" | "star" | "difficulty" => Ok(SortKey::StarRating),
        "bpm" => Ok(SortKey::Bpm),
        "title" => Ok(SortKey::Title),
        _ => Err(format!(
            "Invalid sort key '{}'. Use: stars, bpm, or title",
            value
        )),
    }
}

/// Execute a parsed command
pub async fn run(
    command: CliCommand,
    options: CliOptions,
    cancelled: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let config = Config::load();
    let format = if options.text {
        OutputFormat::Text
    } else {
        config.output_format
    };

    let mut filters = Vec::new();
    if let Some((min, max)) = options.stars {
        filters.push(FilterSpec::new(Metric::StarRating, min, max));
    }
    if let Some((min, max)) = options.bpm {
        filters.push(FilterSpec::new(Metric::Bpm, min, max));
    }

    let api = OsuApiClient::new(EnvCredentials::new())?;

    match command {
        CliCommand::Collector { collection } => {
            let id = parse_collection_id(&collection).ok_or_else(|| {
                anyhow::anyhow!("Unrecognized collection reference: {}", collection)
            })?;
            let name = options
                .name
                .clone()
                .unwrap_or_else(|| id.to_string());
            let target = output_target(&options, &config, &name, format);
            // The listing service filters on a single metric; the rest
            // are applied locally after resolution.
            let listing_filter = filters.first().copied();
            let source = CollectorSource::new(CollectorClient::new()?, id, listing_filter);
            let mut factory = build_factory(api, &name, target, &filters, &options, cancelled);
            let outcome = factory.run(source).await;
            report(&factory, outcome, &options)
        }
        CliCommand::File { path } => {
            let name = options
                .name
                .clone()
                .unwrap_or_else(|| config.collection_name.clone());
            let target = output_target(&options, &config, &name, format);
            let source = FileSource::open(&path)
                .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path.display(), e))?;
            let mut factory = build_factory(api, &name, target, &filters, &options, cancelled);
            let outcome = factory.run(source).await;
            report(&factory, outcome, &options)
        }
    }
}

fn output_target(
    options: &CliOptions,
    config: &Config,
    name: &str,
    format: OutputFormat,
) -> OutputTarget {
    let path = options
        .output
        .clone()
        .unwrap_or_else(|| config.output_path(name, format));
    OutputTarget { path, format }
}

fn build_factory(
    api: OsuApiClient,
    name: &str,
    target: OutputTarget,
    filters: &[FilterSpec],
    options: &CliOptions,
    cancelled: Arc<AtomicBool>,
) -> CollectionFactory<OsuApiClient> {
    let mut factory = CollectionFactory::new(api, name, target).with_cancellation(cancelled);
    for filter in filters {
        factory = factory.with_filter(*filter);
    }
    if let Some(sort) = options.sort {
        factory = factory.with_sort(sort);
    }
    factory
}

/// Print the final summary and per-warning lines, passing any fatal error up
fn report(
    factory: &CollectionFactory<OsuApiClient>,
    outcome: osu_collect_core::Result<Collection>,
    options: &CliOptions,
) -> anyhow::Result<()> {
    match outcome {
        Ok(collection) => {
            print_summary(
                &collection,
                factory.warnings(),
                &factory.output().path,
                options,
            );
            for warning in factory.warnings() {
                eprintln!("Warning: {}", warning);
            }
            Ok(())
        }
        Err(err) => {
            // Skipped-item warnings still matter when the run dies.
            for warning in factory.warnings() {
                eprintln!("Warning: {}", warning);
            }
            Err(err.into())
        }
    }
}

fn print_summary(
    collection: &Collection,
    warnings: &[Warning],
    output: &Path,
    options: &CliOptions,
) {
    if options.json {
        let warnings: Vec<_> = warnings
            .iter()
            .map(|w| {
                serde_json::json!({
                    "subject": w.subject,
                    "message": w.message,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({
                "collection": collection.name,
                "beatmaps": collection.len(),
                "skipped": warnings.len(),
                "warnings": warnings,
                "output": output.to_string_lossy(),
            })
        );
    } else {
        println!("Collection Complete:");
        println!("  Name:     {}", collection.name);
        println!("  Beatmaps: {}", collection.len());
        println!("  Skipped:  {}", warnings.len());
        println!("  Output:   {}", output.display());
    }
}

/// Print help message
pub fn print_help() {
    println!("osu-collect v{}", env!("CARGO_PKG_VERSION"));
    println!("Assemble osu! collection files from osu!Collector collections or link lists");
    println!();
    println!("USAGE:");
    println!("    osu-collect <command> [options]");
    println!();
    println!("COMMANDS:");
    println!("    collector <id-or-url>    Build from a remote osu!Collector collection");
    println!("    file <path>              Build from a local list of beatmap links and IDs");
    println!();
    println!("OPTIONS:");
    println!("    --stars <min> <max>      Keep maps with star rating strictly between the");
    println!("                             bounds (0 = unbounded)");
    println!("    --bpm <min> <max>        Keep maps with BPM strictly between the bounds");
    println!("                             (0 = unbounded)");
    println!("    --sort <key>             Sort the collection: stars, bpm, or title");
    println!("    --name <name>            Collection name (default: the collection ID, or");
    println!("                             the configured name for file input)");
    println!("    --output <path>, -o      Output file path");
    println!("    --text                   Write a plain-text listing instead of collection.db");
    println!("    --json                   Print the run summary as JSON");
    println!("    --quiet, -q              Only log warnings");
    println!("    --verbose, -v            Log debug detail");
    println!("    --help, -h               Show this help message");
    println!("    --version, -V            Show version");
    println!();
    println!("CREDENTIALS:");
    println!("    Reads OSU_CLIENT_ID and OSU_CLIENT_SECRET from the environment, or");
    println!("    prompts for them when run interactively.");
    println!();
    println!("EXAMPLES:");
    println!("    osu-collect collector 12345");
    println!("    osu-collect collector https://osucollector.com/collections/12345 --stars 4 6");
    println!("    osu-collect file maps.txt --name \"tech maps\" -o tech.db");
    println!("    osu-collect collector 12345 --bpm 180 0 --sort bpm --text");
}
