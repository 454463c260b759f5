//! plansync: three-way merge of offline project documents.
//!
//! Reads a local document, a remote document and (optionally) the document
//! both were last synchronized from, then previews or performs the merge.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use plansync::config::{Config, DEFAULT_CONFIG_FILE};
use plansync::session::{self, SyncSession};
use plansync_core::{ConflictReport, StrategyKind, SyncContext};

#[derive(Parser, Debug)]
#[command(name = "plansync")]
#[command(about = "Three-way merge of offline project documents")]
struct Args {
    /// Path to the configuration file
    #[arg(long, global = true, env = "PLANSYNC_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report the conflicts a merge would hit, without writing anything
    Preview {
        #[command(flatten)]
        documents: Documents,

        /// Print the conflict report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge the remote document into the local one and write the result
    Merge {
        #[command(flatten)]
        documents: Documents,

        /// Merge policy: dry-run, keep-ours or keep-theirs
        #[arg(short, long, env = "PLANSYNC_STRATEGY")]
        strategy: Option<StrategyKind>,

        /// Where to write the merged document (defaults to the local document)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write documents on a single line
        #[arg(long)]
        compact: bool,

        /// Print the merge summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode and re-encode a document, reporting structural errors
    Check {
        /// Document to check
        path: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct Documents {
    /// Local ("ours") document
    local: PathBuf,

    /// Remote ("theirs") document
    remote: PathBuf,

    /// Document both sides were last synchronized from
    #[arg(short, long)]
    baseline: Option<PathBuf>,
}

impl Documents {
    fn open(&self, sync: &SyncContext) -> Result<SyncSession> {
        let local = read(&self.local)?;
        let remote = read(&self.remote)?;
        let baseline = self.baseline.as_deref().map(read).transpose()?;
        let session = SyncSession::open(sync, &local, &remote, baseline.as_deref())?;
        Ok(session)
    }
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {:?}", path))
}

fn write(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("Failed to write {:?}", path))
}

fn print_report(report: &ConflictReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else if report.is_empty() {
        println!("No conflicts");
    } else {
        print!("{}", report);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging - respects RUST_LOG env var, defaults to info (or debug with --verbose)
    let default_filter = if args.verbose {
        "debug,plansync=debug,plansync_core=debug"
    } else {
        "info,plansync=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(&args.config)?;
    let sync = SyncContext::named("plansync");

    match args.command {
        Command::Preview { documents, json } => {
            let mut session = documents.open(&sync)?;
            let _events = session
                .events()
                .subscribe(|event| debug!("Merge event: {:?}", event));
            let report = session.preview()?;
            print_report(&report, json)?;
        }

        Command::Merge {
            documents,
            strategy,
            output,
            compact,
            json,
        } => {
            let config = config.with_overrides(strategy, compact);
            let mut session = documents.open(&sync)?;
            let _events = session
                .events()
                .subscribe(|event| debug!("Merge event: {:?}", event));

            let summary = session.merge(config.strategy)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_report(&summary.conflicts, false)?;
            }

            if !summary.committed {
                info!("Strategy {} does not commit, nothing written", summary.strategy);
                return Ok(());
            }

            let output = output.unwrap_or_else(|| documents.local.clone());
            let merged = session.document(config.codec_options())?;
            write(&output, &merged)?;
            info!("Wrote merged document to {:?}", output);

            if config.write_baseline {
                let baseline = documents
                    .baseline
                    .clone()
                    .unwrap_or_else(|| output.with_extension("baseline.json"));
                write(&baseline, &merged)?;
                info!("Wrote new baseline to {:?}", baseline);
            }
        }

        Command::Check { path } => {
            let bytes = read(&path)?;
            let summary = session::check(&sync, &bytes)
                .with_context(|| format!("{:?} is not a valid project document", path))?;
            println!(
                "{}: {} mission(s), {} flight(s), {} member(s)",
                summary.project, summary.missions, summary.flights, summary.members
            );
        }
    }

    Ok(())
}
