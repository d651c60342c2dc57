//! meetcheck command line
//!
//! `check` writes the report once, `watch` keeps it fresh during a meet,
//! `dump` saves the raw tables as CSV and `compare` diffs finish times
//! between two dumps.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use meetcheck::compare::{compare_finish_times, render_changes};
use meetcheck::daemon::{open_in_browser, DaemonCommand, RefreshScheduler};
use meetcheck::model::MeetData;
use meetcheck::pipeline::{generate_report, load_rule_set};
use meetcheck::report::render_console;
use meetcheck::source::{dump_tables, CsvDirectory, MdbExport, TableSource};
use meetcheck_common::config::{CheckConfig, DotFile, Locations, DEFAULT_INTERVAL_SECS};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "meetcheck", version, about = "Check swim meet results for data entry anomalies")]
struct Cli {
    /// Only warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Per-user defaults file (default: ~/.meetcheck.toml)
    #[arg(long, global = true, env = "MEETCHECK_DOTFILE")]
    dotfile: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Meet database (.mdb); defaults to the rule-set `file`, then the last one used
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Read previously dumped `<table>.csv` files instead of a database
    #[arg(long, conflicts_with = "database")]
    csv_dir: Option<PathBuf>,

    /// Rule-set file (default: meetcheck.toml in the work or current directory)
    #[arg(short, long)]
    checks: Option<PathBuf>,

    /// Report path (default: <database-stem>.html beside the database)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the checks once and write the report
    Check {
        #[command(flatten)]
        run: RunArgs,

        /// Also print flagged swims to the terminal
        #[arg(long)]
        console: bool,
    },

    /// Regenerate the report periodically; keys: r refresh, b browser, q quit
    Watch {
        #[command(flatten)]
        run: RunArgs,

        /// Seconds between refreshes
        #[arg(short, long)]
        interval: Option<u64>,

        /// Open the browser through Windows when running under WSL
        #[arg(long)]
        wsl: bool,
    },

    /// Export every table to `<table>.csv`
    Dump {
        #[arg(short, long)]
        database: PathBuf,

        #[arg(long)]
        output_dir: PathBuf,

        /// Overwrite existing CSV files
        #[arg(long)]
        force: bool,
    },

    /// List swims whose finish time differs between two CSV dumps
    Compare {
        #[arg(long)]
        before: PathBuf,

        #[arg(long)]
        after: PathBuf,
    },
}

/// Everything needed to regenerate the report
struct ReportJob {
    source: Box<dyn TableSource + Send + Sync>,
    checks: Vec<(String, CheckConfig)>,
    output: PathBuf,
    interval_secs: Option<u64>,
}

impl ReportJob {
    fn generate(&self) -> meetcheck::Result<meetcheck::pipeline::ReportOutcome> {
        generate_report(self.source.as_ref(), &self.checks, &self.output)
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let default_level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_dotfile(path: Option<PathBuf>) -> Result<DotFile> {
    let path = path
        .or_else(DotFile::default_path)
        .context("Could not determine a home directory for the dotfile; pass --dotfile")?;
    DotFile::load(&path).with_context(|| format!("Failed to read dotfile {}", path.display()))
}

/// Resolve the table source, rule-set and report path for `check`/`watch`
fn prepare_job(args: &RunArgs, dotfile: &mut DotFile) -> Result<ReportJob> {
    let locations = Locations::new(dotfile.workdir());

    let ruleset_path = locations.resolve_ruleset(args.checks.as_deref(), dotfile.checks().as_deref())?;
    let rule_set = load_rule_set(&ruleset_path)?;
    let output_param = args.output.as_deref().or(rule_set.output.as_deref());

    let (source, output): (Box<dyn TableSource + Send + Sync>, PathBuf) = match &args.csv_dir {
        Some(dir) => {
            let dir = locations.resolve_existing(dir, "CSV directory")?;
            let output = locations.resolve_output(output_param, &dir)?;
            (Box::new(CsvDirectory::new(dir)), output)
        }
        None => {
            let database_param = args.database.as_deref().or(rule_set.file.as_deref());
            let database =
                locations.resolve_database(database_param, dotfile.last_database().as_deref())?;
            if let Err(e) = dotfile.set_last_database(&database) {
                warn!("Could not remember last database in {}: {}", dotfile.path().display(), e);
            }
            let output = locations.resolve_output(output_param, &database)?;
            (Box::new(MdbExport::new(database)), output)
        }
    };

    info!("Checking {} with {}", source.describe(), ruleset_path.display());
    Ok(ReportJob {
        source,
        checks: rule_set.checks,
        output,
        interval_secs: rule_set.interval_secs,
    })
}

fn run_check(args: RunArgs, console: bool, dotfile: &mut DotFile) -> Result<()> {
    let job = prepare_job(&args, dotfile)?;
    let outcome = job.generate().context("Report generation failed")?;

    if console {
        print!("{}", render_console(&outcome.lane_results));
    }
    info!("Report: {}", outcome.output.display());
    Ok(())
}

/// Feed terminal keys to the watch loop; ends after `q` or at EOF
fn spawn_key_listener(tx: mpsc::Sender<DaemonCommand>) -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("key-listener".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let Some(command) = DaemonCommand::from_key(&line) else {
                    continue;
                };
                if tx.blocking_send(command).is_err() || command == DaemonCommand::Quit {
                    break;
                }
            }
        })
}

async fn run_watch(args: RunArgs, interval: Option<u64>, wsl: bool, dotfile: &mut DotFile) -> Result<()> {
    let job = Arc::new(prepare_job(&args, dotfile)?);
    let interval = interval.or(job.interval_secs).unwrap_or(DEFAULT_INTERVAL_SECS).max(1);
    info!("Refreshing {} every {} seconds", job.output.display(), interval);

    let cancel = CancellationToken::new();
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        let interrupted = Arc::clone(&interrupted);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                interrupted.store(true, Ordering::SeqCst);
                cancel.cancel();
            }
        });
    }

    let (tx, rx) = mpsc::channel(16);
    let listener = spawn_key_listener(tx).context("Failed to start key listener")?;

    let scheduler = RefreshScheduler::new(Duration::from_secs(interval), cancel);
    let refresh_job = Arc::clone(&job);
    let report = job.output.clone();
    let refreshes = scheduler
        .run(
            rx,
            move || refresh_job.generate().map(|_| ()),
            move || {
                if let Err(e) = open_in_browser(&report, wsl) {
                    error!("Failed to open browser: {}", e);
                }
            },
        )
        .await;

    // A listener blocked on stdin after Ctrl-C is left to die with the process
    if !interrupted.load(Ordering::SeqCst) && listener.join().is_err() {
        warn!("Key listener panicked");
    }
    info!("Watch ended after {} refreshes", refreshes);
    Ok(())
}

fn run_dump(database: &Path, output_dir: &Path, force: bool) -> Result<()> {
    let source = MdbExport::new(database);
    let written = dump_tables(&source, output_dir, force)
        .with_context(|| format!("Failed to dump {}", database.display()))?;
    info!("Dumped {} tables to {}", written.len(), output_dir.display());
    Ok(())
}

fn load_dump(dir: &Path) -> Result<MeetData> {
    let tables = CsvDirectory::new(dir)
        .load_all()
        .with_context(|| format!("Failed to read dump {}", dir.display()))?;
    Ok(MeetData::build(&tables)?)
}

fn run_compare(before: &Path, after: &Path) -> Result<()> {
    let changes = compare_finish_times(&load_dump(before)?, &load_dump(after)?);
    if changes.is_empty() {
        info!("No finish time differences");
    } else {
        print!("{}", render_changes(&changes));
        info!("{} finish times differ", changes.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    info!(
        "Starting meetcheck v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match cli.command {
        Command::Check { run, console } => {
            let mut dotfile = load_dotfile(cli.dotfile)?;
            run_check(run, console, &mut dotfile)
        }
        Command::Watch { run, interval, wsl } => {
            let mut dotfile = load_dotfile(cli.dotfile)?;
            run_watch(run, interval, wsl, &mut dotfile).await
        }
        Command::Dump {
            database,
            output_dir,
            force,
        } => run_dump(&database, &output_dir, force),
        Command::Compare { before, after } => run_compare(&before, &after),
    }
}
