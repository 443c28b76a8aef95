//! # Motash — Scheduled Task Auditor
//!
//! Finds scheduled tasks whose last run ended with an unexpected result code
//! since the previous audit, prints them and sends them to the configured
//! notifiers.
//!
//! Usage:
//!   motash check                          # Audit with ~/.motash/config.toml
//!   motash check --snapshot tasks.json    # Audit an exported folder tree
//!   motash check --dry-run                # Don't notify, don't move the watermark
//!   motash init                           # Write a default config

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use motash_audit::{
    AuditEngine, AuditSettings, Environment, HostEnvironment, SnapshotSource, StaticEnvironment,
    WatermarkStore,
};
use motash_core::MotashConfig;
use motash_core::report::failures_as_text;
use motash_notify::{NotificationDispatcher, ReportContext};

#[derive(Parser)]
#[command(
    name = "motash",
    version,
    about = "🩺 Motash — audits scheduled tasks for failed runs"
)]
struct Cli {
    /// Config file (default: $MOTASH_CONFIG or ~/.motash/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one audit pass
    Check {
        /// Scheduler snapshot (overrides [source] snapshot_path)
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Watermark override, RFC 3339 (default: stored last check)
        #[arg(long)]
        since: Option<DateTime<Utc>>,

        /// Print the report but don't send notifications
        #[arg(long)]
        no_notify: bool,

        /// Neither notify nor advance the stored watermark
        #[arg(long)]
        dry_run: bool,

        /// Skip the OS version and scheduler service checks
        #[arg(long)]
        skip_host_checks: bool,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "motash=debug,motash_audit=debug,motash_notify=debug"
    } else {
        "motash=info,motash_audit=info,motash_notify=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Init { force } => {
            let path = cli.config.unwrap_or_else(MotashConfig::default_path);
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            MotashConfig::default().save_to(&path)?;
            println!("✅ Config written to {}", path.display());
            println!("   Set [audit] RootFolderPattern before the first check.");
            Ok(())
        }
        Command::ShowConfig => {
            let config = load_config(cli.config.as_ref())?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Check {
            snapshot,
            since,
            no_notify,
            dry_run,
            skip_host_checks,
        } => {
            let config = load_config(cli.config.as_ref())?;
            let notify = !(no_notify || dry_run);
            let problems =
                run_check(&config, snapshot, since, notify, dry_run, skip_host_checks).await?;
            if problems > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<MotashConfig> {
    let config = match path {
        Some(p) => MotashConfig::load_from(p)?,
        None => MotashConfig::load()?,
    };
    Ok(config)
}

async fn run_check(
    config: &MotashConfig,
    snapshot: Option<PathBuf>,
    since: Option<DateTime<Utc>>,
    notify: bool,
    dry_run: bool,
    skip_host_checks: bool,
) -> Result<usize> {
    let snapshot = snapshot
        .or_else(|| config.source.snapshot_path.as_deref().map(PathBuf::from))
        .context("No task source: pass --snapshot or set [source] snapshot_path")?;

    let environment: Box<dyn Environment> = if skip_host_checks || config.environment.skip_host_checks {
        Box::new(StaticEnvironment::ready())
    } else {
        Box::new(HostEnvironment)
    };

    let mut engine = AuditEngine::new(
        AuditSettings::from_config(&config.audit),
        Box::new(SnapshotSource::from_file(&snapshot)),
        environment,
    );

    let store = WatermarkStore::new(&config.state.expanded_path());
    if let Some(at) = since.or_else(|| store.load()) {
        engine.set_last_check(at);
    }
    tracing::info!("🔎 Checking runs since {}", engine.last_check());

    let started = Utc::now();
    let problems = engine.check();

    if problems == 0 {
        println!("✅ No problems found");
    } else {
        print!("{}", failures_as_text(engine.failures(), &config.audit.report_format));
    }

    if notify && problems > 0 {
        let context = ReportContext::local(&config.audit.report_format);
        let dispatcher = NotificationDispatcher::from_config(&config.notify, &context);
        if dispatcher.is_empty() {
            tracing::warn!("⚠️ No notifiers configured, report printed only");
        } else {
            let sent = dispatcher.notify(engine.failures()).await;
            tracing::info!("📣 {sent} notifier(s) invoked");
        }
    }

    match engine.next_watermark(started) {
        Some(_) if dry_run => {}
        Some(next) => {
            if let Err(e) = store.save(next) {
                tracing::warn!("⚠️ Watermark not saved: {e}");
            }
        }
        None => tracing::warn!("⚠️ Audit incomplete, watermark stays at {}", engine.last_check()),
    }

    Ok(problems)
}
