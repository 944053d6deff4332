//! sitewatch CLI
//!
//! Local and CI entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sitewatch::{
    error::{AppError, Result},
    models::{Config, RunMode, SiteSnapshot, SitesFile},
    pipeline::{self, CiSignal},
    services::parse_selector,
    storage::{LocalStorage, SnapshotStore},
    utils::{http::HttpFetcher, log::sub_item},
};

/// sitewatch - Web Page Event Monitor
#[derive(Parser, Debug)]
#[command(
    name = "sitewatch",
    version,
    about = "Watches web pages for new events and content changes"
)]
struct Cli {
    /// Directory containing config.toml, the sites file, state and report
    #[arg(short, long, default_value = ".")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check every enabled site and write the report (default)
    Run {
        /// Override the configured mode (signature or events)
        #[arg(long)]
        mode: Option<RunMode>,

        /// Path to the sites file (default: {storage_dir}/sites_config.json)
        #[arg(long)]
        sites: Option<PathBuf>,

        /// File to append CI outputs to (default: $GITHUB_OUTPUT)
        #[arg(long)]
        github_output: Option<PathBuf>,
    },

    /// Validate configuration and the sites file
    Validate {
        #[arg(long)]
        sites: Option<PathBuf>,
    },

    /// Show current snapshot info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");
    let mut config = Config::load_or_default(&config_path);
    let storage = LocalStorage::with_paths(&cli.storage_dir, &config.paths);

    let command = cli.command.unwrap_or(Command::Run {
        mode: None,
        sites: None,
        github_output: None,
    });

    match command {
        Command::Run {
            mode,
            sites,
            github_output,
        } => {
            if let Some(mode) = mode {
                config.mode = mode;
            }
            config.validate()?;

            let sites_path = sites.unwrap_or_else(|| config.sites_path(&cli.storage_dir));
            let sites = SitesFile::load(&sites_path)?;
            log::info!(
                "Loaded {} site(s) from {}",
                sites.sites.len(),
                sites_path.display()
            );

            let fetcher = HttpFetcher::new(&config.fetcher)?;
            let summary = pipeline::run_watch(&config, &sites, &fetcher, &storage).await?;

            if summary.has_updates() {
                log::info!(
                    "Updates found, report written to {}",
                    storage.report_path().display()
                );
            } else {
                log::info!("No new updates on any site");
            }

            let github_output =
                github_output.or_else(|| std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from));
            CiSignal::from_summary(&summary).emit(github_output.as_deref())?;
        }

        Command::Validate { sites } => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (mode: {})", config.mode);

            let sites_path = sites.unwrap_or_else(|| config.sites_path(&cli.storage_dir));
            let sites = SitesFile::load(&sites_path)?;

            let mut invalid = 0;
            for site in &sites.sites {
                let Some(rules) = &site.selectors else {
                    continue;
                };
                for selector in rules.all() {
                    if let Err(e) = parse_selector(selector) {
                        log::error!("[{}] {}", site.name, e);
                        invalid += 1;
                    }
                }
            }
            if invalid > 0 {
                return Err(AppError::validation(format!(
                    "{invalid} invalid selector(s) in {}",
                    sites_path.display()
                )));
            }
            log::info!(
                "✓ Sites OK ({} configured, {} enabled)",
                sites.sites.len(),
                sites.enabled().count()
            );

            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());
            log::info!("Mode: {}", config.mode);

            let snapshot = storage.load_snapshot().await?;
            if snapshot.is_empty() {
                log::info!("No snapshot found yet.");
            } else {
                log::info!("Snapshot ({} site(s)):", snapshot.len());
            }
            for (name, site) in &snapshot {
                let detail = match site {
                    SiteSnapshot::Signature {
                        signature,
                        last_check,
                    } => format!(
                        "{} (last check {})",
                        signature.get(..12).unwrap_or(signature),
                        last_check.format("%Y-%m-%d %H:%M:%S")
                    ),
                    SiteSnapshot::Events(events) => format!("{} recorded event(s)", events.len()),
                };
                sub_item(&format!("{name} [{}]: {detail}", site.kind()));
            }
        }
    }

    Ok(())
}
