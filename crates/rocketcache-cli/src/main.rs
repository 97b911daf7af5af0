//! rocketcache - SpaceX launches that work offline
//!
//! Prints the launch list and company summary from the local cache first,
//! then again once a refresh from the SpaceX API lands.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::StreamExt;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rocketcache_core::utils::truncate_string;
use rocketcache_core::view::{LaunchFilter, LaunchView, OutcomeFilter, SortOrder};
use rocketcache_core::{ApiClient, CacheManager, Config, LaunchFeed, Repository};

/// Column widths for the launch table
const NAME_WIDTH: usize = 28;
const ROCKET_WIDTH: usize = 22;

#[derive(Parser)]
#[command(
    name = "rocketcache",
    version,
    about = "SpaceX launches and company info, cached for offline use"
)]
struct Cli {
    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Cache directory (overrides config and ROCKETCACHE_CACHE_DIR)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List launches
    Launches {
        /// Only launches from this year, e.g. 2019
        #[arg(long)]
        year: Option<String>,

        #[arg(long, value_enum, default_value_t = OutcomeArg::All)]
        outcome: OutcomeArg,

        #[arg(long, value_enum, default_value_t = SortArg::Desc)]
        sort: SortArg,
    },
    /// Show the company summary
    Company,
    /// List the years that have launches
    Years,
    /// Fetch launches now, ignoring cache age
    Refresh,
    /// Show how old the cached data is
    Status,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutcomeArg {
    All,
    Success,
    Failure,
}

impl From<OutcomeArg> for OutcomeFilter {
    fn from(arg: OutcomeArg) -> Self {
        match arg {
            OutcomeArg::All => OutcomeFilter::All,
            OutcomeArg::Success => OutcomeFilter::SuccessOnly,
            OutcomeArg::Failure => OutcomeFilter::FailureOnly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Asc,
    Desc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Asc => SortOrder::Ascending,
            SortArg::Desc => SortOrder::Descending,
        }
    }
}

/// Initialize the tracing subscriber for logging.
/// Use RUST_LOG to control the level (e.g. RUST_LOG=rocketcache_core=debug).
fn init_tracing(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            Ok(None)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_file.as_deref())?;
    info!("rocketcache starting");

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(dir) = cli.cache_dir {
        config.cache_dir = Some(dir);
    }

    let cache = Arc::new(
        CacheManager::new(config.cache_dir()?).context("Failed to open cache directory")?,
    );

    if let Command::Status = cli.command {
        print_status(&config, &cache);
        return Ok(());
    }

    let client = ApiClient::with_base_url(&config.api_base_url, config.request_timeout())
        .context("Failed to create API client")?;
    let repository = Repository::with_staleness(Arc::new(client), cache, config.staleness());
    let mut feed = LaunchFeed::new(repository);

    match cli.command {
        Command::Launches { year, outcome, sort } => {
            let mut filter = LaunchFilter::default()
                .with_outcome(outcome.into())
                .with_sort(sort.into());
            if let Some(year) = year {
                filter = filter.with_year(year);
            }
            run_launches(&mut feed, filter).await
        }
        Command::Company => run_company(&mut feed).await,
        Command::Years => run_years(&mut feed).await,
        Command::Refresh => {
            feed.refresh_launches().await.context("Refresh failed")?;
            println!("Launches refreshed.");
            Ok(())
        }
        Command::Status => Ok(()),
    }
}

async fn run_launches(feed: &mut LaunchFeed, filter: LaunchFilter) -> Result<()> {
    let mut stream = feed.observe_launches(filter);
    let mut printed = false;
    let mut last_error = None;

    while let Some(result) = stream.next().await {
        match result {
            Ok(launches) => {
                if printed {
                    println!("\n-- refreshed --");
                }
                print_launches(&launches);
                printed = true;
            }
            Err(e) => {
                error!("Failed to load launches: {}", e);
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if !printed => Err(e).context("No launch data available"),
        _ => Ok(()),
    }
}

fn print_launches(launches: &[LaunchView]) {
    if launches.is_empty() {
        println!("No launches match.");
        return;
    }
    for launch in launches {
        println!(
            "#{:<4} {:<name_w$} {:<24} {:<rocket_w$} {:<10} {}",
            launch.flight_number,
            truncate_string(&launch.name, NAME_WIDTH),
            launch.date_time,
            truncate_string(&launch.rocket_info, ROCKET_WIDTH),
            launch.outcome.to_string(),
            launch.status,
            name_w = NAME_WIDTH,
            rocket_w = ROCKET_WIDTH,
        );
    }
}

async fn run_company(feed: &mut LaunchFeed) -> Result<()> {
    let mut stream = feed.observe_company();
    let mut printed = false;
    let mut last_error = None;

    while let Some(result) = stream.next().await {
        match result {
            Ok(company) => {
                if printed {
                    println!("-- refreshed --");
                }
                println!("{}", company.summary());
                printed = true;
            }
            Err(e) => {
                error!("Failed to load company info: {}", e);
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if !printed => Err(e).context("No company data available"),
        _ => Ok(()),
    }
}

async fn run_years(feed: &mut LaunchFeed) -> Result<()> {
    let mut stream = feed.observe_launch_page(LaunchFilter::default());
    let mut years = None;
    let mut last_error = None;

    while let Some(result) = stream.next().await {
        match result {
            Ok(page) => years = Some(page.available_years),
            Err(e) => last_error = Some(e),
        }
    }

    match (years, last_error) {
        (Some(years), _) => {
            println!("{}", years.join("\n"));
            Ok(())
        }
        (None, Some(e)) => Err(e).context("No launch data available"),
        (None, None) => bail!("Launch query ended without a result"),
    }
}

fn print_status(config: &Config, cache: &CacheManager) {
    let ages = cache.get_cache_ages();
    println!("API:       {}", config.api_base_url);
    println!("Cache:     {}", cache.cache_dir().display());
    println!("Launches:  {}", ages.launches_age());
    println!("Company:   {}", ages.company_age());
}
