use airdrop_engine::{run_allocation, AllocationError};
use airdrop_sources::{fetch_snapshot, HttpSource};
use airdrop_storage::ReportStore;
use airdrop_types::{AirdropConfig, AllocationReport, RawSnapshot};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

mod summary;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Proposal airdrop snapshot: split a monthly token budget across a proposal's supporters"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, default_value_t = 90)]
    proposal_id: u64,
    /// Total tokens across all months.
    #[arg(long, default_value_t = 160_000_000)]
    total_airdrop: u64,
    #[arg(long, default_value_t = 8)]
    months: u32,
    #[arg(short, long, default_value = "https://api.steemit.com")]
    node_url: String,
    #[arg(long, default_value = "https://sds.steemworld.org")]
    proxy_url: String,
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
    /// Delay between outbound requests.
    #[arg(long, default_value_t = 500)]
    throttle_ms: u64,
    #[arg(long, default_value_t = 4)]
    max_in_flight: usize,
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch voters and proxies from the network, allocate and save the report
    Snapshot {
        /// Also save the fetched raw inputs for offline re-runs
        #[arg(long)]
        save_raw: bool,
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Allocate from a previously saved raw snapshot
    Allocate {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Print the summary of a saved report
    Show {
        #[arg(long)]
        report: PathBuf,
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

impl Cli {
    fn config(&self) -> AirdropConfig {
        AirdropConfig {
            proposal_id: self.proposal_id,
            total_airdrop: self.total_airdrop,
            months: self.months,
            node_url: self.node_url.clone(),
            proxy_chain_url: self.proxy_url.clone(),
            throttle_ms: self.throttle_ms,
            max_in_flight: self.max_in_flight,
            output_dir: self.output_dir.clone(),
            ..Default::default()
        }
    }
}

fn allocate_and_save(snapshot: &RawSnapshot, config: &AirdropConfig, store: &ReportStore) -> Result<AllocationReport> {
    let report = match run_allocation(snapshot, config) {
        Ok(report) => report,
        Err(AllocationError::NoEligibleStake { records }) => {
            error!("No eligible stake; {} accounts were classified:", records.len());
            for record in &records {
                error!("  {} {:?} proxy={:?}", record.account, record.role, record.resolved_proxy_target);
            }
            anyhow::bail!("proposal {} has no eligible stake", snapshot.proposal_id);
        }
        Err(e) => return Err(e).context("allocation failed"),
    };
    store.save_report(&report).context("Failed to save report")?;
    Ok(report)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let config = cli.config();
    config.validate().context("invalid configuration")?;
    let store = ReportStore::new(&config.output_dir);

    match &cli.command {
        Commands::Snapshot { save_raw, top } => {
            let source = HttpSource::new(&config).context("Failed to build HTTP client")?;
            let snapshot = fetch_snapshot(&source, &config)
                .await
                .with_context(|| format!("Failed to fetch snapshot for proposal {}", config.proposal_id))?;
            if *save_raw {
                store.save_snapshot(&snapshot).context("Failed to save raw snapshot")?;
            }
            let report = allocate_and_save(&snapshot, &config, &store)?;
            print!("{}", summary::render(&report, *top)?);
        }
        Commands::Allocate { input, top } => {
            let snapshot = ReportStore::load_snapshot(input)
                .with_context(|| format!("Failed to load snapshot {}", input.display()))?;
            info!("Loaded snapshot taken at {}", snapshot.taken_at);
            let report = allocate_and_save(&snapshot, &config, &store)?;
            print!("{}", summary::render(&report, *top)?);
        }
        Commands::Show { report, top } => {
            let report = ReportStore::load_report(report)
                .with_context(|| format!("Failed to load report {}", report.display()))?;
            print!("{}", summary::render(&report, *top)?);
        }
    }

    Ok(())
}
