use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ovs_sff_resolver::{
    Resolver, ResolverConfig,
    network::forwarder::Forwarder,
    topology::MemoryStore,
};

/// Resolve service function forwarders onto OVS switches
#[derive(Parser)]
#[command(name = "ovs-sff-resolver")]
#[command(version, about, long_about = None)]
struct Cli {
    /// OVSDB topology snapshot (JSON)
    #[arg(short, long)]
    topology: PathBuf,

    /// Forwarder list (JSON array)
    #[arg(short, long)]
    forwarders: PathBuf,

    /// Resolver configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_filter: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ResolverConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ResolverConfig::default(),
    };
    let store = MemoryStore::from_path(&cli.topology)
        .with_context(|| format!("loading topology {}", cli.topology.display()))?;

    let forwarders_json = std::fs::read_to_string(&cli.forwarders)
        .with_context(|| format!("reading {}", cli.forwarders.display()))?;
    let forwarders: Vec<Forwarder> =
        serde_json::from_str(&forwarders_json).context("parsing forwarders")?;

    let resolver = Resolver::with_config(&store, &config)?;
    tracing::info!(
        "Resolving {} forwarders against topology {}",
        forwarders.len(),
        resolver.topology().topology_id()
    );

    let reports: Vec<_> = forwarders.iter().map(|f| resolver.report(f)).collect();
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
