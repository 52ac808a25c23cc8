//! Affinity Graph CLI
//!
//! Builds the affinity graph for the first N index-derived points and writes
//! it as JSON.
//!
//! Usage:
//!   simnet-affinity --points 338 --seed 7 --output data/affinity.json --cytoscape

use affinity_graph::export::{self, AffinityReport};
use affinity_graph::{Simnet, SimnetConfig};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "simnet-affinity",
    about = "Generate a synthetic city/ISP affinity graph"
)]
struct Args {
    /// Number of points (defaults to one per catalogued city)
    #[arg(short = 'n', long)]
    points: Option<usize>,

    /// Seed for the ISP population (overrides SIMNET_SEED)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of sampled ISPs (overrides SIMNET_ISP_COUNT)
    #[arg(long)]
    isp_count: Option<usize>,

    /// Mean of the ISP distribution (overrides SIMNET_ISP_MEAN)
    #[arg(long, allow_negative_numbers = true)]
    isp_mean: Option<f64>,

    /// Standard deviation of the ISP distribution (overrides SIMNET_ISP_STDDEV)
    #[arg(long)]
    isp_stddev: Option<f64>,

    /// Output JSON file
    #[arg(short, long, default_value = "affinity.json")]
    output: PathBuf,

    /// Also write Cytoscape.js elements next to the output
    #[arg(long)]
    cytoscape: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> SimnetConfig {
        let mut config = SimnetConfig::from_env();
        if let Some(seed) = self.seed {
            config.isp.seed = Some(seed);
        }
        if let Some(count) = self.isp_count {
            config.isp.count = count;
        }
        if let Some(mean) = self.isp_mean {
            config.isp.mean = mean;
        }
        if let Some(stddev) = self.isp_stddev {
            config.isp.stddev = stddev;
        }
        config
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "affinity_graph={},simnet_affinity={}",
            default_level, default_level
        ))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = args.config();
    let simnet = Simnet::new(&config)?;

    let count = args.points.unwrap_or_else(|| simnet.catalog().len());
    let points = simnet.points(count)?;
    let affinity = simnet.affinity(&points);

    let report = AffinityReport::new(&simnet, &config.isp, count, affinity);
    report.write_json(&args.output)?;

    if args.cytoscape {
        let path = args.output.with_extension("cytoscape.json");
        export::write_cytoscape(&report.affinity, &path)?;
    }

    let stats = &report.metadata.stats;
    info!("{}", "=".repeat(60));
    info!("Points: {}  Edges: {}", count, stats.edges);
    info!(
        "Reachable: {} (mesh {}, regional {}, core {}, base ISP {})",
        stats.reachable, stats.province_mesh, stats.regional_hub, stats.core_hub, stats.base_isp
    );
    info!("Unreachable: {}", stats.unreachable);
    info!("Mean packet loss (reachable): {:.2}%", stats.mean_packet_loss);

    Ok(())
}
