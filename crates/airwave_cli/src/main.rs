//! Airwave CLI - run the dashboard pipelines over local row dumps.
//!
//! Every resource is read from `<data>/<resource>.json` (a JSON array of
//! rows), so a directory of table exports stands in for the remote store.
//!
//! # Commands
//!
//! - `airwave airplay --data <dir> [--dma <id>]` - heatmap cells and per-market series
//! - `airwave demographic --data <dir> --id <dma>` - age and gender distributions
//! - `airwave venues --data <dir> --dma <id>` - venues with capacity tiers
//! - `airwave preview <chart> --data <dir>` - lay a chart out and list its elements
//! - `airwave init` - write a default `airwave.toml`

use std::path::PathBuf;
use std::process::ExitCode;

use airwave_charts::Size;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod source;

use commands::ChartKind;
use config::AirwaveConfig;

/// Airwave - airplay, demographic, and venue analytics
#[derive(Parser)]
#[command(name = "airwave")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file or directory containing airwave.toml
    #[arg(short, long, global = true, default_value = ".")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate airplay events into heatmap and streamgraph tables
    Airplay {
        /// Directory with the JSON row dumps
        #[arg(short, long)]
        data: PathBuf,

        /// Restrict to the markets of one DMA
        #[arg(long)]
        dma: Option<String>,

        /// Categories kept per series (overrides the config)
        #[arg(short = 'n', long)]
        top_n: Option<usize>,
    },

    /// Age and gender distributions for one DMA
    Demographic {
        #[arg(short, long)]
        data: PathBuf,

        /// DMA id
        #[arg(long)]
        id: String,
    },

    /// Venues of a DMA with their capacity tier
    Venues {
        #[arg(short, long)]
        data: PathBuf,

        #[arg(long)]
        dma: String,
    },

    /// Lay out a chart and print its drawn elements
    Preview {
        #[arg(value_enum)]
        chart: ChartKind,

        #[arg(short, long)]
        data: PathBuf,

        /// DMA id (airplay charts: optional filter, demographic charts: required)
        #[arg(long)]
        id: Option<String>,

        /// Market whose series the streamgraph draws (default: first)
        #[arg(long)]
        group: Option<String>,

        #[arg(long, default_value = "800")]
        width: f32,

        #[arg(long, default_value = "400")]
        height: f32,
    },

    /// Write a default airwave.toml
    Init {
        /// Target directory
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Overwrite existing configuration
        #[arg(long)]
        force: bool,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("airwave=debug,airwave_core=debug,airwave_charts=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("airwave=info,airwave_core=info,airwave_charts=info")
        })
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Init { path, force } = &cli.command {
        return commands::init(path, *force);
    }

    let mut config = AirwaveConfig::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Airplay { data, dma, top_n } => {
            if let Some(n) = top_n {
                config.pipeline.top_n = n;
            }
            commands::airplay(&data, &config, dma.as_deref()).await
        }
        Commands::Demographic { data, id } => commands::demographic(&data, &config, &id).await,
        Commands::Venues { data, dma } => commands::venues(&data, &dma).await,
        Commands::Preview {
            chart,
            data,
            id,
            group,
            width,
            height,
        } => {
            commands::preview(
                &data,
                &config,
                chart,
                id.as_deref(),
                group.as_deref(),
                Size::new(width, height),
            )
            .await
        }
        Commands::Init { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
