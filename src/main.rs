// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand, ValueEnum};
use obscura::backends::camera::CameraPosition;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "obscura")]
#[command(about = "Capture-session tools for the Obscura camera")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    /// Config file (default: ~/.config/obscura/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the cameras of the virtual backend
    List {
        /// JSON device manifest replacing the built-in virtual devices
        #[arg(short, long)]
        devices: Option<PathBuf>,
    },

    /// Run a capture session and take one photo
    Photo {
        /// Camera position (default from config)
        #[arg(short, long, value_enum)]
        position: Option<PositionArg>,

        /// Fire the flash
        #[arg(long)]
        flash: bool,

        /// Turn the torch on
        #[arg(long)]
        torch: bool,

        /// Zoom factor, clamped to the device range
        #[arg(short, long)]
        zoom: Option<f64>,

        /// Exposure bias in EV
        #[arg(short, long, allow_negative_numbers = true)]
        exposure: Option<f64>,

        /// Output directory (default: ~/Pictures/Obscura)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON device manifest replacing the built-in virtual devices
        #[arg(short, long)]
        devices: Option<PathBuf>,
    },

    /// Open the platform photo gallery
    Gallery,
}

#[derive(Clone, Copy, ValueEnum)]
enum PositionArg {
    Back,
    Front,
}

impl From<PositionArg> for CameraPosition {
    fn from(arg: PositionArg) -> Self {
        match arg {
            PositionArg::Back => CameraPosition::Back,
            PositionArg::Front => CameraPosition::Front,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=obscura=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::List { devices } => cli::list_cameras(devices),
        Commands::Photo {
            position,
            flash,
            torch,
            zoom,
            exposure,
            output,
            devices,
        } => cli::take_photo(
            &config,
            cli::PhotoRequest {
                position: position.map(CameraPosition::from),
                flash,
                torch,
                zoom,
                exposure,
                output,
                devices,
            },
        ),
        Commands::Gallery => cli::open_gallery(&config),
    }
}
