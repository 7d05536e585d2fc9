//! Shadow Layout CLI
//!
//! Usage:
//!   shadow-layout [OPTIONS] <SCENE>
//!
//! Options:
//!   -c, --config <FILE>  Layout configuration (TOML format)
//!       --width <W>      Width available to the root
//!       --height <H>     Height available to the root
//!   -v, --verbose...     Log more (repeat for trace output)
//!   -h, --help           Print help

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use shadow_layout::{format_reports, LayoutConfig, Scene};

#[derive(Parser)]
#[command(name = "shadow-layout")]
#[command(about = "Run a shadow tree scene and print the layout changes of every pass")]
struct Cli {
    /// Scene file (TOML format)
    scene: PathBuf,

    /// Layout configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Width available to the root, overriding the configuration
    #[arg(long)]
    width: Option<f64>,

    /// Height available to the root, overriding the configuration
    #[arg(long)]
    height: Option<f64>,

    /// Log more (repeat for trace output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "shadow_layout=debug",
        _ => "shadow_layout=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => match LayoutConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading layout config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LayoutConfig::default(),
    };
    if let Some(width) = cli.width {
        config.available_width = width;
    }
    if let Some(height) = cli.height {
        config.available_height = height;
    }

    let scene = match Scene::from_file(&cli.scene) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Error loading scene '{}': {}", cli.scene.display(), e);
            std::process::exit(1);
        }
    };

    match scene.run(&config) {
        Ok(reports) => print!("{}", format_reports(&reports)),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
