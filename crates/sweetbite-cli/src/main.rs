//! SweetBite CLI - Run the topping simulation without a renderer

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, presets, simulate};

#[derive(Parser)]
#[command(name = "sweetbite")]
#[command(about = "Headless runner for the SweetBite cake topping simulation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a pointer gesture over the cake and report where toppings ended up
    Simulate {
        /// Emitter config file (TOML)
        #[arg(long)]
        config: Option<String>,

        /// Topping kind (nuts, flowers, berries, chocolate, sprinkles)
        #[arg(long)]
        topping: Option<String>,

        /// Spawn mode (sprinkle or place)
        #[arg(long)]
        mode: Option<String>,

        /// Number of frames to simulate
        #[arg(long, default_value = "300")]
        frames: u32,

        /// Seconds per frame
        #[arg(long, default_value = "0.016666668")]
        dt: f32,

        /// RNG seed (random if omitted)
        #[arg(long)]
        seed: Option<u32>,

        /// Viewport width in pixels
        #[arg(long, default_value = "800")]
        width: f32,

        /// Viewport height in pixels
        #[arg(long, default_value = "600")]
        height: f32,

        /// Unproject sprinkle origins at the cake's depth instead of `spawn_depth`
        #[arg(long)]
        at_cake: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List topping presets
    Presets,

    /// Print the default emitter config as TOML
    Config,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            config,
            topping,
            mode,
            frames,
            dt,
            seed,
            width,
            height,
            at_cake,
            format,
        } => simulate::run(simulate::SimulateArgs {
            config,
            topping,
            mode,
            frames,
            dt,
            seed,
            width,
            height,
            at_cake,
            format,
        }),
        Commands::Presets => presets::run(),
        Commands::Config => config::run(),
    }
}
