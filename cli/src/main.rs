pub mod commands;

use clap::Parser;
use commands::Commands;
use shared::{env, logger};

/// Client for the coin canvas: watch the live canvas, query pixels and derive
/// burn addresses.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    env::init();
    logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Watch(args) => commands::watch::run(args).await,
        Commands::Pixel(args) => commands::pixel::run(args).await,
        Commands::Address(args) => commands::address::run(args),
    };

    if let Err(e) = result {
        logger::log_error("canvas", &e);
        std::process::exit(1);
    }
}
