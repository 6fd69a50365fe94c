//! Binary for the chatbot HTTP server.

use anyhow::Result;
use cbot_server::{run_server, ServerConfig};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cbot")]
#[command(about = "Conversational chatbot API server", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the server (config from env; bind can override BIND_ADDR).
    Run {
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { bind } => {
            let config = ServerConfig::load(bind)?;
            cbot_core::logger::init_tracing(&config.log_file)?;
            run_server(config).await
        }
    }
}
