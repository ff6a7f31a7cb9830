use clap::{Parser, Subcommand};
use spotquest_client::http::HttpGateway;
use spotquest_client::play;
use spotquest_core::difficulty::Difficulty;
use spotquest_core::gateway::BackendGateway;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "spotquest",
    about = "Terminal client for the SpotQuest location-guessing game"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Game backend URL
    #[arg(long, default_value = "http://localhost:3000")]
    backend: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Starts a new session and plays it from the terminal
    Play {
        /// Player identity; a guest id is generated when omitted
        #[arg(long)]
        principal: Option<String>,

        /// EASY, NORMAL, HARD or EXTREME
        #[arg(long, default_value = "NORMAL")]
        difficulty: String,

        /// Restrict rounds to a region tag
        #[arg(long)]
        region: Option<String>,
    },
    /// Prints the player's token balance
    Balance {
        #[arg(long)]
        principal: Option<String>,
    },
}

fn guest_principal() -> String {
    format!(
        "guest-{}",
        Uuid::new_v4().to_string().split('-').next().unwrap()
    )
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            principal,
            difficulty,
            region,
        } => {
            // The difficulty enumeration is closed; an unknown name is a
            // configuration error, never silently defaulted.
            let difficulty = match difficulty.parse::<Difficulty>() {
                Ok(d) => d,
                Err(_) => {
                    error!(
                        "Unknown difficulty '{}'. Valid: EASY, NORMAL, HARD, EXTREME",
                        difficulty
                    );
                    std::process::exit(2);
                }
            };
            let principal = principal.unwrap_or_else(guest_principal);
            if let Err(e) = play::run_play(cli.backend, principal, difficulty, region).await {
                error!("Game aborted: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Balance { principal } => {
            let principal = principal.unwrap_or_else(guest_principal);
            let gateway = HttpGateway::new(cli.backend);
            match gateway.token_balance(&principal).await {
                Ok(balance) => info!("💰 {}: {} units", principal, balance),
                Err(e) => {
                    error!("Balance query failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
