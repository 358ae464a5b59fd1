use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "capfront")]
#[command(
    about = "capfront - diagnostic client for the capitalism simulation server",
    long_about = None
)]
struct Cli {
    /// Config file to use instead of ~/.config/capfront/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log the admin in and list templates and known users
    Bootstrap,
    /// Log a user in and summarize their cached data
    Status {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        password: String,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    capfront_infrastructure::init_tracing(if cli.verbose { "debug" } else { "info" });

    let config = commands::utils::load_config(cli.config.as_deref())?;
    tracing::debug!("[Cli] Using API at {}", config.api_base_url);

    match cli.command {
        Commands::Bootstrap => commands::bootstrap::run(config).await?,
        Commands::Status { user, password } => {
            commands::status::run(config, &user, &password).await?
        }
        Commands::Config => println!("{:#?}", config),
    }

    Ok(())
}
