use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use passvault_core::VaultConfig;
use passvault_server::telemetry::init_tracing;
use passvault_token::{ClaimSet, TokenCodec};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "passvault", version, about = "Password vault backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve {
        /// Config file (falls back to PASSVAULT_CONFIG, then CONFIG_PATH).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Token utilities.
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },
}

#[derive(Subcommand)]
enum TokenCommand {
    /// Print a signed token using the configured secret.
    Mint(MintArgs),
}

#[derive(Args)]
struct MintArgs {
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    account_id: i64,

    #[arg(long, default_value = "")]
    email: String,

    #[arg(long, default_value_t = 0)]
    role: i32,

    #[arg(long, default_value_t = 0)]
    app_id: i32,

    /// Lifetime, e.g. `1h` or `30m`.
    #[arg(long, default_value = "1h", value_parser = humantime::parse_duration)]
    ttl: Duration,
}

fn load_config(flag: Option<PathBuf>) -> anyhow::Result<VaultConfig> {
    let path = VaultConfig::resolve_path(flag)?;
    VaultConfig::load(&path).with_context(|| format!("failed to load config from {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config } => {
            let cfg = load_config(config)?;
            init_tracing(cfg.env);
            tracing::info!(env = ?cfg.env, "starting passvault");
            passvault_server::serve(cfg).await
        }
        Command::Token {
            command: TokenCommand::Mint(args),
        } => mint(args),
    }
}

fn mint(args: MintArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.account_id > 0, "--account-id must be positive");

    let cfg = load_config(args.config)?;
    let codec = TokenCodec::new(&cfg.secret)?;
    let ttl = chrono::Duration::from_std(args.ttl).context("ttl out of range")?;
    let claims = ClaimSet::new(args.account_id, args.email, args.role, args.app_id, ttl);

    println!("{}", codec.encode(&claims)?);
    Ok(())
}
