use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use futures::future::join_all;

use baseburn_wallet_core::shared::utils::short_address;
use baseburn_wallet_core::{
    init_burn_core, init_logging, BurnCore, BurnStatus, EthersTokenReader, EthersWallet, Network,
    Settings, WalletClient,
};

/// Burn tokens on Base and earn points
#[derive(Parser)]
#[command(name = "baseburn", version, about = "Burn tokens on Base, earn points")]
struct Cli {
    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Network to use (base, base_sepolia)
    #[arg(long, global = true)]
    network: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in and custom tokens
    Tokens,

    /// Add an ERC-20 token by contract address
    AddToken {
        /// Contract address (0x...)
        address: String,
    },

    /// Burn tokens and wait for confirmation
    Burn {
        /// Token symbol or contract address
        #[arg(short, long)]
        token: String,

        /// Amount in whole tokens, e.g. 2.5
        #[arg(short, long)]
        amount: String,
    },

    /// Show burn history, newest first
    History {
        /// Only show the latest N records
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show points and total burned
    Summary,

    /// Wait for burns that were sent but never confirmed
    Resume,
}

fn parse_network(name: &str) -> Result<Network> {
    match name.to_lowercase().replace('-', "_").as_str() {
        "base" => Ok(Network::Base),
        "base_sepolia" => Ok(Network::BaseSepolia),
        other => Err(anyhow!("Unknown network: {}", other)),
    }
}

fn status_label(status: BurnStatus) -> &'static str {
    match status {
        BurnStatus::Pending => "⏳ pending",
        BurnStatus::Success => "🔥 success",
        BurnStatus::Failed => "❌ failed",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().context("Failed to load settings")?;
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    if let Some(network) = cli.network.as_deref() {
        settings.network = parse_network(network)?;
    }
    init_logging(cli.log_level.as_deref().unwrap_or(&settings.log_level));

    let mut core = init_burn_core(settings).await?;

    match cli.command {
        Commands::Tokens => list_tokens(&core),
        Commands::AddToken { address } => add_token(&mut core, &address).await?,
        Commands::Burn { token, amount } => burn(&core, &token, &amount).await?,
        Commands::History { limit } => show_history(&core, limit).await?,
        Commands::Summary => show_summary(&core).await?,
        Commands::Resume => resume(&core).await?,
    }

    core.shutdown().await?;
    Ok(())
}

fn list_tokens(core: &BurnCore) {
    for token in core.tokens.all_tokens() {
        let address = if token.is_native() {
            "native".to_string()
        } else {
            short_address(&token.address)
        };
        println!(
            "{} {:<8} {:<20} {:<14} {} decimals",
            token.logo, token.symbol, token.name, address, token.decimals
        );
    }
}

async fn add_token(core: &mut BurnCore, address: &str) -> Result<()> {
    let reader = EthersTokenReader::new(core.settings.effective_rpc_url())?;
    let token = core.tokens.add_custom_token(address, &reader).await?;
    println!("Added {} ({}) to token list!", token.symbol, token.name);
    Ok(())
}

async fn burn(core: &BurnCore, query: &str, amount: &str) -> Result<()> {
    let token = core.tokens.resolve(query)?;
    let wallet = Arc::new(EthersWallet::from_settings(&core.settings)?);
    log::debug!("Burning from {}", wallet.address());

    let record = core
        .burner(wallet)
        .burn_and_confirm(&token, amount)
        .await?;

    match record.status {
        BurnStatus::Success => println!(
            "🔥 Burned {} {}! Earned {} points!",
            record.amount, record.token_symbol, record.points_earned
        ),
        BurnStatus::Failed => println!("❌ Burn {} failed on chain", record.id),
        BurnStatus::Pending => println!(
            "⏳ Burn {} is still pending; run `baseburn resume` later",
            record.id
        ),
    }
    println!("   {}", core.settings.network.tx_url(&record.hash));
    Ok(())
}

async fn show_history(core: &BurnCore, limit: Option<usize>) -> Result<()> {
    let history = core.history().await?;
    if history.is_empty() {
        println!("No burns yet");
        return Ok(());
    }

    let limit = limit.unwrap_or(history.len());
    for record in history.iter().take(limit) {
        let when = record
            .created_at()
            .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        println!(
            "{}  {:<11} {} {} (+{} pts)  {}",
            when,
            status_label(record.status),
            record.amount,
            record.token_symbol,
            record.points_earned,
            if record.has_hash() {
                short_address(&record.hash)
            } else {
                "-".to_string()
            }
        );
    }
    Ok(())
}

async fn show_summary(core: &BurnCore) -> Result<()> {
    let summary = core.summary().await?;
    println!("Points:       {}", summary.points);
    println!("Total burned: {}", summary.total_burned);
    Ok(())
}

async fn resume(core: &BurnCore) -> Result<()> {
    let wallet = Arc::new(EthersWallet::from_settings(&core.settings)?);
    let burner = core.burner(wallet);
    let watches = burner.resume_pending().await?;
    if watches.is_empty() {
        println!("Nothing to resume");
        return Ok(());
    }

    println!("Waiting for {} pending burn(s)...", watches.len());
    let outcomes = join_all(watches.into_iter().map(|watch| async move {
        let id = watch.id.clone();
        (id, watch.wait().await)
    }))
    .await;

    for (id, outcome) in outcomes {
        match outcome? {
            Some(status) => println!("{}  {}", status_label(status), id),
            None => println!("{}  {} (unchanged)", status_label(BurnStatus::Pending), id),
        }
    }
    Ok(())
}
