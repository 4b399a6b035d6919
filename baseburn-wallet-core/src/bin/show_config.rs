use baseburn_wallet_core::shared::constants::{
    BURN_ADDRESS, DESCRIPTION, FEE_PERCENTAGE, FEE_RECIPIENT, NAME, VERSION,
};
use baseburn_wallet_core::{FileStorage, Settings};

fn main() {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {}", e);
            std::process::exit(1);
        }
    };

    println!("{} {} - {}\n", NAME, VERSION, DESCRIPTION);
    println!("  Network: {} (chain {})", settings.network, settings.network.chain_id());
    println!("  Default RPC URL: {}", settings.network.rpc_url());
    println!(
        "  RPC URL override: {}",
        settings.rpc_url.as_deref().unwrap_or("(not set)")
    );
    println!("  Selected RPC URL: {}", settings.effective_rpc_url());
    println!("  Block explorer: {}", settings.network.block_explorer());
    println!("  Data directory: {}", settings.data_dir.display());
    println!("  Platform default data directory: {}", FileStorage::default_dir().display());
    println!(
        "  Private key: {}",
        if settings.private_key.is_some() { "(set)" } else { "(not set)" }
    );
    println!("  Log level: {}", settings.log_level);
    println!("  Burn address: {}", BURN_ADDRESS);
    println!(
        "  Fee: {}% to {} (not charged on burns)",
        FEE_PERCENTAGE * 100.0,
        FEE_RECIPIENT
    );
}
