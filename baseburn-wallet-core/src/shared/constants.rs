//! Constants for the burn core
//!
//! This module contains all constants used throughout the burn core.

// Burn constants
pub const BURN_ADDRESS: &str = "0x000000000000000000000000000000000000dEaD";
pub const FEE_RECIPIENT: &str = "0xCC5552a28C2AA0AaE2B09826311900b466AebA65";
/// 5% fee. Declared alongside the burn address, not charged by submission.
pub const FEE_PERCENTAGE: f64 = 0.05;
pub const POINTS_PER_TOKEN: u64 = 100;

/// Sentinel address marking the chain's native asset.
pub const NATIVE_TOKEN_ADDRESS: &str = "native";
pub const CUSTOM_TOKEN_LOGO: &str = "🪙";

// Storage keys, kept identical to the browser mini app
pub const POINTS_KEY: &str = "burner-points";
pub const TOTAL_BURNED_KEY: &str = "total-burned";
pub const HISTORY_KEY: &str = "burn-history";
pub const CUSTOM_TOKENS_KEY: &str = "custom-tokens";

pub const DATA_DIR_NAME: &str = "baseburn";
pub const CONFIG_FILE_NAME: &str = "baseburn";
pub const ENV_PREFIX: &str = "BASEBURN";

// Amount handling
pub const LEDGER_DECIMALS: u8 = 18;
pub const RECORD_ID_SUFFIX_LENGTH: usize = 9;

// Validation constants
pub const ADDRESS_LENGTH: usize = 42; // 0x + 40 hex chars

// Network timeouts
pub const TRANSACTION_CONFIRMATION_TIMEOUT: u64 = 300000; // 5 minutes
pub const METADATA_LOOKUP_RETRIES: u32 = 2;
pub const LEDGER_CHANNEL_CAPACITY: usize = 64;

// Network configurations
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: &'static str,
    pub rpc_url: &'static str,
    pub block_explorer: &'static str,
    pub native_currency: &'static str,
}

pub static BASE_CONFIG: NetworkConfig = NetworkConfig {
    chain_id: 8453,
    name: "Base",
    rpc_url: "https://mainnet.base.org",
    block_explorer: "https://basescan.org",
    native_currency: "ETH",
};

pub static BASE_SEPOLIA_CONFIG: NetworkConfig = NetworkConfig {
    chain_id: 84532,
    name: "Base Sepolia",
    rpc_url: "https://sepolia.base.org",
    block_explorer: "https://sepolia.basescan.org",
    native_currency: "ETH",
};

// Token configurations
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub symbol: &'static str,
    pub name: &'static str,
    pub address: &'static str,
    pub decimals: u8,
    pub logo: &'static str,
}

/// Popular Base meme tokens offered out of the box.
pub static BASE_MEME_TOKENS: &[TokenConfig] = &[
    TokenConfig {
        symbol: "ETH",
        name: "Ethereum",
        address: NATIVE_TOKEN_ADDRESS,
        decimals: 18,
        logo: "🔷",
    },
    TokenConfig {
        symbol: "DEGEN",
        name: "Degen",
        address: "0x4ed4E862860beD51a9570b96d89aF5E1B0Efefed",
        decimals: 18,
        logo: "🎩",
    },
    TokenConfig {
        symbol: "TOSHI",
        name: "Toshi",
        address: "0xAC1Bd2486aAf3B5C0fc3Fd868558b082a531B2B4",
        decimals: 18,
        logo: "🐱",
    },
    TokenConfig {
        symbol: "BRETT",
        name: "Brett",
        address: "0x532f27101965dd16442E59d40670FaF5eBB142E4",
        decimals: 18,
        logo: "🐸",
    },
    TokenConfig {
        symbol: "HIGHER",
        name: "Higher",
        address: "0x0578d8A44db98B23BF096A382e016e29a5Ce0ffe",
        decimals: 18,
        logo: "⬆️",
    },
    TokenConfig {
        symbol: "MOCHI",
        name: "Mochi",
        address: "0xF6e932Ca12afa26665dC4dDE7e27be02A7c02e50",
        decimals: 18,
        logo: "🍡",
    },
    TokenConfig {
        symbol: "NORMIE",
        name: "Normie",
        address: "0x7F12d13B34F5F4f0a9449c16Bcd42f0da47AF200",
        decimals: 9,
        logo: "😐",
    },
];

// Build information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
