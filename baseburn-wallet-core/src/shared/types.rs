use std::fmt;
use std::str::FromStr;

use ethers::types::U256;
use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    NetworkConfig, BASE_CONFIG, BASE_SEPOLIA_CONFIG, LEDGER_DECIMALS, POINTS_PER_TOKEN,
};
use crate::shared::error::BurnError;
use crate::shared::utils::{format_amount, parse_amount};

// Basic types for wallet operations
pub type Address = String;
pub type TransactionHash = String;

// Network types - Base mainnet and Base Sepolia
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    #[default]
    Base,
    BaseSepolia,
}

impl Network {
    fn config(&self) -> &'static NetworkConfig {
        match self {
            Network::Base => &BASE_CONFIG,
            Network::BaseSepolia => &BASE_SEPOLIA_CONFIG,
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.config().chain_id
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn rpc_url(&self) -> &'static str {
        self.config().rpc_url
    }

    pub fn native_currency(&self) -> &'static str {
        self.config().native_currency
    }

    pub fn block_explorer(&self) -> &'static str {
        self.config().block_explorer
    }

    /// Explorer link for a transaction hash
    pub fn tx_url(&self, hash: &str) -> String {
        format!("{}/tx/{}", self.block_explorer(), hash)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exact decimal amount with 18 fractional digits.
///
/// Internally an integer count of 10^-18 units, so sums and the points
/// formula never suffer from float rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(U256);

impl Amount {
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    pub fn from_ledger_units(units: U256) -> Self {
        Self(units)
    }

    pub fn ledger_units(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Convert a raw on-chain value with `decimals` precision.
    ///
    /// Digits beyond 18 decimals are truncated.
    pub fn from_base_units(value: U256, decimals: u8) -> Self {
        let ledger = LEDGER_DECIMALS as usize;
        let decimals = decimals as usize;
        if decimals <= ledger {
            Self(value.saturating_mul(U256::exp10(ledger - decimals)))
        } else {
            Self(value / U256::exp10(decimals - ledger))
        }
    }

    /// Convert to raw on-chain units of a token with `decimals` precision.
    pub fn to_base_units(&self, decimals: u8) -> Result<U256, BurnError> {
        let ledger = LEDGER_DECIMALS as usize;
        let decimals = decimals as usize;
        if decimals >= ledger {
            self.0
                .checked_mul(U256::exp10(decimals - ledger))
                .ok_or_else(|| BurnError::validation("Amount is too large"))
        } else {
            let scale = U256::exp10(ledger - decimals);
            if !(self.0 % scale).is_zero() {
                return Err(BurnError::validation(format!(
                    "Amount has more than {} decimal places",
                    decimals
                )));
            }
            Ok(self.0 / scale)
        }
    }

    /// Reward points for burning this amount: floor(amount × 100).
    pub fn points(&self) -> u64 {
        let one = U256::exp10(LEDGER_DECIMALS as usize);
        let points = match self.0.checked_mul(U256::from(POINTS_PER_TOKEN)) {
            Some(scaled) => scaled / one,
            None => (self.0 / one).saturating_mul(U256::from(POINTS_PER_TOKEN)),
        };
        if points > U256::from(u64::MAX) {
            u64::MAX
        } else {
            points.as_u64()
        }
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }
}

impl FromStr for Amount {
    type Err = BurnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let units = parse_amount(s, LEDGER_DECIMALS)?;
        U256::from_dec_str(&units)
            .map(Amount)
            .map_err(|_| BurnError::validation("Amount is too large"))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = format_amount(&self.0.to_string(), LEDGER_DECIMALS)
            .map_err(|_| fmt::Error)?;
        f.write_str(&formatted)
    }
}

/// Final outcome of a mined transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptStatus {
    Confirmed,
    Reverted,
}

/// ERC-20 metadata read from a token contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

// Result types for better error handling
pub type BurnResult<T> = Result<T, BurnError>;
