//! Utility functions for the burn core
//!
//! This module contains common utility functions used throughout the burn core.

use crate::shared::constants::{ADDRESS_LENGTH, NATIVE_TOKEN_ADDRESS, RECORD_ID_SUFFIX_LENGTH};
use crate::shared::error::BurnError;

/// Generate a unique burn record ID: `<unix-millis>-<random suffix>`
pub fn generate_record_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}",
        current_timestamp_millis(),
        &suffix[..RECORD_ID_SUFFIX_LENGTH]
    )
}

/// Get current timestamp in milliseconds
pub fn current_timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Validate Ethereum address format
pub fn validate_ethereum_address(address: &str) -> Result<(), BurnError> {
    if !address.starts_with("0x") {
        return Err(BurnError::validation("Address must start with 0x"));
    }

    if address.len() != ADDRESS_LENGTH {
        return Err(BurnError::validation("Address must be 42 characters long"));
    }

    if !address[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(BurnError::validation("Address contains invalid hex characters"));
    }

    Ok(())
}

/// Whether a token address is the native-asset sentinel
pub fn is_native_address(address: &str) -> bool {
    address == NATIVE_TOKEN_ADDRESS
}

/// Format an integer amount of base units as a decimal string.
///
/// Trailing fractional zeros are dropped: `("2500", 3)` gives `"2.5"`.
pub fn format_amount(amount: &str, decimals: u8) -> Result<String, BurnError> {
    if amount.is_empty() || !amount.chars().all(|c| c.is_ascii_digit()) {
        return Err(BurnError::validation("Invalid amount format"));
    }

    let digits = amount.trim_start_matches('0');
    let decimals = decimals as usize;

    let (whole, fraction) = if digits.len() <= decimals {
        ("0".to_string(), format!("{:0>width$}", digits, width = decimals))
    } else {
        let split = digits.len() - decimals;
        (digits[..split].to_string(), digits[split..].to_string())
    };

    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        Ok(whole)
    } else {
        Ok(format!("{}.{}", whole, fraction))
    }
}

/// Parse a decimal string into an integer amount of base units.
///
/// Only plain digits with at most one `.` are accepted; signs, exponents and
/// more fractional digits than `decimals` are rejected.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<String, BurnError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(BurnError::validation("Amount cannot be empty"));
    }

    let parts: Vec<&str> = amount.split('.').collect();
    let (whole, fraction) = match parts.as_slice() {
        [whole] => (*whole, ""),
        [whole, fraction] => (*whole, *fraction),
        _ => return Err(BurnError::validation("Invalid amount format")),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(BurnError::validation("Invalid amount format"));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(BurnError::validation("Please enter a valid amount"));
    }
    if fraction.len() > decimals as usize {
        return Err(BurnError::validation(format!(
            "Amount has more than {} decimal places",
            decimals
        )));
    }

    let mut result = String::with_capacity(whole.len() + decimals as usize);
    result.push_str(whole);
    result.push_str(fraction);
    for _ in 0..(decimals as usize - fraction.len()) {
        result.push('0');
    }

    let trimmed = result.trim_start_matches('0');
    Ok(if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() })
}

/// Shorten an address for display: `0x1234...abcd`
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_record_id() {
        let id1 = generate_record_id();
        let id2 = generate_record_id();
        assert_ne!(id1, id2);

        let (millis, suffix) = id1.split_once('-').expect("id has a dash");
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), RECORD_ID_SUFFIX_LENGTH);
    }

    #[test]
    fn test_validate_ethereum_address() {
        assert!(validate_ethereum_address("0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6").is_ok());

        assert!(validate_ethereum_address("742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6").is_err()); // No 0x
        assert!(validate_ethereum_address("0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b").is_err()); // Too short
        assert!(validate_ethereum_address("0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8bg").is_err()); // Invalid char
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("1000000", 6).unwrap(), "1");
        assert_eq!(format_amount("100000", 6).unwrap(), "0.1");
        assert_eq!(format_amount("2500000000000000000", 18).unwrap(), "2.5");
        assert_eq!(format_amount("0", 18).unwrap(), "0");
        assert_eq!(format_amount("42", 0).unwrap(), "42");
        assert!(format_amount("-1", 18).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.000000", 6).unwrap(), "1000000");
        assert_eq!(parse_amount("0.100000", 6).unwrap(), "100000");
        assert_eq!(parse_amount(".5", 2).unwrap(), "50");
        assert_eq!(parse_amount("5.", 2).unwrap(), "500");
        assert_eq!(parse_amount("0", 18).unwrap(), "0");
        assert_eq!(parse_amount(" 2.5 ", 18).unwrap(), "2500000000000000000");
    }

    #[test]
    fn test_parse_amount_rejects_malformed_input() {
        assert!(parse_amount("", 18).is_err());
        assert!(parse_amount(".", 18).is_err());
        assert!(parse_amount("-1", 18).is_err());
        assert!(parse_amount("1e3", 18).is_err());
        assert!(parse_amount("1.2.3", 18).is_err());
        assert!(parse_amount("abc", 18).is_err());
        assert!(parse_amount("0.0000000001", 9).is_err());
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6"),
            "0x742d...d8b6"
        );
        assert_eq!(short_address("native"), "native");
    }

    #[test]
    fn test_short_address_non_ascii() {
        assert_eq!(short_address("0x🔥🔥🔥🔥🔥🔥🔥🔥🔥🔥"), "0x🔥🔥🔥🔥...🔥🔥🔥🔥");
        assert_eq!(short_address("ünïcödé"), "ünïcödé");
    }
}
