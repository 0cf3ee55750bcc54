use alloy_primitives::U256;

use crate::consts::WEI_DECIMALS;
use crate::error::ValidationError;

/// Parses a decimal amount such as `"1.5"` into wei.
pub fn parse_ether(input: &str) -> Result<U256, ValidationError> {
    let invalid = || ValidationError::InvalidPrice(input.to_string());
    let text = input.trim();

    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if fraction.len() > WEI_DECIMALS {
        return Err(invalid());
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let mut digits = String::with_capacity(whole.len() + WEI_DECIMALS);
    digits.push_str(if whole.is_empty() { "0" } else { whole });
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(WEI_DECIMALS - fraction.len()));

    U256::from_str_radix(&digits, 10).map_err(|_| invalid())
}

/// Like [`parse_ether`] but rejects zero, for list prices.
pub fn parse_price(input: &str) -> Result<U256, ValidationError> {
    let wei = parse_ether(input)?;
    if wei.is_zero() {
        return Err(ValidationError::InvalidPrice(input.to_string()));
    }
    Ok(wei)
}

/// Formats wei as a decimal amount, trimming trailing zeros.
pub fn format_ether(wei: U256) -> String {
    let mut digits = wei.to_string();
    if digits.len() <= WEI_DECIMALS {
        let pad = WEI_DECIMALS + 1 - digits.len();
        digits.insert_str(0, &"0".repeat(pad));
    }
    let (whole, fraction) = digits.split_at(digits.len() - WEI_DECIMALS);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}

/// Formats a decimal wei string such as a subgraph BigInt. Input that is not
/// a number is returned unchanged.
pub fn format_wei_str(raw: &str) -> String {
    match U256::from_str_radix(raw.trim(), 10) {
        Ok(wei) => format_ether(wei),
        Err(_) => raw.to_string(),
    }
}

/// Seller proceeds after the marketplace fee; never underflows.
pub fn net_proceeds(price: U256, fee: U256) -> U256 {
    price.saturating_sub(fee)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ether() {
        assert_eq!(parse_ether("1").unwrap(), U256::from(10u64).pow(U256::from(18)));
        assert_eq!(parse_ether("1.5").unwrap(), U256::from(1_500_000_000_000_000_000u64));
        assert_eq!(parse_ether(".25").unwrap(), U256::from(250_000_000_000_000_000u64));
        assert_eq!(parse_ether("0.000000000000000001").unwrap(), U256::from(1u64));
        assert_eq!(parse_ether(" 2 ").unwrap(), U256::from(2_000_000_000_000_000_000u64));
    }

    #[test]
    fn test_format_wei_str() {
        assert_eq!(format_wei_str("1500000000000000000"), "1.5");
        assert_eq!(format_wei_str("0"), "0");
        assert_eq!(format_wei_str("n/a"), "n/a");
    }

    #[test]
    fn test_parse_ether_rejects_garbage() {
        assert!(parse_ether("").is_err());
        assert!(parse_ether(".").is_err());
        assert!(parse_ether("-1").is_err());
        assert!(parse_ether("1e18").is_err());
        assert!(parse_ether("1.2.3").is_err());
        assert!(parse_ether("0.0000000000000000001").is_err());
    }

    #[test]
    fn test_parse_price_rejects_zero() {
        assert_eq!(
            parse_price("0.0"),
            Err(ValidationError::InvalidPrice("0.0".to_string()))
        );
        assert!(parse_price("0.01").is_ok());
    }

    #[test]
    fn test_format_ether() {
        assert_eq!(format_ether(U256::ZERO), "0");
        assert_eq!(format_ether(U256::from(1u64)), "0.000000000000000001");
        assert_eq!(format_ether(U256::from(1_500_000_000_000_000_000u64)), "1.5");
        assert_eq!(format_ether(parse_ether("1234.05").unwrap()), "1234.05");
    }

    #[test]
    fn test_net_proceeds() {
        assert_eq!(net_proceeds(U256::from(100u64), U256::from(3u64)), U256::from(97u64));
        assert_eq!(net_proceeds(U256::from(1u64), U256::from(3u64)), U256::ZERO);
    }
}
