//! Base-unit conversion.
//!
//! On-chain amounts are integers scaled by `10^decimals`. Inputs are
//! exact `Decimal` values scaled up into `U256`; outputs are rendered
//! straight from `U256`, so any `uint256` the router returns can be
//! displayed.

use alloy::primitives::U256;
use alloy::primitives::utils::format_units as render_units;
use rust_decimal::Decimal;
use thiserror::Error;

/// Largest precision whose `10^decimals` fits in a `U256`.
pub const MAX_DECIMALS: u32 = 77;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("{decimals} decimals exceeds the supported maximum of 77")]
    ScaleTooLarge { decimals: u32 },
    #[error("amount {0} is negative")]
    Negative(Decimal),
    #[error("amount {amount} has more than {decimals} fractional digits")]
    TooPrecise { amount: Decimal, decimals: u32 },
    #[error("amount does not fit at {decimals} decimals")]
    Overflow { decimals: u32 },
}

/// Scale a human-readable amount to integer base units: `amount × 10^decimals`.
///
/// Fractional digits beyond `decimals` are rejected rather than rounded.
pub fn to_base_units(amount: Decimal, decimals: u32) -> Result<U256, UnitsError> {
    if decimals > MAX_DECIMALS {
        return Err(UnitsError::ScaleTooLarge { decimals });
    }
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(UnitsError::Negative(amount));
    }

    let trimmed = amount.normalize();
    if trimmed.scale() > decimals {
        return Err(UnitsError::TooPrecise { amount, decimals });
    }

    let mantissa = u128::try_from(trimmed.mantissa()).map_err(|_| UnitsError::Negative(amount))?;
    let factor = U256::from(10u8).pow(U256::from(decimals - trimmed.scale()));
    U256::from(mantissa)
        .checked_mul(factor)
        .ok_or(UnitsError::Overflow { decimals })
}

/// Render base units as a trimmed decimal string (`990000` @ 6 → `"0.99"`).
///
/// Covers the whole `U256` range. Trailing fractional zeros and a
/// dangling point are dropped, so whole amounts print as integers.
pub fn format_units(raw: U256, decimals: u32) -> Result<String, UnitsError> {
    let scale = u8::try_from(decimals)
        .ok()
        .filter(|d| u32::from(*d) <= MAX_DECIMALS)
        .ok_or(UnitsError::ScaleTooLarge { decimals })?;
    let text = render_units(raw, scale).map_err(|_| UnitsError::ScaleTooLarge { decimals })?;

    Ok(match text.split_once('.') {
        Some((whole, frac)) => match frac.trim_end_matches('0') {
            "" => whole.to_string(),
            frac => format!("{whole}.{frac}"),
        },
        None => text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_one_unit_to_base_units() {
        assert_eq!(to_base_units(dec!(1), 6).unwrap(), U256::from(1_000_000u64));
        assert_eq!(
            to_base_units(dec!(1), 18).unwrap(),
            U256::from(1_000_000_000_000_000_000u128)
        );
    }

    #[test]
    fn test_unit_round_trip_prints_one() {
        for decimals in [0, 6, 8, 18, 36, 77] {
            let raw = to_base_units(dec!(1), decimals).unwrap();
            assert_eq!(format_units(raw, decimals).unwrap(), "1");
        }
    }

    #[test]
    fn test_trailing_zeros_in_input_are_ignored() {
        assert_eq!(to_base_units(dec!(2.500000000), 1).unwrap(), U256::from(25u64));
    }

    #[test]
    fn test_format_fractional_quote() {
        assert_eq!(format_units(U256::from(990_000u64), 6).unwrap(), "0.99");
        assert_eq!(format_units(U256::from(1_000_123u64), 6).unwrap(), "1.000123");
    }

    #[test]
    fn test_zero_decimals_is_integer() {
        assert_eq!(to_base_units(dec!(1), 0).unwrap(), U256::from(1u64));
        assert_eq!(format_units(U256::from(42u64), 0).unwrap(), "42");
    }

    #[test]
    fn test_zero_amount_formats_as_zero() {
        assert_eq!(format_units(U256::ZERO, 6).unwrap(), "0");
    }

    #[test]
    fn test_amounts_beyond_decimal_range_still_format() {
        let raw = U256::from(10u8).pow(U256::from(29u8));
        assert_eq!(format_units(raw, 18).unwrap(), "100000000000");
        assert_eq!(
            format_units(U256::MAX, 18).unwrap(),
            "115792089237316195423570985008687907853269984665640564039457.584007913129639935"
        );
    }

    #[test]
    fn test_rejects_excess_precision() {
        assert_eq!(
            to_base_units(dec!(0.1234567), 6),
            Err(UnitsError::TooPrecise {
                amount: dec!(0.1234567),
                decimals: 6
            })
        );
        assert!(matches!(
            to_base_units(dec!(0.5), 0),
            Err(UnitsError::TooPrecise { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_amount() {
        assert_eq!(to_base_units(dec!(-1), 6), Err(UnitsError::Negative(dec!(-1))));
    }

    #[test]
    fn test_rejects_scale_above_u256_limit() {
        assert_eq!(
            format_units(U256::from(1u64), 78),
            Err(UnitsError::ScaleTooLarge { decimals: 78 })
        );
        assert_eq!(
            to_base_units(dec!(1), 300),
            Err(UnitsError::ScaleTooLarge { decimals: 300 })
        );
    }

    #[test]
    fn test_overflowing_input_amount() {
        assert_eq!(
            to_base_units(Decimal::MAX, 77),
            Err(UnitsError::Overflow { decimals: 77 })
        );
    }
}
