//! Human-readable token amounts, for log output only.

use alloy_primitives::U256;
use rust_decimal::Decimal;

/// Render a raw token amount scaled by `decimals`.
///
/// Falls back to the raw integer when the value does not fit a `Decimal`.
#[must_use]
pub fn format_amount(amount: U256, decimals: u8) -> String {
    let Some(raw) = u128::try_from(amount)
        .ok()
        .and_then(|v| i128::try_from(v).ok())
    else {
        return amount.to_string();
    };
    match Decimal::try_from_i128_with_scale(raw, u32::from(decimals)) {
        Ok(value) => value.normalize().to_string(),
        Err(_) => amount.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn scales_by_decimals() {
        let amount = U256::from(1_500_000_000_000_000_000u128);
        assert_eq!(format_amount(amount, 18), "1.5");
        assert_eq!(format_amount(U256::from(2_500_000u64), 6), "2.5");
    }

    #[test]
    fn keeps_every_significant_digit() {
        let rendered = format_amount(U256::from(123_456_789u64), 6);
        assert_eq!(rendered.parse::<Decimal>().unwrap(), dec!(123.456789));

        let dust = format_amount(U256::from(1u64), 18);
        assert_eq!(dust.parse::<Decimal>().unwrap(), dec!(0.000000000000000001));
    }

    #[test]
    fn zero_decimals_is_integer() {
        assert_eq!(format_amount(U256::from(100u64), 0), "100");
    }

    #[test]
    fn oversized_amount_falls_back_to_raw() {
        assert_eq!(format_amount(U256::MAX, 18), U256::MAX.to_string());
    }

    #[test]
    fn excessive_scale_falls_back_to_raw() {
        assert_eq!(format_amount(U256::from(5u64), 40), "5");
    }
}
