//! Minimum-output bound for a slice.
//!
//! All arithmetic here is integer-only so the bound matches the ledger's
//! fixed-point math to the unit. Floating point must never reach this path.

use alloy_primitives::U256;

/// Basis points in one whole.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Absolute ceiling on the effective slippage, whatever the order asks for.
pub const MAX_EFFECTIVE_SLIPPAGE_BPS: u32 = 9_000;

/// The order's own slippage ceiling plus the keeper's safety margin,
/// clamped to [`MAX_EFFECTIVE_SLIPPAGE_BPS`].
#[must_use]
pub fn effective_slippage_bps(max_slippage_bps: u16, margin_bps: u32) -> u32 {
    u32::from(max_slippage_bps)
        .saturating_add(margin_bps)
        .min(MAX_EFFECTIVE_SLIPPAGE_BPS)
}

/// `floor(quoted_out * (10000 - slippage_bps) / 10000)`.
///
/// Computed as `q/D*k + (q%D)*k/D`, which is exactly the same floor but
/// cannot overflow for any `U256` quote.
#[must_use]
pub fn min_out(quoted_out: U256, slippage_bps: u32) -> U256 {
    let keep = BPS_DENOMINATOR - slippage_bps.min(BPS_DENOMINATOR);
    let denominator = U256::from(BPS_DENOMINATOR);
    let keep = U256::from(keep);
    let whole = quoted_out / denominator;
    let rest = quoted_out % denominator;
    whole * keep + rest * keep / denominator
}

/// Result of bounding a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlippageBound {
    pub effective_slippage_bps: u32,
    pub min_out: U256,
}

impl SlippageBound {
    /// Bound `quoted_out` for an order with the given slippage ceiling.
    #[must_use]
    pub fn compute(quoted_out: U256, max_slippage_bps: u16, margin_bps: u32) -> Self {
        let effective_slippage_bps = effective_slippage_bps(max_slippage_bps, margin_bps);
        Self {
            effective_slippage_bps,
            min_out: min_out(quoted_out, effective_slippage_bps),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_is_added_to_order_slippage() {
        assert_eq!(effective_slippage_bps(100, 20), 120);
        assert_eq!(effective_slippage_bps(0, 0), 0);
    }

    #[test]
    fn effective_slippage_is_capped() {
        assert_eq!(effective_slippage_bps(9_000, 20), 9_000);
        assert_eq!(effective_slippage_bps(8_990, 20), 9_000);
        assert_eq!(effective_slippage_bps(u16::MAX, u32::MAX), 9_000);
    }

    #[test]
    fn small_quote_rounds_down() {
        // 97 * 9880 / 10000 = 95.836
        assert_eq!(min_out(U256::from(97), 120), U256::from(95));
    }

    #[test]
    fn exact_division_has_no_rounding() {
        assert_eq!(min_out(U256::from(10_000), 120), U256::from(9_880));
        assert_eq!(min_out(U256::from(1_000_000), 0), U256::from(1_000_000));
    }

    #[test]
    fn matches_naive_formula_when_it_does_not_overflow() {
        for quote in [0u64, 1, 9_999, 10_001, 123_456_789, 1_000_000_000_000_000_007] {
            for bps in [0u32, 1, 20, 120, 4_999, 9_000] {
                let q = U256::from(quote);
                let expected = q * U256::from(10_000 - bps) / U256::from(10_000);
                assert_eq!(min_out(q, bps), expected, "quote={quote} bps={bps}");
            }
        }
    }

    #[test]
    fn huge_quotes_do_not_overflow() {
        let bound = min_out(U256::MAX, 9_000);
        assert_eq!(bound, U256::MAX / U256::from(10));
    }

    #[test]
    fn bound_combines_both_steps() {
        let bound = SlippageBound::compute(U256::from(97), 100, 20);
        assert_eq!(bound.effective_slippage_bps, 120);
        assert_eq!(bound.min_out, U256::from(95));
    }
}
