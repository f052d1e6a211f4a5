//! Display rounding for money amounts

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to whole cents, halves away from zero.
///
/// Amounts keep full precision in the stores; this is only for text. Pair it
/// with `{:.2}` so whole amounts still print two decimals.
pub fn cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
