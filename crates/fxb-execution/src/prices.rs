//! Integer-micros price representation.
//!
//! Every price on the command surface, in the ledger and in the trade table
//! is an `i64` count of micros (1 unit = 1_000_000 micros). FX quotes carry
//! five decimals, so micros hold them exactly and bracket offsets such as
//! `0.003` add without drift.
//!
//! `f64` conversions happen only at the edges:
//!
//! | Direction                     | Function            |
//! |-------------------------------|---------------------|
//! | internal -> report / display  | [`micros_to_price`] |
//! | config / event script -> internal | [`price_to_micros`] |

/// Scale factor: 1 price unit = 1_000_000 micros (6 decimal places).
pub const MICROS_PER_UNIT: i64 = 1_000_000;

/// Errors returned by [`price_to_micros`] when the input is not representable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Input was `NaN` or infinite.
    NotFinite,
    /// Input would overflow `i64` after scaling by [`MICROS_PER_UNIT`].
    OutOfRange,
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingError::NotFinite => {
                write!(f, "price_to_micros: non-finite input (NaN or Inf)")
            }
            PricingError::OutOfRange => {
                write!(f, "price_to_micros: price out of i64 range after scaling")
            }
        }
    }
}

impl std::error::Error for PricingError {}

/// Convert integer micros to `f64` for display or serialization.
pub fn micros_to_price(micros: i64) -> f64 {
    micros as f64 / MICROS_PER_UNIT as f64
}

/// Convert an `f64` price (config value, parsed decimal) into integer micros.
///
/// Rounds to the nearest micro so `0.003` becomes exactly `3_000`.
///
/// # Errors
/// [`PricingError::NotFinite`] for `NaN`/infinite input,
/// [`PricingError::OutOfRange`] when the scaled value overflows `i64`.
pub fn price_to_micros(price: f64) -> Result<i64, PricingError> {
    if !price.is_finite() {
        return Err(PricingError::NotFinite);
    }
    let scaled = price * MICROS_PER_UNIT as f64;
    // `as` saturates; out-of-range must be rejected instead.
    if scaled > i64::MAX as f64 || scaled < i64::MIN as f64 {
        return Err(PricingError::OutOfRange);
    }
    Ok(scaled.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fx_offsets_are_exact_in_micros() {
        assert_eq!(price_to_micros(0.003).unwrap(), 3_000);
        assert_eq!(price_to_micros(0.001).unwrap(), 1_000);
        assert_eq!(price_to_micros(0.71234).unwrap(), 712_340);
    }

    #[test]
    fn bracket_prices_from_scenario() {
        let close = price_to_micros(1.000).unwrap();
        let tp = close + price_to_micros(0.003).unwrap();
        let sl = close - price_to_micros(0.001).unwrap();
        assert_eq!((close, tp, sl), (1_000_000, 1_003_000, 999_000));
    }

    #[test]
    fn micros_to_price_five_decimal_quote() {
        let f = micros_to_price(712_340);
        assert!((f - 0.71234).abs() < 1e-12);
    }

    #[test]
    fn price_to_micros_rounds_half_up() {
        assert_eq!(price_to_micros(0.000_000_5).unwrap(), 1);
    }

    #[test]
    fn negative_prices_convert() {
        // Offsets applied below zero are still representable; policy lives elsewhere.
        assert_eq!(price_to_micros(-0.001).unwrap(), -1_000);
    }

    #[test]
    fn nan_and_inf_are_rejected() {
        assert_eq!(price_to_micros(f64::NAN), Err(PricingError::NotFinite));
        assert_eq!(price_to_micros(f64::INFINITY), Err(PricingError::NotFinite));
        assert_eq!(
            price_to_micros(f64::NEG_INFINITY),
            Err(PricingError::NotFinite)
        );
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert_eq!(price_to_micros(f64::MAX), Err(PricingError::OutOfRange));
    }
}
