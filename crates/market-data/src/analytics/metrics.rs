//! Per-row derived metrics.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const ONE_MILLION: Decimal = dec!(1000000);

/// Synthetic 24h high: `price * (1 + change / 100)`.
///
/// `None` when the product does not fit in a `Decimal`.
pub fn high_24h(price: Decimal, percent_change_24h: Decimal) -> Option<Decimal> {
    let factor = Decimal::ONE.checked_add(percent_change_24h / Decimal::ONE_HUNDRED)?;
    price.checked_mul(factor)
}

/// Synthetic 24h low: `price * (1 - |change| / 100)`.
pub fn low_24h(price: Decimal, percent_change_24h: Decimal) -> Option<Decimal> {
    let factor = Decimal::ONE.checked_sub(percent_change_24h.abs() / Decimal::ONE_HUNDRED)?;
    price.checked_mul(factor)
}

pub fn volume_millions(volume_24h: Decimal) -> Decimal {
    volume_24h / ONE_MILLION
}

pub fn volatility_score(percent_change_24h: Decimal) -> Decimal {
    percent_change_24h.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_low_for_positive_change() {
        assert_eq!(high_24h(dec!(1000000), dec!(5)), Some(dec!(1050000)));
        assert_eq!(low_24h(dec!(1000000), dec!(5)), Some(dec!(950000)));
        assert_eq!(volatility_score(dec!(5)), dec!(5));
    }

    #[test]
    fn test_bounds_hold_across_signs() {
        let price = dec!(2500.75);
        for change in [dec!(-37.5), dec!(-2), dec!(0), dec!(0.01), dec!(4.2), dec!(60)] {
            let high = high_24h(price, change).unwrap();
            let low = low_24h(price, change).unwrap();
            assert!(low <= price, "low above price for change {}", change);
            assert!(low <= high, "low above high for change {}", change);
            if change >= Decimal::ZERO {
                assert!(high >= price, "high below price for change {}", change);
            }
            assert!(volatility_score(change) >= Decimal::ZERO);
            assert_eq!(volatility_score(change), change.abs());
        }
    }

    #[test]
    fn test_high_low_overflow_is_none() {
        assert_eq!(high_24h(Decimal::MAX, dec!(50)), None);
        assert_eq!(low_24h(Decimal::MAX, dec!(-300)), None);
        assert!(low_24h(Decimal::MAX, dec!(10)).is_some());
    }

    #[test]
    fn test_volume_millions() {
        assert_eq!(volume_millions(dec!(2500000)), dec!(2.5));
        assert_eq!(volume_millions(Decimal::ZERO), Decimal::ZERO);
    }
}
