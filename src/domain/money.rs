//! Monetary types for rates, prices and notionals.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// USD-denominated notional.
pub type Usd = Decimal;

/// Funding rate as a signed fraction per funding period.
pub type Rate = Decimal;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn notional_to_amount_is_exact() {
        let size: Usd = dec!(20);
        let price: Price = dec!(4000);
        let rate: Rate = dec!(-0.0002);

        assert_eq!(size / price, dec!(0.005));
        assert!(rate.is_sign_negative());
    }
}
