//! Price, discount and threshold parsing

use std::str::FromStr;

use rust_decimal::Decimal;
use rusty_money::iso::{Currency, EUR, GBP, USD};

use crate::{
    fixtures::FixtureError,
    rules::{DiscountType, Threshold},
};

/// Parse price string (e.g., "59500 USD" or "2,999.99 GBP") into an amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = Decimal::from_str(&amount.replace(',', ""))
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((amount, currency))
}

/// Parse a discount string into its type and value
///
/// Accepts two formats:
/// - Percentage format: "45%" for 45 percentage points
/// - Price format: "2500 USD" for a flat amount
///
/// The currency is returned for flat discounts so the caller can check it.
///
/// # Errors
///
/// Returns an error if the string is neither a percentage nor a valid price.
pub fn parse_discount(
    s: &str,
) -> Result<(DiscountType, Decimal, Option<&'static Currency>), FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = Decimal::from_str(percent_str.trim())
            .map_err(|_err| FixtureError::InvalidDiscount(s.to_string()))?;

        return Ok((DiscountType::Percentage, value, None));
    }

    let (value, currency) =
        parse_price(trimmed).map_err(|_err| FixtureError::InvalidDiscount(s.to_string()))?;

    Ok((DiscountType::Flat, value, Some(currency)))
}

/// Parse a threshold string (e.g., "> 100000 USD" or ">= 5000 USD")
///
/// Without a comparison prefix the threshold is inclusive.
///
/// # Errors
///
/// Returns an error if the price part cannot be parsed.
pub fn parse_threshold(s: &str) -> Result<(Threshold<Decimal>, &'static Currency), FixtureError> {
    let trimmed = s.trim();

    if let Some(price) = trimmed.strip_prefix(">=") {
        let (amount, currency) = parse_price(price)?;

        Ok((Threshold::at_least(amount), currency))
    } else if let Some(price) = trimmed.strip_prefix('>') {
        let (amount, currency) = parse_price(price)?;

        Ok((Threshold::above(amount), currency))
    } else {
        let (amount, currency) = parse_price(trimmed)?;

        Ok((Threshold::at_least(amount), currency))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::rules::Comparison;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99USD");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_keeps_fractions_and_strips_separators() -> Result<(), FixtureError> {
        let (amount, currency) = parse_price("140,291.25 USD")?;

        assert_eq!(amount, dec!(140291.25));
        assert_eq!(currency, USD);

        Ok(())
    }

    #[test]
    fn parse_discount_accepts_percentage() -> Result<(), FixtureError> {
        let (discount_type, value, currency) = parse_discount(" 45% ")?;

        assert_eq!(discount_type, DiscountType::Percentage);
        assert_eq!(value, dec!(45));
        assert!(currency.is_none());

        Ok(())
    }

    #[test]
    fn parse_discount_accepts_flat_amount() -> Result<(), FixtureError> {
        let (discount_type, value, currency) = parse_discount("2500 GBP")?;

        assert_eq!(discount_type, DiscountType::Flat);
        assert_eq!(value, dec!(2500));
        assert_eq!(currency, Some(GBP));

        Ok(())
    }

    #[test]
    fn parse_discount_rejects_garbage() {
        let result = parse_discount("lots");

        assert!(matches!(result, Err(FixtureError::InvalidDiscount(_))));
    }

    #[test]
    fn parse_threshold_reads_comparison() -> Result<(), FixtureError> {
        let (above, _) = parse_threshold("> 100000 USD")?;
        let (at_least, _) = parse_threshold(">= 5000 USD")?;
        let (bare, _) = parse_threshold("0 USD")?;

        assert_eq!(above.comparison(), Comparison::Above);
        assert_eq!(above.amount(), dec!(100000));
        assert_eq!(at_least.comparison(), Comparison::AtLeast);
        assert_eq!(bare.comparison(), Comparison::AtLeast);
        assert_eq!(bare.amount(), Decimal::ZERO);

        Ok(())
    }
}
