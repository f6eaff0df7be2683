use rust_decimal::Decimal;

/// Largest amount a `NUMERIC(18, 2)` column holds.
pub fn max_money() -> Decimal {
    Decimal::new(999_999_999_999_999_999, 2)
}

/// Prices and totals: non-negative, at most two decimal places, within column range.
pub fn validate_money(field: &str, value: Decimal) -> Result<(), String> {
    if value.is_sign_negative() {
        return Err(format!("{} must not be negative", field));
    }
    if value.normalize().scale() > 2 {
        return Err(format!("{} must have at most 2 decimal places", field));
    }
    if value > max_money() {
        return Err(format!("{} must not exceed {}", field, max_money()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("0", true)]
    #[case("75.50", true)]
    #[case("9999999999999999.99", true)]
    #[case("10000000000000000", false)]
    #[case("10000000000000000000000000000", false)]
    #[case("0.005", false)]
    #[case("-1", false)]
    fn test_validate_money(#[case] value: &str, #[case] ok: bool) {
        let value = Decimal::from_str(value).unwrap();
        assert_eq!(validate_money("price", value).is_ok(), ok);
    }
}
