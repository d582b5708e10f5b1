//! Custom askama filters for the shop templates.

use std::borrow::Borrow;
use std::fmt::Display;

use askama::Result;

/// Money amount with two decimals.
pub fn money<T: Borrow<f64>>(amount: T) -> Result<String> {
    Ok(format!("${:.2}", amount.borrow()))
}

/// Five-star rating, filled up to `rating`.
pub fn stars<T: Borrow<i64>>(rating: T) -> Result<String> {
    let filled = (*rating.borrow()).clamp(0, 5) as usize;
    Ok(format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled)))
}

/// The value, or `fallback` when it renders blank.
pub fn fallback<T: Display>(value: T, fallback: &str) -> Result<String> {
    let value = value.to_string();
    if value.trim().is_empty() {
        Ok(fallback.to_string())
    } else {
        Ok(value)
    }
}

/// Average rating out of five, or a placeholder when there is none.
pub fn rating<T: Borrow<Option<f64>>>(average: T) -> Result<String> {
    match average.borrow() {
        Some(value) => Ok(format!("{value:.1} out of 5")),
        None => Ok("No ratings yet".to_string()),
    }
}

/// Click-through rate as a percentage of impressions.
pub fn click_rate<C: Borrow<i64>, I: Borrow<i64>>(clicks: C, impressions: I) -> Result<String> {
    let impressions = *impressions.borrow();
    if impressions <= 0 {
        return Ok("no CTR".to_string());
    }
    let rate = *clicks.borrow() as f64 / impressions as f64 * 100.0;
    Ok(format!("{rate:.1}% CTR"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_and_stars() {
        assert_eq!(money(1234.5_f64).unwrap(), "$1234.50");
        assert_eq!(money(&0.0_f64).unwrap(), "$0.00");
        assert_eq!(stars(4_i64).unwrap(), "★★★★☆");
        assert_eq!(stars(&9_i64).unwrap(), "★★★★★");
    }

    #[test]
    fn test_fallback_for_blank_values() {
        assert_eq!(fallback("", "-").unwrap(), "-");
        assert_eq!(fallback("  ", "none").unwrap(), "none");
        assert_eq!(fallback("Gears", "-").unwrap(), "Gears");
    }

    #[test]
    fn test_rating_and_click_rate() {
        assert_eq!(rating(Some(4.5)).unwrap(), "4.5 out of 5");
        assert_eq!(rating(None::<f64>).unwrap(), "No ratings yet");
        assert_eq!(click_rate(1_i64, 4_i64).unwrap(), "25.0% CTR");
        assert_eq!(click_rate(3_i64, 0_i64).unwrap(), "no CTR");
    }
}
