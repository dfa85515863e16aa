//! Request field validation
//!
//! Dates travel as `YYYY-MM-DD` strings and are stored that way; these helpers
//! reject anything chrono cannot parse before it reaches the database.

use chrono::NaiveDate;

use crate::{Error, Result};

/// Date format accepted for event and artist dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lowest and highest star rating a review may carry
pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Parse a `YYYY-MM-DD` date, naming the field in the error
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        Error::InvalidInput(format!("{} must be a date in YYYY-MM-DD format", field))
    })
}

/// Validate an event's date range
///
/// Both ends must parse and the end may not fall before the start. A
/// single-day event (start == end) is allowed.
pub fn validate_date_range(start: &str, end: &str) -> Result<()> {
    let start_date = parse_date("start_date", start)?;
    let end_date = parse_date("end_date", end)?;
    if end_date < start_date {
        return Err(Error::InvalidInput(
            "end_date cannot be before start_date".to_string(),
        ));
    }
    Ok(())
}

/// Validate optional artist lifespan dates
pub fn validate_lifespan(birth: Option<&str>, death: Option<&str>) -> Result<()> {
    let birth = birth
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_date("date_of_birth", s))
        .transpose()?;
    let death = death
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_date("date_of_death", s))
        .transpose()?;

    if let (Some(b), Some(d)) = (birth, death) {
        if d < b {
            return Err(Error::InvalidInput(
                "date_of_death cannot be before date_of_birth".to_string(),
            ));
        }
    }
    Ok(())
}

/// Validate a star rating
pub fn validate_rating(rating: i64) -> Result<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(Error::InvalidInput(format!(
            "rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }
    Ok(())
}

/// Require a non-blank string field
pub fn require<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::InvalidInput(format!("Missing field: {}", field))),
    }
}

/// Average of star ratings rounded to one decimal, `None` when empty
pub fn average_rating(ratings: &[i64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().sum();
    let avg = sum as f64 / ratings.len() as f64;
    Some((avg * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_iso_dates() {
        let d = parse_date("start_date", "2024-02-29").unwrap();
        assert_eq!(d.to_string(), "2024-02-29");
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert!(parse_date("start_date", "02/29/2024").is_err());
        assert!(parse_date("start_date", "2023-02-29").is_err());
        assert!(parse_date("start_date", "").is_err());
    }

    #[test]
    fn test_date_range_ordering() {
        assert!(validate_date_range("2024-01-01", "2024-01-31").is_ok());
        assert!(validate_date_range("2024-01-01", "2024-01-01").is_ok());

        let err = validate_date_range("2024-02-01", "2024-01-01").unwrap_err();
        assert!(err.to_string().contains("end_date cannot be before"));
    }

    #[test]
    fn test_lifespan_allows_missing_dates() {
        assert!(validate_lifespan(None, None).is_ok());
        assert!(validate_lifespan(Some("1853-03-30"), None).is_ok());
        assert!(validate_lifespan(Some(""), Some("")).is_ok());
        assert!(validate_lifespan(Some("1853-03-30"), Some("1890-07-29")).is_ok());
        assert!(validate_lifespan(Some("1890-07-29"), Some("1853-03-30")).is_err());
    }

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_require_trims_and_names_field() {
        assert_eq!(require("email", Some("  a@b.c ")).unwrap(), "a@b.c");
        let err = require("email", Some("   ")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Missing field: email");
        assert!(require("email", None).is_err());
    }

    #[test]
    fn test_average_rating_rounds_to_one_decimal() {
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[5]), Some(5.0));
        assert_eq!(average_rating(&[4, 5, 5]), Some(4.7));
        assert_eq!(average_rating(&[1, 2]), Some(1.5));
    }
}
