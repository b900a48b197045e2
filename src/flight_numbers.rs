//! Flight number parsing.
//!
//! Users type flight numbers in many shapes: `DL296`, `dl 296`, `DL 0296`, or
//! just `296`. Everything in here is pure so the route upsert path and the
//! route lookup path normalize identically.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::routes::RouteError;

/// Airline designator followed directly by digits, e.g. `DL296` or `AAL12`
static AIRLINE_AND_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]{2,3})(\d+)$").unwrap());

/// Leading 2-3 letter airline prefix and any whitespace after it
static AIRLINE_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i)[A-Z]{2,3}\s*").unwrap());

static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// A flight number split into its airline designator and numeric suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFlightNumber {
    pub airline_code: String,
    /// Digits exactly as written, leading zeros preserved
    pub number: String,
}

/// Remove all whitespace and uppercase.
pub fn normalize_flight_number(flight_number: &str) -> String {
    flight_number
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Split a flight number into airline code and number.
///
/// Returns `None` when the normalized input is not `[A-Z]{2,3}` followed by
/// digits only. That is an expected outcome, not an error.
pub fn parse_flight_number(flight_number: &str) -> Option<ParsedFlightNumber> {
    let normalized = normalize_flight_number(flight_number);
    let captures = AIRLINE_AND_NUMBER_RE.captures(&normalized)?;

    Some(ParsedFlightNumber {
        airline_code: captures.get(1)?.as_str().to_string(),
        number: captures.get(2)?.as_str().to_string(),
    })
}

/// Extract the numeric flight number stored on a flight record.
///
/// Strips a leading airline prefix, then takes the first run of digits. The
/// run must fit in a `u32`; longer runs are rejected as invalid rather than
/// truncated.
pub fn extract_flight_number(flight_number: &str) -> Result<u32, RouteError> {
    let without_prefix = AIRLINE_PREFIX_RE.replace(flight_number.trim_start(), "");
    let cleaned = without_prefix.trim();

    let digits = DIGITS_RE
        .find(cleaned)
        .ok_or_else(|| RouteError::InvalidFlightNumber(flight_number.to_string()))?;

    digits
        .as_str()
        .parse::<u32>()
        .map_err(|_| RouteError::InvalidFlightNumber(flight_number.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_whitespace_and_uppercases() {
        assert_eq!(normalize_flight_number("dl 296"), "DL296");
        assert_eq!(normalize_flight_number("  Ua\t 12 "), "UA12");
        assert_eq!(normalize_flight_number("DL296"), "DL296");
        assert_eq!(normalize_flight_number(""), "");
    }

    #[test]
    fn test_parse_flight_number() {
        assert_eq!(
            parse_flight_number("dl 296"),
            Some(ParsedFlightNumber {
                airline_code: "DL".to_string(),
                number: "296".to_string(),
            })
        );
        assert_eq!(
            parse_flight_number("AAL0012"),
            Some(ParsedFlightNumber {
                airline_code: "AAL".to_string(),
                number: "0012".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_flight_number_rejects_other_shapes() {
        assert_eq!(parse_flight_number("296"), None);
        assert_eq!(parse_flight_number("D296"), None);
        assert_eq!(parse_flight_number("ABCD296"), None);
        assert_eq!(parse_flight_number("DL"), None);
        assert_eq!(parse_flight_number("DL296A"), None);
        // Digit-letter designators like 9W are not recognised
        assert_eq!(parse_flight_number("9W123"), None);
    }

    #[test]
    fn test_extract_flight_number() {
        assert_eq!(extract_flight_number("DL296").unwrap(), 296);
        assert_eq!(extract_flight_number("DL 296").unwrap(), 296);
        assert_eq!(extract_flight_number("296").unwrap(), 296);
        assert_eq!(extract_flight_number("dl296").unwrap(), 296);
        assert_eq!(extract_flight_number("AAL 0012").unwrap(), 12);
        assert_eq!(extract_flight_number(" UA 12 ").unwrap(), 12);
    }

    #[test]
    fn test_extract_flight_number_without_digits_fails() {
        let err = extract_flight_number("DL").unwrap_err();
        assert!(matches!(err, RouteError::InvalidFlightNumber(ref raw) if raw == "DL"));

        assert!(matches!(
            extract_flight_number(""),
            Err(RouteError::InvalidFlightNumber(_))
        ));
    }

    #[test]
    fn test_extract_flight_number_overflow_fails() {
        assert!(matches!(
            extract_flight_number("DL99999999999999"),
            Err(RouteError::InvalidFlightNumber(_))
        ));
    }
}
