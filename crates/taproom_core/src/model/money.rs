//! Exact two-place money amounts.
//!
//! # Responsibility
//! - Represent catalog prices without binary floating point drift.
//! - Parse and render the `12.99` decimal text form used at the boundary.
//!
//! # Invariants
//! - Amounts are stored as integer cents.
//! - Text form always renders exactly two fractional digits.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Price of one catalog entry, in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(i64);

impl Price {
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

/// Error returned when decimal text cannot be read as a two-place amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceParseError {
    input: String,
}

impl Display for PriceParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid price `{}`; expected a decimal with at most two fraction digits",
            self.input
        )
    }
}

impl Error for PriceParseError {}

impl FromStr for Price {
    type Err = PriceParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || PriceParseError {
            input: value.to_string(),
        };

        let trimmed = value.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        // Trailing zeros past the cent are harmless (`12.990`).
        if fraction.len() > 2 && !fraction[2..].bytes().all(|b| b == b'0') {
            return Err(invalid());
        }

        let whole_cents = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<i64>()
                .ok()
                .and_then(|units| units.checked_mul(100))
                .ok_or_else(invalid)?
        };
        let fraction_cents = match fraction.as_bytes() {
            [] => 0,
            [tens] => i64::from(tens - b'0') * 10,
            [tens, ones, ..] => i64::from(tens - b'0') * 10 + i64::from(ones - b'0'),
        };

        let cents = whole_cents.checked_add(fraction_cents).ok_or_else(invalid)?;
        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }
}

struct PriceVisitor;

impl<'de> Visitor<'de> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a decimal price as string or number")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Price, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Price, E> {
        value
            .checked_mul(100)
            .map(Price)
            .ok_or_else(|| E::custom("price out of range"))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Price, E> {
        i64::try_from(value)
            .map_err(|_| E::custom("price out of range"))
            .and_then(|units| self.visit_i64(units))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Price, E> {
        // Shortest round-trip text keeps `12.99` as `12.99`.
        value.to_string().parse().map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::Price;

    #[test]
    fn parses_decimal_text() {
        assert_eq!("12.99".parse::<Price>().unwrap(), Price::from_cents(1299));
        assert_eq!("10".parse::<Price>().unwrap(), Price::from_cents(1000));
        assert_eq!("0.5".parse::<Price>().unwrap(), Price::from_cents(50));
        assert_eq!(".75".parse::<Price>().unwrap(), Price::from_cents(75));
        assert_eq!("-1.25".parse::<Price>().unwrap(), Price::from_cents(-125));
        assert_eq!("3.100".parse::<Price>().unwrap(), Price::from_cents(310));
    }

    #[test]
    fn rejects_sub_cent_precision_and_garbage() {
        assert!("1.999".parse::<Price>().is_err());
        assert!("abc".parse::<Price>().is_err());
        assert!("".parse::<Price>().is_err());
        assert!("1.2.3".parse::<Price>().is_err());
        assert!("1e3".parse::<Price>().is_err());
    }

    #[test]
    fn renders_two_fraction_digits() {
        assert_eq!(Price::from_cents(1299).to_string(), "12.99");
        assert_eq!(Price::from_cents(1000).to_string(), "10.00");
        assert_eq!(Price::from_cents(5).to_string(), "0.05");
        assert_eq!(Price::from_cents(-125).to_string(), "-1.25");
    }

    #[test]
    fn serde_accepts_numbers_and_strings() {
        let from_number: Price = serde_json::from_str("11.99").unwrap();
        let from_string: Price = serde_json::from_str("\"11.99\"").unwrap();
        let from_int: Price = serde_json::from_str("10").unwrap();
        assert_eq!(from_number, Price::from_cents(1199));
        assert_eq!(from_string, Price::from_cents(1199));
        assert_eq!(from_int, Price::from_cents(1000));
        assert_eq!(serde_json::to_string(&from_number).unwrap(), "\"11.99\"");
    }
}
