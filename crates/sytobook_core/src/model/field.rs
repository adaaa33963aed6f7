//! Validated scalar fields for contact records.
//!
//! # Responsibility
//! - Enforce per-field format rules at construction time.
//! - Report rule violations as [`ValidationError`] with an operator-facing
//!   message.
//!
//! # Invariants
//! - A constructed field always satisfies its rule; there is no setter.
//! - `Phone` is exactly ten ASCII digits, untrimmed.
//! - `Birthday` is never later than the day it was validated against.

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input/display format for birthdays (`DD.MM.YYYY`).
pub const BIRTHDAY_FORMAT: &str = "%d.%m.%Y";

const PHONE_DIGITS: usize = 10;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("valid email regex"));

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyName,
    InvalidPhone(String),
    InvalidEmail(String),
    /// Raw input did not parse as `DD.MM.YYYY`.
    InvalidDate(String),
    FutureBirthday(NaiveDate),
    EmptyNote,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty."),
            Self::InvalidPhone(_) => write!(f, "Phone must contain exactly 10 digits."),
            Self::InvalidEmail(_) => write!(f, "Invalid e-mail format."),
            Self::InvalidDate(_) => write!(f, "Date must be DD.MM.YYYY"),
            Self::FutureBirthday(_) => write!(f, "Birthday cannot be in the future."),
            Self::EmptyNote => write!(f, "Note cannot be empty."),
        }
    }
}

impl Error for ValidationError {}

/// Contact first name, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(String);

impl Name {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Optional surname. Blank means absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Surname(String);

impl Surname {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

/// Optional postal address. Blank means absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

/// Optional e-mail. Blank is accepted and means absent; anything else must
/// look like `local@domain.tld`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && !EMAIL_RE.is_match(trimmed) {
            return Err(ValidationError::InvalidEmail(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

/// Phone number: exactly ten decimal digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Phone(String);

impl Phone {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let valid = raw.len() == PHONE_DIGITS && raw.bytes().all(|b| b.is_ascii_digit());
        if !valid {
            return Err(ValidationError::InvalidPhone(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Birth date that is not in the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Birthday(NaiveDate);

impl Birthday {
    /// Parses `DD.MM.YYYY` and checks it against the local calendar date.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        Self::parse_on(raw, Local::now().date_naive())
    }

    /// Same as [`Birthday::parse`] with an explicit "today".
    pub fn parse_on(raw: &str, today: NaiveDate) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        let date = NaiveDate::parse_from_str(trimmed, BIRTHDAY_FORMAT)
            .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))?;
        Self::from_date_on(date, today)
    }

    /// Wraps an already-parsed date, still rejecting future dates.
    pub fn from_date_on(date: NaiveDate, today: NaiveDate) -> Result<Self, ValidationError> {
        if date > today {
            return Err(ValidationError::FutureBirthday(date));
        }
        Ok(Self(date))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl Display for Birthday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(BIRTHDAY_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn name_is_trimmed_and_rejects_blank() {
        assert_eq!(Name::parse("  John ").unwrap().as_str(), "John");
        assert_eq!(Name::parse("   ").unwrap_err(), ValidationError::EmptyName);
    }

    #[test]
    fn phone_requires_exactly_ten_ascii_digits() {
        assert!(Phone::parse("0123456789").is_ok());
        for bad in ["", "123456789", "12345678901", "12345a7890", " 123456789", "١٢٣٤٥٦٧٨٩٠"] {
            assert!(Phone::parse(bad).is_err(), "`{bad}` should be rejected");
        }
    }

    #[test]
    fn email_allows_blank_and_checks_shape() {
        assert!(Email::parse("").unwrap().is_blank());
        assert_eq!(Email::parse(" a@b.io ").unwrap().as_str(), "a@b.io");
        assert!(Email::parse("no-at-sign.com").is_err());
        assert!(Email::parse("a@nodot").is_err());
        assert!(Email::parse("a@@b.com").is_err());
    }

    #[test]
    fn birthday_parses_day_month_year() {
        let today = day(2024, 6, 1);
        let bday = Birthday::parse_on("29.02.2000", today).unwrap();
        assert_eq!(bday.date(), day(2000, 2, 29));
        assert_eq!(bday.to_string(), "29.02.2000");
        assert_eq!(Birthday::parse_on("1.2.1990", today).unwrap().date(), day(1990, 2, 1));
    }

    #[test]
    fn birthday_rejects_bad_format_and_future_dates() {
        let today = day(2024, 6, 1);
        assert!(matches!(
            Birthday::parse_on("1990-02-01", today),
            Err(ValidationError::InvalidDate(_))
        ));
        assert!(matches!(
            Birthday::parse_on("31.02.1990", today),
            Err(ValidationError::InvalidDate(_))
        ));
        assert_eq!(
            Birthday::parse_on("02.06.2024", today).unwrap_err(),
            ValidationError::FutureBirthday(day(2024, 6, 2))
        );
        assert!(Birthday::parse_on("01.06.2024", today).is_ok());
    }
}
