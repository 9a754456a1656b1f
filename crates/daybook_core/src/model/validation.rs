//! Pure validation rules for event input.
//!
//! # Responsibility
//! - Check titles, client dates and notes.
//! - Convert client `DD/MM/YYYY` dates into `NaiveDate`.
//!
//! # Invariants
//! - Functions never read the wall clock; "today" is always an argument.
//! - Date format failures are reported as `InvalidDateFormat`, never as
//!   `PastDate`, even for non-existent dates such as `31/04/2025`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Minimum title length in characters, counted after trimming.
pub const MIN_TITLE_CHARS: usize = 5;
/// Maximum number of whitespace-separated words in notes.
pub const MAX_NOTES_WORDS: usize = 23;

static CLIENT_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})$").expect("valid client date regex")
});

/// Which title rule failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleRule {
    /// Fewer than `MIN_TITLE_CHARS` characters after trimming.
    TooShort,
    /// No alphabetic character at all.
    NoLetter,
}

/// Rejected client input. Each variant names the failing field and rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidTitle(TitleRule),
    /// Input is not `DD/MM/YYYY` or names no real calendar date.
    InvalidDateFormat(String),
    PastDate {
        date: NaiveDate,
        today: NaiveDate,
    },
    NotesTooLong {
        word_count: usize,
        max_words: usize,
    },
    /// Update request carries no fields.
    EmptyUpdate,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle(TitleRule::TooShort) => write!(
                f,
                "Title must be at least {MIN_TITLE_CHARS} characters long"
            ),
            Self::InvalidTitle(TitleRule::NoLetter) => {
                write!(f, "Title must contain at least one letter")
            }
            Self::InvalidDateFormat(_) => write!(f, "Date must be in DD/MM/YYYY format"),
            Self::PastDate { .. } => write!(
                f,
                "Cannot add events to past dates. Please select today or a future date."
            ),
            Self::NotesTooLong {
                word_count,
                max_words,
            } => write!(
                f,
                "Notes must be maximum {max_words} words (currently {word_count})"
            ),
            Self::EmptyUpdate => write!(f, "No fields to update"),
        }
    }
}

impl Error for ValidationError {}

impl ValidationError {
    /// Stable machine-readable code used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTitle(_) => "invalid_title",
            Self::InvalidDateFormat(_) => "invalid_date_format",
            Self::PastDate { .. } => "past_date",
            Self::NotesTooLong { .. } => "notes_too_long",
            Self::EmptyUpdate => "empty_update",
        }
    }
}

/// Validates an event title.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().chars().count() < MIN_TITLE_CHARS {
        return Err(ValidationError::InvalidTitle(TitleRule::TooShort));
    }
    if !title.chars().any(char::is_alphabetic) {
        return Err(ValidationError::InvalidTitle(TitleRule::NoLetter));
    }
    Ok(())
}

/// Parses a client `DD/MM/YYYY` date and rejects days before `today`.
pub fn validate_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let date = parse_client_date(raw)
        .ok_or_else(|| ValidationError::InvalidDateFormat(raw.to_string()))?;
    if date < today {
        return Err(ValidationError::PastDate { date, today });
    }
    Ok(date)
}

/// Validates optional notes. Blank notes count as "no notes".
pub fn validate_notes(raw: &str) -> Result<(), ValidationError> {
    let word_count = count_words(raw);
    if word_count > MAX_NOTES_WORDS {
        return Err(ValidationError::NotesTooLong {
            word_count,
            max_words: MAX_NOTES_WORDS,
        });
    }
    Ok(())
}

/// Number of non-empty tokens after splitting on runs of whitespace.
pub fn count_words(raw: &str) -> usize {
    raw.split_whitespace().count()
}

fn parse_client_date(raw: &str) -> Option<NaiveDate> {
    let caps = CLIENT_DATE_RE.captures(raw)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
