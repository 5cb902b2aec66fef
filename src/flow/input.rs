//! Interpretation of caller replies: yes/no, dates of birth and insurance
//! ids.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::InputParseError;
use crate::spellback::{contains_spoken_digits, normalize_spoken_digits};

/// Words that turn a read-back reply into a rejection.
const NEGATIVE_WORDS: &[&str] = &[
    "no", "nope", "nah", "incorrect", "wrong", "not", "isn't", "n",
];

/// Words that accept the read-back when they open the reply.
const AFFIRMATIVE_WORDS: &[&str] = &["yes", "yeah", "yep", "yup", "correct", "right", "sure"];

/// Pleasantries built from negative words that do not reject anything.
const BENIGN_PHRASES: &[&[&str]] = &[
    &["no", "problem"],
    &["not", "a", "problem"],
    &["no", "worries"],
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y", "%B %d %Y", "%d %B %Y",
];

const MIN_INSURANCE_ID_LEN: usize = 2;
const MAX_INSURANCE_ID_LEN: usize = 30;

static ORDINAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").unwrap());

/// Whether a reply to "is that correct?" accepts the read-back.
///
/// A reply opening with an affirmative word accepts. Otherwise any
/// negative word rejects, ignoring pleasantries such as "no problem";
/// everything else accepts.
pub fn parse_confirmation(reply: &str) -> bool {
    let lowered = reply.to_lowercase();
    let words: Vec<&str> = lowered
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .filter(|w| !w.is_empty())
        .collect();

    if words.first().is_some_and(|w| AFFIRMATIVE_WORDS.contains(w)) {
        return true;
    }

    let mut i = 0;
    while i < words.len() {
        if let Some(phrase) = BENIGN_PHRASES.iter().find(|p| words[i..].starts_with(p)) {
            i += phrase.len();
            continue;
        }
        if NEGATIVE_WORDS.contains(&words[i]) {
            return false;
        }
        i += 1;
    }
    true
}

/// A parsed date of birth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateOfBirth {
    pub date: NaiveDate,
    /// `YYYYMMDD`.
    pub normalized: String,
}

/// Parse a spoken or typed date of birth.
///
/// Dates before 1900 or after `today` are rejected.
pub fn parse_date_of_birth(raw: &str, today: NaiveDate) -> Result<DateOfBirth, InputParseError> {
    let unrecognized = || InputParseError::UnrecognizedDate {
        input: raw.to_string(),
    };

    let cleaned = ORDINAL_SUFFIX.replace_all(raw.trim(), "$1").replace(',', " ");
    let cleaned = cleaned
        .split_whitespace()
        .filter(|w| !matches!(w.to_lowercase().as_str(), "of" | "the"))
        .collect::<Vec<_>>()
        .join(" ");

    let date = if cleaned.len() == 8 && cleaned.chars().all(|c| c.is_ascii_digit()) {
        compact_date(&cleaned)
    } else {
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
    }
    .ok_or_else(unrecognized)?;

    if date.year() < 1900 || date > today {
        return Err(InputParseError::DateOutOfRange {
            date: date.to_string(),
        });
    }

    Ok(DateOfBirth {
        date,
        normalized: date.format("%Y%m%d").to_string(),
    })
}

/// `YYYYMMDD`.
fn compact_date(digits: &str) -> Option<NaiveDate> {
    let year = digits.get(0..4)?.parse().ok()?;
    let month = digits.get(4..6)?.parse().ok()?;
    let day = digits.get(6..8)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Canonical insurance id for a heard reply.
///
/// Spoken number words are collapsed to digits first; whitespace, `-` and
/// `.` are dropped and the result is uppercased. The id must then be 2–30
/// ASCII letters or digits.
pub fn canonical_insurance_id(raw: &str) -> Result<String, InputParseError> {
    let heard = if contains_spoken_digits(raw) {
        normalize_spoken_digits(raw)
    } else {
        raw.to_string()
    };

    let id: String = heard
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '.')
        .collect::<String>()
        .to_uppercase();

    let invalid = |reason: &str| InputParseError::InvalidInsuranceId {
        input: raw.to_string(),
        reason: reason.to_string(),
    };

    if id.len() < MIN_INSURANCE_ID_LEN || id.len() > MAX_INSURANCE_ID_LEN {
        return Err(invalid("expected 2 to 30 characters"));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid("only letters and digits are allowed"));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn confirmation_yes_and_no() {
        assert!(parse_confirmation("yes"));
        assert!(parse_confirmation("Yes, that's right."));
        assert!(parse_confirmation("correct"));
        assert!(!parse_confirmation("no"));
        assert!(!parse_confirmation("No."));
        assert!(!parse_confirmation("that's not right"));
        assert!(!parse_confirmation("Nope"));
        assert!(!parse_confirmation("it isn't"));
    }

    #[test]
    fn confirmation_pleasantries_are_not_rejections() {
        assert!(parse_confirmation("yes, no problem"));
        assert!(parse_confirmation("not a problem, that's right"));
        assert!(parse_confirmation("No worries, that's it"));
        assert!(parse_confirmation("Correct, not a typo"));
        assert!(!parse_confirmation("no problem, but that's wrong"));
        assert!(!parse_confirmation("no, yes"));
    }

    #[test]
    fn confirmation_ignores_embedded_no() {
        // "know" and "november" contain "no" but are not rejections.
        assert!(parse_confirmation("I know, yes"));
        assert!(parse_confirmation("november is fine"));
    }

    #[test]
    fn dob_numeric_forms() {
        for raw in ["19900105", "1990-01-05", "01/05/1990", "1/5/1990", "01-05-1990"] {
            let dob = parse_date_of_birth(raw, today()).unwrap();
            assert_eq!(dob.normalized, "19900105", "input {raw:?}");
        }
    }

    #[test]
    fn dob_spoken_forms() {
        for raw in [
            "January 5 1990",
            "january 5th, 1990",
            "Jan 5, 1990",
            "5 January 1990",
            "the 5th of January 1990",
        ] {
            let dob = parse_date_of_birth(raw, today()).unwrap();
            assert_eq!(dob.normalized, "19900105", "input {raw:?}");
        }
    }

    #[test]
    fn dob_unparseable() {
        assert!(matches!(
            parse_date_of_birth("sometime in spring", today()),
            Err(InputParseError::UnrecognizedDate { .. })
        ));
        assert!(parse_date_of_birth("19901345", today()).is_err());
        assert!(parse_date_of_birth("", today()).is_err());
    }

    #[test]
    fn dob_out_of_range() {
        assert!(matches!(
            parse_date_of_birth("2030-01-01", today()),
            Err(InputParseError::DateOutOfRange { .. })
        ));
        assert!(matches!(
            parse_date_of_birth("1850-01-01", today()),
            Err(InputParseError::DateOutOfRange { .. })
        ));
    }

    #[test]
    fn insurance_id_spoken_digits() {
        assert_eq!(
            canonical_insurance_id("W one two three four").unwrap(),
            "W1234"
        );
    }

    #[test]
    fn insurance_id_strips_separators() {
        assert_eq!(canonical_insurance_id("abc-123 45.6").unwrap(), "ABC123456");
    }

    #[test]
    fn insurance_id_rejects_bad_input() {
        assert!(canonical_insurance_id("").is_err());
        assert!(canonical_insurance_id("A").is_err());
        assert!(canonical_insurance_id("AB#12").is_err());
        assert!(canonical_insurance_id(&"9".repeat(31)).is_err());
    }
}
