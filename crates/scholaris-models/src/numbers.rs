//! Human-facing record numbers.
//!
//! | Number             | Format                      | Example           |
//! |--------------------|-----------------------------|-------------------|
//! | Application number | `DMPS` + year + 4 digits    | `DMPS20254821`    |
//! | Admission number   | `ADM` + year + 5 digits     | `ADM202548213`    |
//! | Receipt number     | `REC` + year + 6 digits     | `REC2025482133`   |
//!
//! The random suffix is drawn uniformly, so collisions are possible. Callers
//! insert under a unique constraint and retry up to [`MAX_NUMBER_ATTEMPTS`]
//! times with a fresh number.

use chrono::{Datelike, Utc};
use rand::Rng;

pub const MAX_NUMBER_ATTEMPTS: usize = 5;

const APPLICATION_PREFIX: &str = "DMPS";
const ADMISSION_PREFIX: &str = "ADM";
const RECEIPT_PREFIX: &str = "REC";

pub fn current_year() -> i32 {
    Utc::now().year()
}

/// `"<year>-<year + 1>"`, the default academic year of new records.
pub fn academic_year_for(year: i32) -> String {
    format!("{}-{}", year, year + 1)
}

pub fn default_academic_year() -> String {
    academic_year_for(current_year())
}

pub fn application_number(year: i32) -> String {
    let suffix = rand::thread_rng().gen_range(1000..=9999);
    format!("{APPLICATION_PREFIX}{year:04}{suffix}")
}

pub fn admission_number(year: i32) -> String {
    let suffix = rand::thread_rng().gen_range(10000..=99999);
    format!("{ADMISSION_PREFIX}{year:04}{suffix}")
}

pub fn receipt_number(year: i32) -> String {
    let suffix = rand::thread_rng().gen_range(100000..=999999);
    format!("{RECEIPT_PREFIX}{year:04}{suffix}")
}

fn matches_format(value: &str, prefix: &str, digits: usize) -> bool {
    value
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.len() == 4 + digits && rest.bytes().all(|b| b.is_ascii_digit()))
}

pub fn is_application_number(value: &str) -> bool {
    matches_format(value, APPLICATION_PREFIX, 4)
}

pub fn is_admission_number(value: &str) -> bool {
    matches_format(value, ADMISSION_PREFIX, 5)
}

pub fn is_receipt_number(value: &str) -> bool {
    matches_format(value, RECEIPT_PREFIX, 6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_numbers_match_their_format() {
        for _ in 0..200 {
            let app = application_number(2025);
            assert!(is_application_number(&app), "{app}");
            assert!(app.starts_with("DMPS2025"));

            let adm = admission_number(2025);
            assert!(is_admission_number(&adm), "{adm}");
            assert!(adm.starts_with("ADM2025"));

            let rec = receipt_number(2025);
            assert!(is_receipt_number(&rec), "{rec}");
            assert!(rec.starts_with("REC2025"));
        }
    }

    #[test]
    fn test_suffix_has_no_leading_zero() {
        for _ in 0..200 {
            let app = application_number(2025);
            assert_ne!(app.as_bytes()[8], b'0');
        }
    }

    #[test]
    fn test_format_checks_reject_malformed_values() {
        assert!(is_application_number("DMPS20251234"));
        assert!(!is_application_number("DMPS2025123"));
        assert!(!is_application_number("DMPS202512345"));
        assert!(!is_application_number("ADM20251234"));
        assert!(!is_application_number("DMPS2025abcd"));

        assert!(is_admission_number("ADM202512345"));
        assert!(!is_admission_number("ADM20251234"));

        assert!(is_receipt_number("REC2025123456"));
        assert!(!is_receipt_number("REC202512345"));
    }

    #[test]
    fn test_academic_year() {
        assert_eq!(academic_year_for(2025), "2025-2026");
        assert!(default_academic_year().starts_with(&current_year().to_string()));
    }
}
