//! Typed access to the text fields of a multipart form.
//!
//! Multipart endpoints collect every text part into [`FormFields`] first and
//! then build their DTO from it in one step, so type errors surface as a single
//! readable validation message.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use scholaris_core::serde::parse_bool;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormError(pub String);

impl std::error::Error for FormError {}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.text(name).is_some()
    }

    /// Trimmed value of a field. Blank values count as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.0
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Raw value of a field, untrimmed and possibly empty.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn required(&self, name: &str) -> Result<String, FormError> {
        self.text(name)
            .ok_or_else(|| FormError(format!("{} is required", name)))
    }

    pub fn parse<T>(&self, name: &str) -> Result<Option<T>, FormError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.text(name)
            .map(|v| {
                v.parse::<T>()
                    .map_err(|e| FormError(format!("{}: {}", name, e)))
            })
            .transpose()
    }

    pub fn parse_required<T>(&self, name: &str) -> Result<T, FormError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.parse(name)?
            .ok_or_else(|| FormError(format!("{} is required", name)))
    }

    pub fn bool(&self, name: &str) -> Result<Option<bool>, FormError> {
        match self.raw(name) {
            Some(v) => parse_bool(v).map_err(|e| FormError(format!("{}: {}", name, e))),
            None => Ok(None),
        }
    }

    /// Accepts `YYYY-MM-DD`, or an RFC 3339 timestamp whose date part is used.
    pub fn date(&self, name: &str) -> Result<Option<NaiveDate>, FormError> {
        self.text(name)
            .map(|v| {
                parse_date(&v).ok_or_else(|| {
                    FormError(format!("{} must be a date in YYYY-MM-DD format", name))
                })
            })
            .transpose()
    }

    /// Accepts an RFC 3339 timestamp or a plain date (midnight UTC).
    pub fn datetime(&self, name: &str) -> Result<Option<DateTime<Utc>>, FormError> {
        self.text(name)
            .map(|v| {
                parse_datetime(&v).ok_or_else(|| {
                    FormError(format!("{} must be a date or an RFC 3339 timestamp", name))
                })
            })
            .transpose()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|d| d.date_naive()))
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|d| d.with_timezone(&Utc))
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|d| d.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_text_trims_and_drops_blank_values() {
        let form = fields(&[("name", "  Asha  "), ("empty", "   ")]);
        assert_eq!(form.text("name").as_deref(), Some("Asha"));
        assert_eq!(form.text("empty"), None);
        assert_eq!(form.text("missing"), None);
        assert!(form.required("empty").is_err());
    }

    #[test]
    fn test_parse_reports_field_name() {
        let form = fields(&[("experienceYears", "ten")]);
        let err = form.parse::<i32>("experienceYears").unwrap_err();
        assert!(err.0.starts_with("experienceYears:"));

        let form = fields(&[("experienceYears", "10")]);
        assert_eq!(form.parse::<i32>("experienceYears").unwrap(), Some(10));
    }

    #[test]
    fn test_bool() {
        let form = fields(&[("a", "true"), ("b", "0"), ("c", ""), ("d", "maybe")]);
        assert_eq!(form.bool("a").unwrap(), Some(true));
        assert_eq!(form.bool("b").unwrap(), Some(false));
        assert_eq!(form.bool("c").unwrap(), None);
        assert_eq!(form.bool("missing").unwrap(), None);
        assert!(form.bool("d").is_err());
    }

    #[test]
    fn test_dates() {
        let form = fields(&[
            ("dob", "2015-06-01"),
            ("ts", "2025-01-02T10:00:00Z"),
            ("bad", "01/06/2015"),
        ]);
        assert_eq!(
            form.date("dob").unwrap(),
            NaiveDate::from_ymd_opt(2015, 6, 1)
        );
        assert_eq!(
            form.date("ts").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 2)
        );
        assert!(form.date("bad").is_err());

        let midnight = form.datetime("dob").unwrap().unwrap();
        assert_eq!(midnight.to_rfc3339(), "2015-06-01T00:00:00+00:00");
    }
}
