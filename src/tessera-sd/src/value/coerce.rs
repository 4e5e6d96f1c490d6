//! Total conversions from every kind of [`Value`] into every scalar view.
//!
//! None of these fail. Where no sensible conversion exists, the zero
//! value of the target is returned.

use base64::{prelude::BASE64_STANDARD, Engine};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use tessera_types::Uuid;

use super::{epoch, Date, Uri, Value};

impl Value {
    /// Reads the value as a boolean.
    ///
    /// Numbers are true when non-zero (NaN is false), strings when
    /// non-empty and containers when they hold at least one element.
    pub fn as_boolean(&self) -> bool {
        match self {
            Self::Boolean(v) => *v,
            Self::Integer(v) => *v != 0,
            Self::Real(v) => !v.is_nan() && *v != 0.0,
            Self::String(v) => !v.is_empty(),
            Self::Map(v) => !v.is_empty(),
            Self::Array(v) => !v.is_empty(),
            _ => false,
        }
    }

    /// Reads the value as an integer.
    ///
    /// Reals truncate toward zero and saturate at the bounds of `i32`.
    /// Strings are parsed as reals first; unparsable text reads as 0.
    pub fn as_integer(&self) -> i32 {
        match self {
            Self::Boolean(v) => i32::from(*v),
            Self::Integer(v) => *v,
            Self::Real(v) => real_to_integer(*v),
            Self::String(v) => parse_real(v).map_or(0, real_to_integer),
            _ => 0,
        }
    }

    /// Reads the value as a real.
    pub fn as_real(&self) -> f64 {
        match self {
            Self::Boolean(v) => f64::from(u8::from(*v)),
            Self::Integer(v) => f64::from(*v),
            Self::Real(v) => *v,
            Self::String(v) => parse_real(v).unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Reads the value as text.
    ///
    /// Booleans read as `"1"` or `"0"` and binary data as base64.
    /// Containers produce a diagnostic dump that is not meant to be
    /// parsed back.
    pub fn as_string(&self) -> String {
        match self {
            Self::Unknown => String::new(),
            Self::Boolean(v) => (if *v { "1" } else { "0" }).to_owned(),
            Self::Integer(v) => v.to_string(),
            Self::Real(v) => format_real(*v),
            Self::String(v) => v.clone(),
            Self::Uuid(v) => v.to_string(),
            Self::Date(v) => format_date(v),
            Self::Uri(v) => v.as_str().to_owned(),
            Self::Binary(v) => BASE64_STANDARD.encode(v),
            Self::Map(v) => v.to_string(),
            Self::Array(v) => v.to_string(),
        }
    }

    /// Reads the value as a UUID, falling back to [`Uuid::ZERO`].
    pub fn as_uuid(&self) -> Uuid {
        match self {
            Self::Uuid(v) => *v,
            Self::String(v) => Uuid::parse(v).unwrap_or(Uuid::ZERO),
            _ => Uuid::ZERO,
        }
    }

    /// Reads the value as a date, falling back to the Unix epoch.
    pub fn as_date(&self) -> Date {
        match self {
            Self::Date(v) => *v,
            Self::String(v) => parse_date(v).unwrap_or_else(epoch),
            _ => epoch(),
        }
    }

    /// Reads the value as a URI, falling back to the empty reference.
    pub fn as_uri(&self) -> Uri {
        match self {
            Self::Uri(v) => v.clone(),
            Self::String(v) => Uri::parse(v),
            _ => Uri::default(),
        }
    }

    /// Reads the value as raw bytes.
    ///
    /// Only binary values have a byte view; everything else is empty.
    pub fn as_binary(&self) -> Vec<u8> {
        match self {
            Self::Binary(v) => v.clone(),
            _ => Vec::new(),
        }
    }
}

fn real_to_integer(v: f64) -> i32 {
    if v.is_nan() {
        0
    } else {
        // `as` truncates toward zero and saturates.
        v as i32
    }
}

/// Formats a real so that parsing the text gives back the same value.
pub(crate) fn format_real(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_owned()
    } else if v.is_infinite() {
        (if v > 0.0 { "Infinity" } else { "-Infinity" }).to_owned()
    } else {
        v.to_string()
    }
}

/// Parses a real, accepting surrounding whitespace.
pub(crate) fn parse_real(text: &str) -> Option<f64> {
    text.trim().parse().ok()
}

/// Formats a date as RFC 3339 in UTC with as many fractional digits as
/// needed.
pub(crate) fn format_date(v: &Date) -> String {
    v.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses a date from RFC 3339 text, falling back to the common
/// `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD` spellings read as UTC.
pub(crate) fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }

    // Years outside 0..=9999 are written with a sign and more digits,
    // which RFC 3339 does not allow.
    let naive = text.strip_suffix(|c: char| c.eq_ignore_ascii_case(&'z')).unwrap_or(text);
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(date.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}
