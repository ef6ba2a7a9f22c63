//! Birth Date
//!
//! The upstream `birth_date` column arrives in several encodings depending
//! on which producer emitted the row: an ISO date or timestamp string, or a
//! day count since the Unix epoch as an integer or a float. The variant is
//! decoded once at the envelope boundary and normalized with [`BirthDate::to_date`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// Wire encodings of a birth date.
///
/// Variant order matters: serde tries them top to bottom, so whole numbers
/// land in `Days` before `FractionalDays`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BirthDate {
    /// Days since 1970-01-01.
    Days(i32),
    /// Days since 1970-01-01, fractional part ignored.
    FractionalDays(f64),
    /// `YYYY-MM-DD` or an RFC 3339 / naive ISO timestamp.
    Iso(String),
    /// Anything else; normalizes to no date.
    Unrecognized(serde_json::Value),
}

impl BirthDate {
    /// Normalize to a calendar date. Unparseable input yields `None`.
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Days(days) => from_epoch_days(i64::from(*days)),
            Self::FractionalDays(days) if days.is_finite() => from_epoch_days(days.floor() as i64),
            Self::FractionalDays(_) => None,
            Self::Iso(value) => parse_iso(value.trim()),
            Self::Unrecognized(_) => None,
        }
    }
}

fn from_epoch_days(days: i64) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    TimeDelta::try_days(days).and_then(|delta| epoch.checked_add_signed(delta))
}

fn parse_iso(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}
