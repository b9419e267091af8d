//! Transaction timestamps as they arrive from the persistence collaborator
//!
//! A stored `occurred_at` may be an epoch-seconds wrapper, a native UTC
//! datetime, or an ISO-8601 string. Records written by other clients can
//! carry anything else, so unknown shapes are kept as raw JSON instead of
//! failing the whole snapshot. `normalize_period` is the only place a period
//! key is derived from a timestamp.
//!
//! Every JSON string loads as `IsoString`, offset or not, so a record keeps
//! the period it was written with across any number of store rewrites.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::period::Period;

/// The three accepted timestamp shapes, plus a catch-all
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OccurredAt {
    /// `{ "seconds": ..., "nanoseconds": ... }`
    Epoch {
        seconds: i64,
        #[serde(default)]
        nanoseconds: u32,
    },

    /// A native UTC datetime; written as an RFC 3339 `Z` string and read
    /// back as `IsoString`
    Calendar(DateTime<Utc>),

    /// Any string; only its leading `YYYY-MM` is trusted
    IsoString(String),

    /// Unrecognized shape; never yields a period
    Unrecognized(Value),
}

impl<'de> Deserialize<'de> for OccurredAt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_value(Value::deserialize(deserializer)?))
    }
}

impl OccurredAt {
    /// Classify a raw JSON value
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) => Self::IsoString(s),
            other => {
                let epoch = other.as_object().and_then(|map| {
                    let seconds = map.get("seconds")?.as_i64()?;
                    let nanoseconds = match map.get("nanoseconds") {
                        None | Some(Value::Null) => 0,
                        Some(n) => u32::try_from(n.as_u64()?).ok()?,
                    };
                    Some(Self::Epoch {
                        seconds,
                        nanoseconds,
                    })
                });
                epoch.unwrap_or(Self::Unrecognized(other))
            }
        }
    }

    pub fn epoch(seconds: i64) -> Self {
        Self::Epoch {
            seconds,
            nanoseconds: 0,
        }
    }

    /// Midnight UTC of the given day
    pub fn from_date(date: NaiveDate) -> Self {
        Self::Calendar(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    /// Resolve to a comparable UTC datetime, if the shape allows it
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Epoch {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(*seconds, *nanoseconds),
            Self::Calendar(dt) => Some(*dt),
            Self::IsoString(s) => parse_iso_datetime(s),
            Self::Unrecognized(_) => None,
        }
    }

    /// Derive the `YYYY-MM` period key
    ///
    /// Epoch and calendar values use their UTC year-month. Strings use their
    /// first seven characters verbatim, so `"2024-03-31T23:00:00-05:00"` is
    /// keyed `2024-03` even though it is April in UTC.
    pub fn period(&self) -> Option<Period> {
        match self {
            Self::Epoch { .. } | Self::Calendar(_) => {
                self.to_datetime().map(|dt| Period::from_date(&dt))
            }
            Self::IsoString(s) => s.trim().get(..7).and_then(|key| Period::parse(key).ok()),
            Self::Unrecognized(_) => None,
        }
    }
}

/// Period key for an optional timestamp; `None` excludes the transaction
/// from every period-keyed aggregation
pub fn normalize_period(raw: Option<&OccurredAt>) -> Option<Period> {
    raw.and_then(OccurredAt::period)
}

/// Parse an ISO-8601 date or datetime string into UTC
pub fn parse_iso_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    s.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
}
