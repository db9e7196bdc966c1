use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::{parse_date, parse_leading_integer, parse_timestamp_millis, DateParseError};

/// A body field that may arrive as a JSON number or as text (form bodies only
/// ever carry text)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Empty text counts as not supplied
    pub fn is_blank(&self) -> bool {
        matches!(self, Scalar::Text(text) if text.is_empty())
    }

    pub fn to_integer(&self) -> Option<i64> {
        match self {
            Scalar::Integer(value) => Some(*value),
            Scalar::Float(value) if value.is_finite() => Some(value.trunc() as i64),
            Scalar::Float(_) => None,
            Scalar::Text(text) => parse_leading_integer(text),
        }
    }

    /// Numbers are read as milliseconds since the unix epoch
    pub fn to_date(&self) -> Result<DateTime<Utc>, DateParseError> {
        match self {
            Scalar::Integer(millis) => parse_timestamp_millis(*millis),
            Scalar::Float(millis) if millis.is_finite() => {
                parse_timestamp_millis(millis.trunc() as i64)
            },
            Scalar::Float(millis) => Err(DateParseError(millis.to_string())),
            Scalar::Text(text) => parse_date(text),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_owned())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

/// Drops blank values so `field=` in a form behaves like a missing field
pub(crate) fn present(value: Option<&Scalar>) -> Option<&Scalar> {
    value.filter(|v| !v.is_blank())
}
