//! Lenient boolean parsing for config flags.
//!
//! Bundle records and run options historically carried flags as booleans,
//! numbers or strings (`"yes"`, `"1"`, `"True"`). [`BoolLike`] accepts all of
//! them: `true`, the number `1` and the strings `"true"`, `"yes"` and `"1"`
//! (case-insensitive) are true, everything else is false.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BoolLike(pub bool);

impl BoolLike {
    pub fn get(self) -> bool {
        self.0
    }
}

/// Interpret a string flag.
pub fn parse_bool_like(value: &str) -> bool {
    ["true", "yes", "1"]
        .iter()
        .any(|accepted| value.eq_ignore_ascii_case(accepted))
}

/// Interpret an arbitrary JSON value as a flag.
///
/// Numbers go through their string form, so only `1` is true.
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64() == Some(1.0),
        Value::String(text) => parse_bool_like(text),
        _ => false,
    }
}

impl<'de> Deserialize<'de> for BoolLike {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(BoolLike(to_bool(&value)))
    }
}

impl FromStr for BoolLike {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BoolLike(parse_bool_like(s)))
    }
}

impl From<bool> for BoolLike {
    fn from(value: bool) -> Self {
        BoolLike(value)
    }
}

impl From<BoolLike> for bool {
    fn from(value: BoolLike) -> Self {
        value.0
    }
}

impl fmt::Display for BoolLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
