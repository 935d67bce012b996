//! Scalar values found in run logs.
//!
//! Run configuration mixes raw strings taken from the file name with integers
//! discovered while scanning, so it is stored as a tagged [`ConfigValue`].
//! Series samples are [`Number`]s whose int/float kind is sniffed per token.

use crate::Result;
use anyhow::Context;
use serde::Serialize;
use std::fmt;

/// A value stored in a run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Int(i64),
    Text(String),
}

impl ConfigValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(v) => Some(*v),
            ConfigValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            ConfigValue::Int(_) => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Int(v) => write!(f, "{}", v),
            ConfigValue::Text(s) => f.write_str(s),
        }
    }
}

/// One sample of a numeric series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Parse a token, choosing float when it contains `.`, `e` or `E` and int otherwise.
    ///
    /// The kind is decided for this token alone; neighbouring samples of the same
    /// series may come out differently.
    pub fn parse(token: &str) -> Result<Self> {
        let token = token.trim();
        if looks_like_float(token) {
            let v: f64 = token
                .parse()
                .with_context(|| format!("invalid float value {:?}", token))?;
            Ok(Number::Float(v))
        } else {
            let v: i64 = token
                .parse()
                .with_context(|| format!("invalid integer value {:?}", token))?;
            Ok(Number::Int(v))
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{}", v),
            Number::Float(v) => write!(f, "{}", v),
        }
    }
}

fn looks_like_float(token: &str) -> bool {
    token.contains(['.', 'e', 'E'])
}
