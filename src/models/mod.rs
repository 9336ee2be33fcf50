//! Records owned by the local catalog and value objects built from remote JSON.
//!
//! Remote records go through the serde derives on each type. The helpers below
//! loosen a few fields, since the remote store sends ids, zip codes and
//! coordinates either as numbers or as strings.

pub mod car;
pub mod dealer;
pub mod review;

use serde::de::{Deserializer, Error};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Loose {
    fn describe(&self) -> String {
        match self {
            Loose::Bool(b) => format!("boolean {b}"),
            Loose::Int(n) => format!("integer {n}"),
            Loose::Float(f) => format!("number {f}"),
            Loose::Text(s) => format!("string `{s}`"),
        }
    }
}

fn to_i64<E: Error>(value: Loose) -> Result<i64, E> {
    match value {
        Loose::Int(n) => Ok(n),
        Loose::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| E::custom(format!("`{s}` is not an integer"))),
        other => Err(E::custom(format!(
            "expected integer, got {}",
            other.describe()
        ))),
    }
}

pub(crate) fn int_or_string<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    to_i64(Loose::deserialize(d)?)
}

pub(crate) fn opt_int_or_string<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<i64>, D::Error> {
    Option::<Loose>::deserialize(d)?.map(to_i64).transpose()
}

// zip codes arrive both ways
pub(crate) fn text_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Loose::deserialize(d)? {
        Loose::Text(s) => Ok(s),
        Loose::Int(n) => Ok(n.to_string()),
        Loose::Float(f) => Ok(f.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string, got {}",
            other.describe()
        ))),
    }
}

/// Null reads as 0.0, like a missing coordinate.
pub(crate) fn f64_or_string<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    match Option::<Loose>::deserialize(d)? {
        None => Ok(0.0),
        Some(Loose::Int(n)) => Ok(n as f64),
        Some(Loose::Float(f)) => Ok(f),
        Some(Loose::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("`{s}` is not a number"))),
        Some(other) => Err(D::Error::custom(format!(
            "expected number, got {}",
            other.describe()
        ))),
    }
}

pub(crate) fn bool_or_string<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    match Loose::deserialize(d)? {
        Loose::Bool(b) => Ok(b),
        Loose::Text(s) if s.trim().eq_ignore_ascii_case("true") => Ok(true),
        Loose::Text(s) if s.trim().eq_ignore_ascii_case("false") => Ok(false),
        other => Err(D::Error::custom(format!(
            "expected boolean, got {}",
            other.describe()
        ))),
    }
}
