use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{f64_or_string, int_or_string, text_or_number};

/// Snapshot of a dealer as served by the dealer cloud function. Never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Dealer {
    #[serde(deserialize_with = "int_or_string")]
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub short_name: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub st: String, // two-letter state code
    #[serde(deserialize_with = "text_or_number")]
    pub zip: String,
    #[serde(default, deserialize_with = "f64_or_string")]
    pub lat: f64,
    #[serde(default, deserialize_with = "f64_or_string")]
    pub long: f64,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub doc_rev: Option<String>,
}

impl Dealer {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Dealer::deserialize(value)
    }
}

impl std::fmt::Display for Dealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_name)
    }
}
