// src/models/car.rs
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_MAKE: &str = "Unknown";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CarMake {
    pub id: i64,
    pub name: String,        // Manufacturer name, "Unknown" when not supplied
    pub description: String, // Free-text description of the make
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewCarMake {
    #[serde(default = "unknown_make")]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

fn unknown_make() -> String {
    UNKNOWN_MAKE.to_string()
}

/// Body style of a car model. The set is open: unrecognized values are kept verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum CarType {
    Sedan,
    Suv,
    Wagon,
    Coupe,
    Truck,
    Hatchback,
    Other(String),
}

impl CarType {
    pub fn as_str(&self) -> &str {
        match self {
            CarType::Sedan => "Sedan",
            CarType::Suv => "SUV",
            CarType::Wagon => "Wagon",
            CarType::Coupe => "Coupe",
            CarType::Truck => "Truck",
            CarType::Hatchback => "Hatchback",
            CarType::Other(other) => other.as_str(),
        }
    }
}

impl From<String> for CarType {
    fn from(value: String) -> Self {
        let key = value.trim().to_ascii_lowercase();
        match key.as_str() {
            "sedan" => CarType::Sedan,
            "suv" => CarType::Suv,
            "wagon" => CarType::Wagon,
            "coupe" => CarType::Coupe,
            "truck" => CarType::Truck,
            "hatchback" => CarType::Hatchback,
            _ => CarType::Other(value),
        }
    }
}

impl From<CarType> for String {
    fn from(value: CarType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for CarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A car model as stored in the catalog, always loaded together with its make.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CarModel {
    pub id: i64,
    pub make: CarMake,
    pub name: String,
    pub dealer_id: i64, // Id in the external dealer store; not checked locally
    #[serde(rename = "type")]
    pub car_type: CarType,
    pub year: NaiveDate,
}

impl CarModel {
    /// Four-digit model year taken from the stored date.
    pub fn model_year(&self) -> i32 {
        self.year.year()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewCarModel {
    pub make_id: i64,
    pub name: String,
    pub dealer_id: i64,
    #[serde(rename = "type")]
    pub car_type: CarType,
    pub year: NaiveDate,
}
