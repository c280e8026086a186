use std::collections::{BTreeMap, HashMap};

use foundation::math::{Vec3, lat_lon_to_vec3};
use serde::{Deserialize, Serialize};

use crate::error::DataValidationError;
use crate::person::normalize_code;

/// A latitude or longitude as it appears in the reference table.
///
/// Published airport datasets mix JSON numbers and numeric strings, so both
/// are accepted and checked when the airport is actually used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    pub fn degrees(&self) -> Option<f64> {
        let v = match self {
            Coordinate::Number(v) => *v,
            Coordinate::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }

    fn raw(&self) -> String {
        match self {
            Coordinate::Number(v) => v.to_string(),
            Coordinate::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for Coordinate {
    fn from(v: f64) -> Self {
        Coordinate::Number(v)
    }
}

/// One row of the airport reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportRecord {
    #[serde(default)]
    pub iata: Option<String>,
    #[serde(default)]
    pub icao: Option<String>,
    #[serde(default)]
    pub lat: Option<Coordinate>,
    #[serde(default)]
    pub lon: Option<Coordinate>,
}

impl AirportRecord {
    pub fn new(iata: &str, icao: &str, lat: f64, lon: f64) -> Self {
        Self {
            iata: Some(iata.to_string()),
            icao: Some(icao.to_string()),
            lat: Some(lat.into()),
            lon: Some(lon.into()),
        }
    }

    /// Check the coordinates and produce an [`Airport`] known as `code`.
    pub fn validate(&self, code: &str) -> Result<Airport, DataValidationError> {
        let lat_deg = checked(code, "lat", self.lat.as_ref())?;
        let lon_deg = checked(code, "lon", self.lon.as_ref())?;
        Ok(Airport {
            code: code.to_string(),
            lat_deg,
            lon_deg,
        })
    }
}

fn checked(
    code: &str,
    field: &'static str,
    value: Option<&Coordinate>,
) -> Result<f64, DataValidationError> {
    let Some(value) = value else {
        return Err(DataValidationError::new(code, field, "null"));
    };
    value
        .degrees()
        .ok_or_else(|| DataValidationError::new(code, field, value.raw()))
}

/// A validated airport location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Airport {
    pub code: String,
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl Airport {
    pub fn position(&self, radius: f64) -> Vec3 {
        lat_lon_to_vec3(self.lat_deg, self.lon_deg, radius)
    }
}

/// Read-only airport reference table, indexed by IATA and ICAO code.
///
/// When two records claim the same code, the record with the smaller table
/// key wins, so lookups do not depend on load order.
#[derive(Debug, Clone, Default)]
pub struct AirportTable {
    records: BTreeMap<String, AirportRecord>,
    by_code: HashMap<String, String>,
}

impl AirportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object mapping record key to `{ iata, icao, lat, lon }`.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let records: BTreeMap<String, AirportRecord> = serde_json::from_str(text)?;
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: impl IntoIterator<Item = (String, AirportRecord)>) -> Self {
        let records: BTreeMap<String, AirportRecord> = records.into_iter().collect();
        let mut by_code = HashMap::new();
        for (key, record) in &records {
            for code in [record.iata.as_deref(), record.icao.as_deref()]
                .into_iter()
                .flatten()
                .filter_map(normalize_code)
            {
                by_code.entry(code).or_insert_with(|| key.clone());
            }
        }
        Self { records, by_code }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up by code; matching is exact after trimming and uppercasing.
    pub fn lookup(&self, code: &str) -> Option<&AirportRecord> {
        self.resolve(code).map(|(_, record)| record)
    }

    /// Like [`lookup`](Self::lookup), but also returns the record's table key.
    /// Two codes name the same airport iff they resolve to the same key.
    pub fn resolve(&self, code: &str) -> Option<(&str, &AirportRecord)> {
        let code = normalize_code(code)?;
        let (key, record) = self.records.get_key_value(self.by_code.get(&code)?)?;
        Some((key.as_str(), record))
    }
}
