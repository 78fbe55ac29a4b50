//! Airport code index.
//!
//! Maps 4-letter ICAO codes to the 3-letter IATA code travellers recognise,
//! plus the airport's coordinates for weather lookups. Loaded once at
//! startup from a JSON file of the form:
//!
//! ```json
//! { "KJFK": { "iata": "JFK", "lat": 40.6398, "lon": -73.7789 } }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

/// Airport index errors.
#[derive(Debug, Error)]
pub enum AirportIndexError {
    /// Failed to read the airport file
    #[error("failed to read airport file: {0}")]
    Read(#[from] std::io::Error),

    /// Airport file exists but is not valid JSON
    #[error("airport file is corrupted: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One airport entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Airport {
    /// 3-letter IATA code.
    pub iata: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

/// ICAO-keyed airport lookup table.
#[derive(Debug, Clone, Default)]
pub struct AirportIndex {
    airports: HashMap<String, Airport>,
}

impl AirportIndex {
    /// An index that knows no airports; lookups fall through to raw codes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an index from entries, normalising keys to uppercase.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Airport)>) -> Self {
        let airports = entries
            .into_iter()
            .map(|(code, airport)| (code.to_uppercase(), airport))
            .collect();
        Self { airports }
    }

    /// Load the index from a JSON file.
    ///
    /// A missing file is not fatal: code translation degrades to raw codes
    /// and weather falls back to aircraft coordinates. A corrupt file is an
    /// error.
    pub fn load(path: &Path) -> Result<Self, AirportIndexError> {
        if !path.exists() {
            warn!(
                path = %path.display(),
                "airport file not found, code translation will be limited"
            );
            return Ok(Self::empty());
        }

        let data = std::fs::read(path)?;
        let airports: HashMap<String, Airport> = serde_json::from_slice(&data)?;
        let index = Self::from_entries(airports);
        info!(path = %path.display(), airports = index.len(), "airport index loaded");
        Ok(index)
    }

    /// Look up an airport by ICAO code (case-insensitive).
    pub fn get(&self, icao: &str) -> Option<&Airport> {
        self.airports.get(&icao.to_uppercase())
    }

    /// Display code for an airport: IATA when known, the code as given
    /// otherwise.
    pub fn display_code(&self, code: &str) -> String {
        match self.get(code) {
            Some(airport) => airport.iata.clone(),
            None => code.to_string(),
        }
    }

    /// Coordinates for an airport, when known.
    pub fn coordinates(&self, icao: &str) -> Option<(f64, f64)> {
        self.get(icao).map(|a| (a.lat, a.lon))
    }

    /// Number of airports in the index.
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    /// True when the index knows no airports.
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}
