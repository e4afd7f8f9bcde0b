// src/core/reading.rs

use serde::Serialize;
use std::fmt;

/// How a backend identifies the zone a reading came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ZoneId {
    /// Name reported by the OS (registry subkey or WMI instance name).
    Name(String),
    /// Position in the enumeration, or the driver's zone index.
    Index(u32),
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneId::Name(name) => f.write_str(name),
            ZoneId::Index(idx) => write!(f, "{idx}"),
        }
    }
}

impl From<&str> for ZoneId {
    fn from(name: &str) -> Self {
        ZoneId::Name(name.to_owned())
    }
}

impl From<u32> for ZoneId {
    fn from(idx: u32) -> Self {
        ZoneId::Index(idx)
    }
}

/// One temperature sample, already normalised to Celsius.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThermalReading {
    pub zone: ZoneId,
    pub celsius: f64,
}

impl ThermalReading {
    pub fn new(zone: impl Into<ZoneId>, celsius: f64) -> Self {
        Self {
            zone: zone.into(),
            celsius,
        }
    }
}

impl fmt::Display for ThermalReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Zone {}: {:.2} °C", self.zone, self.celsius)
    }
}
