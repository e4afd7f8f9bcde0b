// src/core/sensors/registry_backend.rs

use serde::Serialize;
use tracing::{debug, info, warn};

use super::error::SensorError;
use super::platform::{ConfigStore, StoreKey};
use super::sensor_backend::{BackendKind, SensorBackend};
use crate::core::config::RegistryConfig;
use crate::core::convert::acpi_raw_to_celsius;
use crate::core::reading::ThermalReading;

/// One zone found under `HARDWARE\ACPI\ThermalZone`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThermalZoneRecord {
    pub name: String,
    /// Celsius, `0.0` when the zone carries no temperature value.
    pub temperature: f64,
}

impl ThermalZoneRecord {
    pub fn is_valid(&self) -> bool {
        self.temperature > 0.0
    }
}

/// Walks the ACPI thermal zone keys of the registry and decodes their raw
/// fixed-point `Temperature` values.
pub struct FirmwareTableBackend<S> {
    store: S,
    settings: RegistryConfig,
    ready: bool,
}

impl<S: ConfigStore> FirmwareTableBackend<S> {
    pub fn new(store: S, settings: RegistryConfig) -> Self {
        Self {
            store,
            settings,
            ready: false,
        }
    }

    /// Valid zones in enumeration order. A missing or unreadable root yields
    /// an empty list rather than an error.
    pub fn enumerate_zones(&self) -> Vec<ThermalZoneRecord> {
        let root = match self.store.open(&self.settings.root) {
            Ok(key) => key,
            Err(e) => {
                info!(root = %self.settings.root, error = %e, "No ACPI thermal zones in registry");
                return Vec::new();
            }
        };

        let subkeys = match root.subkeys() {
            Ok(subkeys) => subkeys,
            Err(e) => {
                warn!(root = %self.settings.root, error = %e, "Enumerating thermal zones failed");
                return Vec::new();
            }
        };

        // keep whatever was listed before a failure
        let mut names = Vec::new();
        for item in subkeys {
            match item {
                Ok(name) => names.push(name),
                Err(e) => {
                    warn!(root = %self.settings.root, found = names.len(), error = %e, "Thermal zone enumeration stopped early");
                    break;
                }
            }
        }

        names
            .iter()
            .map(|name| self.read_zone(&*root, name))
            .filter(|zone| {
                if !zone.is_valid() {
                    debug!(zone = %zone.name, temperature = zone.temperature, "Dropping zone without data");
                }
                zone.is_valid()
            })
            .collect()
    }

    fn read_zone(&self, parent: &dyn StoreKey, name: &str) -> ThermalZoneRecord {
        let mut zone = ThermalZoneRecord {
            name: name.to_owned(),
            temperature: 0.0,
        };

        let path = format!("{name}\\{}", self.settings.zone_suffix);
        let key = match parent.open_subkey(&path) {
            Ok(key) => key,
            Err(e) => {
                debug!(zone = name, error = %e, "Zone has no thermal key");
                return zone;
            }
        };

        match key.read_u32(&self.settings.value) {
            Ok(Some(raw)) => zone.temperature = acpi_raw_to_celsius(raw),
            Ok(None) => debug!(zone = name, "Zone has no temperature value"),
            Err(e) => debug!(zone = name, error = %e, "Unreadable temperature value"),
        }
        zone
    }
}

impl<S: ConfigStore> SensorBackend for FirmwareTableBackend<S> {
    fn kind(&self) -> BackendKind {
        BackendKind::Registry
    }

    // The registry is opened fresh on every read
    fn initialize(&mut self) -> Result<(), SensorError> {
        self.ready = true;
        Ok(())
    }

    fn read(&mut self) -> Result<Vec<ThermalReading>, SensorError> {
        if !self.ready {
            return Err(SensorError::NotInitialized);
        }
        Ok(self
            .enumerate_zones()
            .into_iter()
            .map(|zone| ThermalReading::new(zone.name.as_str(), zone.temperature))
            .collect())
    }

    fn teardown(&mut self) {
        self.ready = false;
    }
}
