// src/core/sensors/wmi_backend.rs

use tracing::{debug, info};

use super::error::SensorError;
use super::platform::{FieldValue, ManagementObject, ManagementProvider, ManagementSession};
use super::sensor_backend::{BackendKind, SensorBackend};
use crate::core::config::WmiConfig;
use crate::core::convert::tenths_kelvin_to_celsius;
use crate::core::reading::{ThermalReading, ZoneId};

/// Property `MSAcpi_ThermalZoneTemperature` uses to name the zone.
const INSTANCE_NAME: &str = "InstanceName";

/// Reads `MSAcpi_ThermalZoneTemperature` objects from the `ROOT\WMI` namespace.
pub struct ManagementQueryBackend<P> {
    provider: P,
    settings: WmiConfig,
    session: Option<Box<dyn ManagementSession>>,
}

impl<P: ManagementProvider> ManagementQueryBackend<P> {
    pub fn new(provider: P, settings: WmiConfig) -> Self {
        Self {
            provider,
            settings,
            session: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Lazily decode every object the query yields. Objects whose temperature
    /// field is missing or not a 32-bit integer are skipped.
    pub fn readings(&self) -> Result<impl Iterator<Item = ThermalReading> + '_, SensorError> {
        let session = self.session.as_ref().ok_or(SensorError::NotInitialized)?;
        let stream = session.query(&self.settings.query)?;
        let field = self.settings.field.as_str();

        Ok(stream
            .enumerate()
            .filter_map(move |(position, item)| match item {
                Ok(obj) => decode(&*obj, field, position as u32),
                Err(e) => {
                    debug!(position, error = %e, "Skipping unreadable WMI object");
                    None
                }
            }))
    }
}

fn decode(obj: &dyn ManagementObject, field: &str, position: u32) -> Option<ThermalReading> {
    let raw = match obj.property(field) {
        Ok(FieldValue::I4(v)) => i64::from(v),
        Ok(FieldValue::UI4(v)) => i64::from(v),
        Ok(other) => {
            let e = SensorError::mismatch(field, other.type_name());
            debug!(position, error = %e, "Skipping WMI object");
            return None;
        }
        Err(e) => {
            debug!(position, error = %e, "Skipping WMI object");
            return None;
        }
    };

    let zone = match obj.property(INSTANCE_NAME) {
        Ok(FieldValue::Str(name)) if !name.is_empty() => ZoneId::Name(name),
        _ => ZoneId::Index(position),
    };

    Some(ThermalReading::new(zone, tenths_kelvin_to_celsius(raw)))
}

impl<P: ManagementProvider> SensorBackend for ManagementQueryBackend<P> {
    fn kind(&self) -> BackendKind {
        BackendKind::Wmi
    }

    fn initialize(&mut self) -> Result<(), SensorError> {
        // drop any previous session before opening a new one
        self.teardown();
        let session = self.provider.connect(&self.settings.namespace)?;
        info!(namespace = %self.settings.namespace, "WMI session established");
        self.session = Some(session);
        Ok(())
    }

    fn read(&mut self) -> Result<Vec<ThermalReading>, SensorError> {
        Ok(self.readings()?.collect())
    }

    fn teardown(&mut self) {
        if self.session.take().is_some() {
            debug!("WMI session released");
        }
    }
}
