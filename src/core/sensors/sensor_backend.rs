// src/core/sensors/sensor_backend.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::SensorError;
use crate::core::reading::ThermalReading;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Wmi,
    Registry,
    Driver,
}

impl BackendKind {
    /// Fixed execution order used when nothing else is configured.
    pub const DEFAULT_ORDER: [BackendKind; 3] =
        [BackendKind::Wmi, BackendKind::Registry, BackendKind::Driver];

    /// Section heading used in the report
    pub fn title(self) -> &'static str {
        match self {
            BackendKind::Wmi => "WMI query",
            BackendKind::Registry => "ACPI table",
            BackendKind::Driver => "Driver interface",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Wmi => "wmi",
            BackendKind::Registry => "registry",
            BackendKind::Driver => "driver",
        };
        f.write_str(name)
    }
}

// A unified interface over every way of reading thermal zones.
//
// Lifecycle: `initialize` acquires whatever OS session the backend needs,
// `read` may only be called after it succeeded, and `teardown` releases the
// session. `teardown` must be safe to call more than once.
pub trait SensorBackend {
    fn kind(&self) -> BackendKind;

    fn initialize(&mut self) -> Result<(), SensorError>;

    fn read(&mut self) -> Result<Vec<ThermalReading>, SensorError>;

    fn teardown(&mut self);
}
