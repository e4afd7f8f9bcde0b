// src/core/sensors/mod.rs
//! Thermal zone backends and the OS seams they read through.

pub mod driver_backend;
pub mod error;
pub mod platform;
pub mod registry_backend;
pub mod sensor_backend;
pub mod wmi_backend;

pub use driver_backend::DriverChannelBackend;
pub use error::SensorError;
pub use registry_backend::{FirmwareTableBackend, ThermalZoneRecord};
pub use sensor_backend::{BackendKind, SensorBackend};
pub use wmi_backend::ManagementQueryBackend;
