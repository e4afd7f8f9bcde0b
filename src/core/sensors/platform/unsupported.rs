// src/core/sensors/platform/unsupported.rs

use super::{
    ConfigStore, DeviceChannel, DeviceOpener, ManagementProvider, ManagementSession, StoreKey,
};
use crate::core::sensors::error::SensorError;

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemManagement;

impl ManagementProvider for SystemManagement {
    fn connect(&self, _namespace: &str) -> Result<Box<dyn ManagementSession>, SensorError> {
        Err(SensorError::Unsupported)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRegistry;

impl ConfigStore for SystemRegistry {
    fn open(&self, _path: &str) -> Result<Box<dyn StoreKey>, SensorError> {
        Err(SensorError::Unsupported)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDevices;

impl DeviceOpener for SystemDevices {
    fn open(&self, _path: &str) -> Result<Box<dyn DeviceChannel>, SensorError> {
        Err(SensorError::Unsupported)
    }
}
