// src/core/sensors/driver_backend.rs

use tracing::{debug, info};

use super::error::SensorError;
use super::platform::{DeviceChannel, DeviceOpener};
use super::sensor_backend::{BackendKind, SensorBackend};
use crate::core::config::DriverConfig;
use crate::core::reading::ThermalReading;

/// Returned by [`DriverChannelBackend::read_zone`] when no temperature is available.
pub const UNAVAILABLE: f64 = -1.0;

const FILE_DEVICE_ACPI: u32 = 0x32;
const METHOD_BUFFERED: u32 = 0;
const FILE_READ_ACCESS: u32 = 0x1;

/// Same layout as the `CTL_CODE` macro from the Windows DDK.
pub const fn ctl_code(device_type: u32, function: u32, method: u32, access: u32) -> u32 {
    (device_type << 16) | (access << 14) | (function << 2) | method
}

pub const IOCTL_ACPI_READ_TEMPERATURE: u32 =
    ctl_code(FILE_DEVICE_ACPI, 0x800, METHOD_BUFFERED, FILE_READ_ACCESS);

/// Asks a kernel-mode ACPI driver for one zone temperature per control request.
///
/// The request is synchronous and has no timeout: a driver that never
/// completes it blocks the calling thread.
pub struct DriverChannelBackend<O> {
    opener: O,
    settings: DriverConfig,
    channel: Option<Box<dyn DeviceChannel>>,
}

impl<O: DeviceOpener> DriverChannelBackend<O> {
    pub fn new(opener: O, settings: DriverConfig) -> Self {
        Self {
            opener,
            settings,
            channel: None,
        }
    }

    /// Open the device. Returns `false` if it is absent or access is denied;
    /// every later `read_zone` then yields [`UNAVAILABLE`] without any I/O.
    pub fn open_device(&mut self) -> bool {
        self.close_device();
        match self.opener.open(&self.settings.device) {
            Ok(channel) => {
                info!(device = %self.settings.device, "Driver device opened");
                self.channel = Some(channel);
                true
            }
            Err(e) => {
                debug!(device = %self.settings.device, error = %e, "Driver device not available");
                false
            }
        }
    }

    pub fn read_zone(&self, zone: u32) -> f64 {
        let Some(channel) = self.channel.as_ref() else {
            return UNAVAILABLE;
        };
        let Ok(input) = i32::try_from(zone) else {
            return UNAVAILABLE;
        };
        match channel.control(self.settings.control_code, input) {
            Ok(celsius) => celsius,
            Err(e) => {
                debug!(zone, error = %e, "Control request failed");
                UNAVAILABLE
            }
        }
    }

    /// Release the device handle. Safe to call any number of times.
    pub fn close_device(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            channel.close();
            debug!(device = %self.settings.device, "Driver device closed");
        }
    }
}

impl<O: DeviceOpener> SensorBackend for DriverChannelBackend<O> {
    fn kind(&self) -> BackendKind {
        BackendKind::Driver
    }

    fn initialize(&mut self) -> Result<(), SensorError> {
        if self.open_device() {
            Ok(())
        } else {
            Err(SensorError::DeviceUnavailable(self.settings.device.clone()))
        }
    }

    // Probes zones 0..probe_zones and keeps positive temperatures only
    fn read(&mut self) -> Result<Vec<ThermalReading>, SensorError> {
        if self.channel.is_none() {
            return Err(SensorError::NotInitialized);
        }
        Ok((0..self.settings.probe_zones)
            .filter_map(|zone| {
                let celsius = self.read_zone(zone);
                (celsius > 0.0).then(|| ThermalReading::new(zone, celsius))
            })
            .collect())
    }

    fn teardown(&mut self) {
        self.close_device();
    }
}

impl<O> Drop for DriverChannelBackend<O> {
    fn drop(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            channel.close();
        }
    }
}
