// src/core/sensors/platform/mod.rs
//! OS seams consumed by the backends.
//!
//! Every handle type here owns its native resource and releases it on drop.
//! On Windows the `System*` types bind to WMI, the registry and
//! `DeviceIoControl`; elsewhere they report [`SensorError::Unsupported`].

use super::error::SensorError;

#[cfg(windows)]
mod win32;
#[cfg(windows)]
pub use self::win32::{SystemDevices, SystemManagement, SystemRegistry};

#[cfg(not(windows))]
mod unsupported;
#[cfg(not(windows))]
pub use self::unsupported::{SystemDevices, SystemManagement, SystemRegistry};

/// Decoded value of one property of a management object.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    I4(i32),
    UI4(u32),
    Str(String),
    Null,
    /// Anything else, carrying the variant's type name.
    Other(String),
}

impl FieldValue {
    pub fn type_name(&self) -> &str {
        match self {
            FieldValue::I4(_) => "I4",
            FieldValue::UI4(_) => "UI4",
            FieldValue::Str(_) => "String",
            FieldValue::Null => "Null",
            FieldValue::Other(name) => name,
        }
    }
}

pub trait ManagementObject {
    fn property(&self, name: &str) -> Result<FieldValue, SensorError>;
}

pub type ObjectStream<'a> =
    Box<dyn Iterator<Item = Result<Box<dyn ManagementObject + 'a>, SensorError>> + 'a>;

/// A connected management namespace.
pub trait ManagementSession {
    /// Forward-only query; objects are yielded as the caller pulls them.
    fn query<'a>(&'a self, wql: &str) -> Result<ObjectStream<'a>, SensorError>;
}

pub trait ManagementProvider {
    fn connect(&self, namespace: &str) -> Result<Box<dyn ManagementSession>, SensorError>;
}

pub type SubkeyStream<'a> = Box<dyn Iterator<Item = Result<String, SensorError>> + 'a>;

/// An open key in a hierarchical configuration store.
pub trait StoreKey {
    /// Child key names in store order. A failure partway through is yielded
    /// as the last item.
    fn subkeys(&self) -> Result<SubkeyStream<'_>, SensorError>;

    fn open_subkey(&self, path: &str) -> Result<Box<dyn StoreKey + '_>, SensorError>;

    /// `Ok(None)` when the value does not exist, `DecodeMismatch` when it is
    /// not a 32-bit unsigned value.
    fn read_u32(&self, name: &str) -> Result<Option<u32>, SensorError>;
}

pub trait ConfigStore {
    /// Open `path` read-only below the machine hive.
    fn open(&self, path: &str) -> Result<Box<dyn StoreKey>, SensorError>;
}

/// An open handle to a kernel-mode device.
pub trait DeviceChannel {
    /// Synchronous control request: one `i32` in, one `f64` out. Blocks for
    /// as long as the driver does.
    fn control(&self, code: u32, input: i32) -> Result<f64, SensorError>;

    /// Release the handle. Calling it again is a no-op.
    fn close(&mut self);
}

pub trait DeviceOpener {
    fn open(&self, path: &str) -> Result<Box<dyn DeviceChannel>, SensorError>;
}
