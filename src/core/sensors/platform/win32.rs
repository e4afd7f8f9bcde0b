// src/core/sensors/platform/win32.rs

use std::ffi::c_void;

use tracing::debug;
use windows::Win32::Foundation::{
    CloseHandle, ERROR_ACCESS_DENIED, ERROR_FILE_NOT_FOUND, ERROR_MORE_DATA,
    ERROR_NO_MORE_ITEMS, ERROR_SUCCESS, GENERIC_READ, GENERIC_WRITE, HANDLE, WIN32_ERROR,
};
use windows::Win32::Storage::FileSystem::{
    CreateFileW, FILE_ATTRIBUTE_NORMAL, FILE_SHARE_READ, FILE_SHARE_WRITE, OPEN_EXISTING,
};
use windows::Win32::System::IO::DeviceIoControl;
use windows::Win32::System::Registry::{
    HKEY, HKEY_LOCAL_MACHINE, KEY_READ, REG_DWORD, REG_VALUE_TYPE, RegCloseKey, RegEnumKeyExW,
    RegOpenKeyExW, RegQueryInfoKeyW, RegQueryValueExW,
};
use windows::core::{HSTRING, PWSTR};
use wmi::result_enumerator::IWbemClassWrapper;
use wmi::{COMLibrary, Variant, WMIConnection};

use super::{
    ConfigStore, DeviceChannel, DeviceOpener, FieldValue, ManagementObject, ManagementProvider,
    ManagementSession, ObjectStream, StoreKey, SubkeyStream,
};
use crate::core::sensors::error::SensorError;

// Registry key names are capped at 255 characters.
const MAX_KEY_NAME: usize = 256;

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemManagement;

impl ManagementProvider for SystemManagement {
    fn connect(&self, namespace: &str) -> Result<Box<dyn ManagementSession>, SensorError> {
        // COMLibrary sets up the apartment and the impersonation-level security blanket
        let com = COMLibrary::new().map_err(|e| SensorError::connection("COM", e))?;
        let conn = WMIConnection::with_namespace_path(namespace, com)
            .map_err(|e| SensorError::connection(namespace, e))?;
        debug!(namespace, "Connected to WMI namespace");
        Ok(Box::new(WmiSession { conn }))
    }
}

struct WmiSession {
    conn: WMIConnection,
}

impl ManagementSession for WmiSession {
    // Forward-only and return-immediately: each pull fetches one object
    fn query<'a>(&'a self, wql: &str) -> Result<ObjectStream<'a>, SensorError> {
        let objects = self
            .conn
            .exec_query_native_wrapper(wql)
            .map_err(|e| SensorError::QueryFailed(e.to_string()))?;
        Ok(Box::new(objects.map(|item| {
            item.map(|object| Box::new(WmiObject { object }) as Box<dyn ManagementObject + 'a>)
                .map_err(|e| SensorError::QueryFailed(e.to_string()))
        })))
    }
}

struct WmiObject {
    object: IWbemClassWrapper,
}

impl ManagementObject for WmiObject {
    fn property(&self, name: &str) -> Result<FieldValue, SensorError> {
        let value = self.object.get_property(name).map_err(|e| {
            debug!(property = name, error = %e, "Get failed");
            SensorError::NotFound(name.to_owned())
        })?;
        Ok(match value {
            Variant::I4(v) => FieldValue::I4(v),
            Variant::UI4(v) => FieldValue::UI4(v),
            Variant::String(s) => FieldValue::Str(s),
            Variant::Null | Variant::Empty => FieldValue::Null,
            other => FieldValue::Other(variant_name(&other).to_owned()),
        })
    }
}

fn variant_name(v: &Variant) -> &'static str {
    match v {
        Variant::I1(_) => "I1",
        Variant::I2(_) => "I2",
        Variant::I8(_) => "I8",
        Variant::UI1(_) => "UI1",
        Variant::UI2(_) => "UI2",
        Variant::UI8(_) => "UI8",
        Variant::R4(_) => "R4",
        Variant::R8(_) => "R8",
        Variant::Bool(_) => "Bool",
        Variant::Array(_) => "Array",
        _ => "Unknown",
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRegistry;

impl ConfigStore for SystemRegistry {
    fn open(&self, path: &str) -> Result<Box<dyn StoreKey>, SensorError> {
        Ok(Box::new(RegKey::open(HKEY_LOCAL_MACHINE, path)?))
    }
}

/// Owned registry key handle, closed on drop.
struct RegKey {
    hkey: HKEY,
    path: String,
}

impl RegKey {
    fn open(parent: HKEY, path: &str) -> Result<Self, SensorError> {
        let mut hkey = HKEY::default();
        let status = unsafe { RegOpenKeyExW(parent, &HSTRING::from(path), 0, KEY_READ, &mut hkey) };
        check(status, path)?;
        Ok(Self {
            hkey,
            path: path.to_owned(),
        })
    }
}

impl StoreKey for RegKey {
    fn subkeys(&self) -> Result<SubkeyStream<'_>, SensorError> {
        let mut count = 0u32;
        let status = unsafe {
            RegQueryInfoKeyW(
                self.hkey,
                PWSTR::null(),
                None,
                None,
                Some(&mut count as *mut u32),
                None,
                None,
                None,
                None,
                None,
                None,
                None,
            )
        };
        check(status, &self.path)?;
        Ok(Box::new(Subkeys {
            key: self,
            index: 0,
            count,
        }))
    }

    fn open_subkey(&self, path: &str) -> Result<Box<dyn StoreKey + '_>, SensorError> {
        let child = RegKey::open(self.hkey, path).map_err(|e| match e {
            SensorError::NotFound(_) => SensorError::NotFound(format!("{}\\{path}", self.path)),
            other => other,
        })?;
        Ok(Box::new(child))
    }

    fn read_u32(&self, name: &str) -> Result<Option<u32>, SensorError> {
        let mut kind = REG_VALUE_TYPE::default();
        let mut data = 0u32;
        let mut size = std::mem::size_of::<u32>() as u32;
        let status = unsafe {
            RegQueryValueExW(
                self.hkey,
                &HSTRING::from(name),
                None,
                Some(&mut kind as *mut REG_VALUE_TYPE),
                Some(&mut data as *mut u32 as *mut u8),
                Some(&mut size as *mut u32),
            )
        };
        if status == ERROR_FILE_NOT_FOUND {
            return Ok(None);
        }
        if status == ERROR_MORE_DATA {
            return Err(SensorError::mismatch(name, format!("{}-byte value", size)));
        }
        check(status, name)?;
        if kind != REG_DWORD || size != 4 {
            return Err(SensorError::mismatch(name, format!("type {}", kind.0)));
        }
        Ok(Some(data))
    }
}

/// Walks at most the subkey count reported when the walk started. Ends after
/// the first status that is not specific to one entry.
struct Subkeys<'a> {
    key: &'a RegKey,
    index: u32,
    count: u32,
}

impl Iterator for Subkeys<'_> {
    type Item = Result<String, SensorError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.count {
            let index = self.index;
            self.index += 1;

            let mut buf = [0u16; MAX_KEY_NAME];
            let mut len = buf.len() as u32;
            let status = unsafe {
                RegEnumKeyExW(
                    self.key.hkey,
                    index,
                    PWSTR(buf.as_mut_ptr()),
                    &mut len,
                    None,
                    PWSTR::null(),
                    None,
                    None,
                )
            };
            match status {
                ERROR_SUCCESS => return Some(Ok(String::from_utf16_lossy(&buf[..len as usize]))),
                // name longer than the buffer, only this entry is lost
                ERROR_MORE_DATA => {
                    debug!(key = %self.key.path, index, "Skipping oversized subkey name");
                }
                ERROR_NO_MORE_ITEMS => self.count = index,
                other => {
                    self.count = index;
                    return Some(Err(status_error(other, &self.key.path)));
                }
            }
        }
        None
    }
}

impl Drop for RegKey {
    fn drop(&mut self) {
        let _ = unsafe { RegCloseKey(self.hkey) };
    }
}

fn check(status: WIN32_ERROR, what: &str) -> Result<(), SensorError> {
    if status == ERROR_SUCCESS {
        Ok(())
    } else {
        Err(status_error(status, what))
    }
}

fn status_error(status: WIN32_ERROR, what: &str) -> SensorError {
    match status {
        ERROR_FILE_NOT_FOUND => SensorError::NotFound(what.to_owned()),
        ERROR_ACCESS_DENIED => SensorError::AccessDenied(what.to_owned()),
        other => SensorError::Io(std::io::Error::from_raw_os_error(other.0 as i32)),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDevices;

impl DeviceOpener for SystemDevices {
    fn open(&self, path: &str) -> Result<Box<dyn DeviceChannel>, SensorError> {
        let handle = unsafe {
            CreateFileW(
                &HSTRING::from(path),
                (GENERIC_READ | GENERIC_WRITE).0,
                FILE_SHARE_READ | FILE_SHARE_WRITE,
                None,
                OPEN_EXISTING,
                FILE_ATTRIBUTE_NORMAL,
                HANDLE::default(),
            )
        }
        .map_err(|e| {
            debug!(device = path, error = %e, "CreateFileW failed");
            SensorError::DeviceUnavailable(path.to_owned())
        })?;
        if handle.is_invalid() {
            return Err(SensorError::DeviceUnavailable(path.to_owned()));
        }
        Ok(Box::new(Win32Device {
            handle: Some(handle),
            path: path.to_owned(),
        }))
    }
}

struct Win32Device {
    handle: Option<HANDLE>,
    path: String,
}

impl DeviceChannel for Win32Device {
    fn control(&self, code: u32, input: i32) -> Result<f64, SensorError> {
        let handle = self
            .handle
            .ok_or_else(|| SensorError::DeviceUnavailable(self.path.clone()))?;
        let mut output = -1.0f64;
        let mut returned = 0u32;
        unsafe {
            DeviceIoControl(
                handle,
                code,
                Some(&input as *const i32 as *const c_void),
                std::mem::size_of::<i32>() as u32,
                Some(&mut output as *mut f64 as *mut c_void),
                std::mem::size_of::<f64>() as u32,
                Some(&mut returned as *mut u32),
                None,
            )
        }
        .map_err(|e| SensorError::Io(std::io::Error::from_raw_os_error(e.code().0 & 0xFFFF)))?;
        Ok(output)
    }

    fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = unsafe { CloseHandle(handle) } {
                debug!(device = %self.path, error = %e, "CloseHandle failed");
            }
        }
    }
}

impl Drop for Win32Device {
    fn drop(&mut self) {
        self.close();
    }
}
