// tests/end_to_end.rs
//
// Real backends wired to in-memory OS stand-ins.

use std::collections::HashMap;

use acpitemp_rs::core::config::{DriverConfig, RegistryConfig, WmiConfig};
use acpitemp_rs::core::orchestrator::Orchestrator;
use acpitemp_rs::core::reading::{ThermalReading, ZoneId};
use acpitemp_rs::core::sensors::platform::{
    ConfigStore, DeviceChannel, DeviceOpener, FieldValue, ManagementObject, ManagementProvider,
    ManagementSession, ObjectStream, StoreKey, SubkeyStream,
};
use acpitemp_rs::core::sensors::{
    BackendKind, DriverChannelBackend, FirmwareTableBackend, ManagementQueryBackend,
    SensorBackend, SensorError, ThermalZoneRecord,
};

// --- management query ------------------------------------------------------

struct Object(u32);

impl ManagementObject for Object {
    fn property(&self, name: &str) -> Result<FieldValue, SensorError> {
        match name {
            "CurrentTemperature" => Ok(FieldValue::I4(self.0 as i32)),
            _ => Err(SensorError::NotFound(name.into())),
        }
    }
}

struct Session(Vec<u32>);

impl ManagementSession for Session {
    fn query<'a>(&'a self, wql: &str) -> Result<ObjectStream<'a>, SensorError> {
        assert_eq!(wql, "SELECT * FROM MSAcpi_ThermalZoneTemperature");
        Ok(Box::new(
            self.0
                .iter()
                .map(|raw| Ok(Box::new(Object(*raw)) as Box<dyn ManagementObject + 'a>)),
        ))
    }
}

struct Wmi(Option<Vec<u32>>);

impl ManagementProvider for Wmi {
    fn connect(&self, namespace: &str) -> Result<Box<dyn ManagementSession>, SensorError> {
        assert_eq!(namespace, "ROOT\\WMI");
        match &self.0 {
            Some(raws) => Ok(Box::new(Session(raws.clone()))),
            None => Err(SensorError::connection(namespace, "WBEM_E_ACCESS_DENIED")),
        }
    }
}

// --- registry --------------------------------------------------------------

/// zone name -> Temperature value (None means the value is absent)
struct Registry(Vec<(&'static str, Option<u32>)>);

struct Root(Vec<(&'static str, Option<u32>)>);

struct Thermal(Option<u32>);

impl StoreKey for Root {
    fn subkeys(&self) -> Result<SubkeyStream<'_>, SensorError> {
        Ok(Box::new(self.0.iter().map(|(name, _)| Ok(name.to_string()))))
    }

    fn open_subkey(&self, path: &str) -> Result<Box<dyn StoreKey + '_>, SensorError> {
        let (zone, suffix) = path.split_once('\\').ok_or_else(|| SensorError::NotFound(path.into()))?;
        assert_eq!(suffix, "Thermal");
        self.0
            .iter()
            .find(|(name, _)| *name == zone)
            .map(|(_, raw)| Box::new(Thermal(*raw)) as Box<dyn StoreKey + '_>)
            .ok_or_else(|| SensorError::NotFound(path.into()))
    }

    fn read_u32(&self, _name: &str) -> Result<Option<u32>, SensorError> {
        Ok(None)
    }
}

impl StoreKey for Thermal {
    fn subkeys(&self) -> Result<SubkeyStream<'_>, SensorError> {
        Ok(Box::new(std::iter::empty()))
    }

    fn open_subkey(&self, path: &str) -> Result<Box<dyn StoreKey + '_>, SensorError> {
        Err(SensorError::NotFound(path.into()))
    }

    fn read_u32(&self, name: &str) -> Result<Option<u32>, SensorError> {
        assert_eq!(name, "Temperature");
        Ok(self.0)
    }
}

impl ConfigStore for Registry {
    fn open(&self, path: &str) -> Result<Box<dyn StoreKey>, SensorError> {
        assert_eq!(path, "HARDWARE\\ACPI\\ThermalZone");
        Ok(Box::new(Root(self.0.clone())))
    }
}

// --- driver ----------------------------------------------------------------

struct Device(HashMap<i32, f64>);

impl DeviceChannel for Device {
    fn control(&self, _code: u32, input: i32) -> Result<f64, SensorError> {
        Ok(self.0.get(&input).copied().unwrap_or(-1.0))
    }

    fn close(&mut self) {}
}

struct Driver(Option<HashMap<i32, f64>>);

impl DeviceOpener for Driver {
    fn open(&self, path: &str) -> Result<Box<dyn DeviceChannel>, SensorError> {
        match &self.0 {
            Some(temps) => Ok(Box::new(Device(temps.clone()))),
            None => Err(SensorError::DeviceUnavailable(path.into())),
        }
    }
}

// --- scenarios -------------------------------------------------------------

#[test]
fn wmi_stream_yields_celsius() {
    let mut backend = ManagementQueryBackend::new(Wmi(Some(vec![2982])), WmiConfig::default());
    backend.initialize().unwrap();
    let readings = backend.read().unwrap();
    assert_eq!(readings.len(), 1);
    assert!((readings[0].celsius - 25.05).abs() < 1e-9);
}

#[test]
fn registry_zone_is_reported() {
    let backend = FirmwareTableBackend::new(
        Registry(vec![("ZN1", Some(3032))]),
        RegistryConfig::default(),
    );
    assert_eq!(
        backend.enumerate_zones(),
        vec![ThermalZoneRecord {
            name: "ZN1".into(),
            temperature: 30.0
        }]
    );
}

#[test]
fn registry_zone_without_temperature_is_excluded() {
    let backend = FirmwareTableBackend::new(
        Registry(vec![("ZN0", None), ("ZN1", Some(3032))]),
        RegistryConfig::default(),
    );
    let zones = backend.enumerate_zones();
    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].name, "ZN1");
}

#[test]
fn full_run_with_wmi_down() {
    let backends: Vec<Box<dyn SensorBackend>> = vec![
        Box::new(ManagementQueryBackend::new(Wmi(None), WmiConfig::default())),
        Box::new(FirmwareTableBackend::new(
            Registry(vec![("TZ00", Some(3132)), ("TZ01", None)]),
            RegistryConfig::default(),
        )),
        Box::new(DriverChannelBackend::new(
            Driver(Some(HashMap::from([(1, 47.5), (4, -1.0)]))),
            DriverConfig::default(),
        )),
    ];
    let report = Orchestrator::new(backends).run();

    assert!(report.section(BackendKind::Wmi).unwrap().readings.is_empty());
    assert_eq!(
        report.section(BackendKind::Registry).unwrap().readings,
        vec![ThermalReading::new("TZ00", 40.0)]
    );
    let driver = &report.section(BackendKind::Driver).unwrap().readings;
    assert_eq!(driver.len(), 1);
    assert_eq!(driver[0].zone, ZoneId::Index(1));

    let text = report.render();
    assert!(text.contains("Zone TZ00: 40.00 °C"));
    assert!(text.contains("Zone 1: 47.50 °C"));
}

#[test]
fn missing_driver_reports_nothing() {
    let mut backend = DriverChannelBackend::new(Driver(None), DriverConfig::default());
    assert!(!backend.open_device());
    assert!((0..10).all(|zone| backend.read_zone(zone) < 0.0));
}
