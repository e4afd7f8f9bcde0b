// src/core/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::sensors::BackendKind;

use tracing::info;

use super::config_loader::{ConfigPaths, config_paths};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WmiConfig {
    pub namespace: String,
    pub query: String,
    pub field: String,
}

impl Default for WmiConfig {
    fn default() -> Self {
        WmiConfig {
            namespace: "ROOT\\WMI".to_string(),
            query: "SELECT * FROM MSAcpi_ThermalZoneTemperature".to_string(),
            field: "CurrentTemperature".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    // Relative to HKEY_LOCAL_MACHINE
    pub root: String,
    pub zone_suffix: String,
    pub value: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            root: "HARDWARE\\ACPI\\ThermalZone".to_string(),
            zone_suffix: "Thermal".to_string(),
            value: "Temperature".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DriverConfig {
    pub device: String,
    // Zones 0..probe_zones are queried
    pub probe_zones: u32,
    pub control_code: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            device: "\\\\.\\AcpiDev".to_string(),
            probe_zones: 10,
            control_code: super::sensors::driver_backend::IOCTL_ACPI_READ_TEMPERATURE,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    // Which backends to run, in order
    pub backends: Vec<BackendKind>,

    pub wmi: WmiConfig,
    pub registry: RegistryConfig,
    pub driver: DriverConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backends: BackendKind::DEFAULT_ORDER.to_vec(),
            wmi: WmiConfig::default(),
            registry: RegistryConfig::default(),
            driver: DriverConfig::default(),
        }
    }
}

impl Config {
    // Loads the shipped default (if any) and then overrides with user config, if present.
    // With neither file present the built-in defaults are used.
    pub fn load() -> Result<Self> {
        let ConfigPaths { system, user } = config_paths();
        info!(system = ?system, user = ?user, "Loading configuration paths");

        let mut cfg = if system.exists() {
            info!(path = ?system, "Reading system default config");
            Self::load_from(&system)?
        } else {
            Config::default()
        };

        if user.exists() {
            info!(path = ?user, "Overlaying user configuration");
            // Every section defaults, so the user file replaces the whole config
            cfg = Self::load_from(&user)?;
        } else {
            info!(path = ?user, "No user config found; using defaults");
        }

        cfg.validate()?;
        info!(?cfg, "Configuration loaded succesfully");
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("Reading config at {path:?}"))?;
        let cfg = Self::from_toml_str(&raw).with_context(|| format!("Parsing config at {path:?}"))?;
        Ok(cfg)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.backends.is_empty() {
            anyhow::bail!("backends must name at least one backend");
        }
        if self.driver.probe_zones == 0 {
            anyhow::bail!("driver.probe_zones must be at least 1");
        }
        Ok(())
    }
}
