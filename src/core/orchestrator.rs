// src/core/orchestrator.rs

use tracing::{info, warn};

use super::config::Config;
use super::report::{Report, Section};
use super::sensors::platform::{SystemDevices, SystemManagement, SystemRegistry};
use super::sensors::{
    BackendKind, DriverChannelBackend, FirmwareTableBackend, ManagementQueryBackend,
    SensorBackend,
};

// Runs every backend once, in order, each independent of the others
pub struct Orchestrator {
    backends: Vec<Box<dyn SensorBackend>>,
}

impl Orchestrator {
    pub fn new(backends: Vec<Box<dyn SensorBackend>>) -> Self {
        Orchestrator { backends }
    }

    // Builds the OS-backed backends in the order the config lists them.
    pub fn from_config(config: &Config) -> Self {
        let backends = config
            .backends
            .iter()
            .map(|kind| -> Box<dyn SensorBackend> {
                match kind {
                    BackendKind::Wmi => Box::new(ManagementQueryBackend::new(
                        SystemManagement,
                        config.wmi.clone(),
                    )),
                    BackendKind::Registry => Box::new(FirmwareTableBackend::new(
                        SystemRegistry,
                        config.registry.clone(),
                    )),
                    BackendKind::Driver => Box::new(DriverChannelBackend::new(
                        SystemDevices,
                        config.driver.clone(),
                    )),
                }
            })
            .collect();
        Orchestrator::new(backends)
    }

    pub fn backends(&self) -> &[Box<dyn SensorBackend>] {
        &self.backends
    }

    pub fn run(&mut self) -> Report {
        let mut report = Report::default();
        for backend in self.backends.iter_mut() {
            report.push(run_one(backend.as_mut()));
        }
        info!(
            sections = report.sections.len(),
            readings = report.total_readings(),
            "All backends finished"
        );
        report
    }
}

fn run_one(backend: &mut dyn SensorBackend) -> Section {
    let kind = backend.kind();
    info!(backend = %kind, "Running backend");

    let outcome = backend.initialize().and_then(|()| backend.read());
    // released on every path, including a failed initialize
    backend.teardown();

    match outcome {
        Ok(readings) => {
            info!(backend = %kind, readings = readings.len(), "Backend finished");
            Section {
                backend: kind,
                readings,
                error: None,
            }
        }
        Err(e) => {
            // One backend failing shouldn't stop the others
            warn!(backend = %kind, error = %e, "Backend produced no readings");
            Section {
                backend: kind,
                readings: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_follows_configured_order() {
        let cfg = Config {
            backends: vec![BackendKind::Driver, BackendKind::Wmi],
            ..Default::default()
        };
        let orch = Orchestrator::from_config(&cfg);
        let kinds: Vec<_> = orch.backends().iter().map(|b| b.kind()).collect();
        assert_eq!(kinds, vec![BackendKind::Driver, BackendKind::Wmi]);
    }

    #[cfg(not(windows))]
    #[test]
    fn unsupported_platform_yields_empty_sections() {
        let mut orch = Orchestrator::from_config(&Config::default());
        let report = orch.run();
        assert_eq!(report.sections.len(), 3);
        assert_eq!(report.total_readings(), 0);
        // the registry walk degrades silently
        assert!(report.section(BackendKind::Registry).unwrap().error.is_none());
        assert!(report.section(BackendKind::Wmi).unwrap().error.is_some());
        assert!(report.section(BackendKind::Driver).unwrap().error.is_some());
    }
}
