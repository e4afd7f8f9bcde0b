// tests/config.rs

use std::fs;
use std::path::Path;

use acpitemp_rs::core::config::Config;
use acpitemp_rs::core::orchestrator::Orchestrator;
use acpitemp_rs::core::sensors::{BackendKind, SensorBackend};
use tempfile::TempDir;

#[test]
fn shipped_default_matches_builtin_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("config")
        .join("default.toml");
    let cfg = Config::load_from(&path).unwrap();
    assert_eq!(cfg, Config::default());
}

#[test]
fn user_file_reorders_backends() {
    let td = TempDir::new().unwrap();
    let path = td.path().join("config.toml");
    fs::write(
        &path,
        "backends = [\"registry\", \"driver\"]\n[driver]\nprobe_zones = 3\n",
    )
    .unwrap();

    let cfg = Config::load_from(&path).unwrap();
    assert_eq!(cfg.driver.probe_zones, 3);

    let orch = Orchestrator::from_config(&cfg);
    let kinds: Vec<_> = orch.backends().iter().map(|b| b.kind()).collect();
    assert_eq!(kinds, vec![BackendKind::Registry, BackendKind::Driver]);
}

#[test]
fn unknown_backend_name_fails_to_parse() {
    let td = TempDir::new().unwrap();
    let path = td.path().join("config.toml");
    fs::write(&path, "backends = [\"wmi\", \"smbus\"]\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Parsing config"));
}
