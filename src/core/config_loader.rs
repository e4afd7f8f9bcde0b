// src/core/config_loader.rs

use directories::BaseDirs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "acpitemp-rs";

/// Where configuration may live. Neither file has to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    /// `default.toml` shipped beside the binary
    pub system: PathBuf,
    /// Per-user override, replaces the shipped file entirely
    pub user: PathBuf,
}

pub fn config_paths() -> ConfigPaths {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    ConfigPaths {
        system: system_default(&exe_dir),
        user: BaseDirs::new()
            .map(|d| user_config(d.config_dir()))
            .unwrap_or_else(|| PathBuf::from("config").join("config.toml")),
    }
}

// Falls back to the checkout's config/default.toml when running from cargo
fn system_default(exe_dir: &Path) -> PathBuf {
    let beside_exe = exe_dir.join("default.toml");
    if beside_exe.exists() {
        return beside_exe;
    }
    let in_tree = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("config")
        .join("default.toml");
    if in_tree.exists() { in_tree } else { beside_exe }
}

// %APPDATA%\acpitemp-rs\config.toml on Windows
fn user_config(config_dir: &Path) -> PathBuf {
    config_dir.join(APP_DIR).join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn prefers_file_beside_binary() {
        let td = TempDir::new().unwrap();
        std::fs::write(td.path().join("default.toml"), "").unwrap();
        assert_eq!(system_default(td.path()), td.path().join("default.toml"));
    }

    #[test]
    fn falls_back_to_source_tree() {
        let td = TempDir::new().unwrap();
        let expected = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("config")
            .join("default.toml");
        assert_eq!(system_default(td.path()), expected);
    }

    #[test]
    fn user_config_is_namespaced() {
        assert_eq!(
            user_config(Path::new("cfg")),
            Path::new("cfg").join("acpitemp-rs").join("config.toml")
        );
    }
}
