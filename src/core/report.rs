// src/core/report.rs

use serde::Serialize;
use std::fmt::Write;

use super::reading::ThermalReading;
use super::sensors::BackendKind;

pub const HEADER: &str = "=== ACPI thermal sensor reader ===";

/// Outcome of one backend's initialize/read cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub backend: BackendKind,
    pub readings: Vec<ThermalReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub sections: Vec<Section>,
}

impl Report {
    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn section(&self, kind: BackendKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.backend == kind)
    }

    pub fn total_readings(&self) -> usize {
        self.sections.iter().map(|s| s.readings.len()).sum()
    }

    /// Plain-text rendering: one heading per backend and one line per reading.
    /// Failed backends show an empty section.
    pub fn render(&self) -> String {
        let mut buf = String::with_capacity(256);
        buf.push_str(HEADER);
        buf.push('\n');
        for (i, section) in self.sections.iter().enumerate() {
            // writing into a String cannot fail
            let _ = writeln!(buf, "\nMethod {} - {}:", i + 1, section.backend.title());
            for reading in &section.readings {
                let _ = writeln!(buf, "{reading}");
            }
        }
        buf
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
