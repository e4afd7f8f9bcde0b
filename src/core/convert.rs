// src/core/convert.rs
//! Unit normalisation for the three raw temperature encodings.
//!
//! - WMI reports `CurrentTemperature` in tenths of Kelvin.
//! - The registry thermal zones store ACPI fixed point, tenths of Kelvin with
//!   the 273.2 K zero point ACPI firmware uses.
//! - The driver already returns Celsius as an `f64`, so it needs no helper.

/// Kelvin value of 0 °C.
pub const KELVIN_OFFSET: f64 = 273.15;

/// ACPI raw value that decodes to exactly 0 °C.
pub const ACPI_ZERO_CELSIUS_RAW: i64 = 2732;

/// `celsius = raw / 10 - 273.15`
pub fn tenths_kelvin_to_celsius(raw: i64) -> f64 {
    (raw as f64 / 10.0) - KELVIN_OFFSET
}

/// Inverse of [`tenths_kelvin_to_celsius`], rounded to the nearest tenth of a Kelvin.
pub fn celsius_to_tenths_kelvin(celsius: f64) -> i64 {
    (celsius * 10.0 + KELVIN_OFFSET * 10.0).round() as i64
}

/// `celsius = (raw - 2732) / 10`, computed signed so raw values below the
/// zero point come out negative instead of wrapping.
pub fn acpi_raw_to_celsius(raw: u32) -> f64 {
    (i64::from(raw) - ACPI_ZERO_CELSIUS_RAW) as f64 / 10.0
}
