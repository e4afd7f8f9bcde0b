// src/core/mod.rs

pub mod config;
pub mod config_loader;
pub mod convert;
pub mod orchestrator;
pub mod reading;
pub mod report;
pub mod sensors;
