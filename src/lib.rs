// src/lib.rs

pub mod core;
