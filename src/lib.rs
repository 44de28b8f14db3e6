// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod deliver;
pub mod render;
pub mod series;
pub mod sources;

pub mod file;
pub mod log;
pub mod progress;
pub mod runner;
