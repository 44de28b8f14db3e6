// src/config/mod.rs
pub mod consts;
pub mod jobs;
pub mod options;
pub mod secrets;
