//! Configuration management for bindery

mod settings;

pub use settings::{CONFIG_FILE_NAME, Config};
