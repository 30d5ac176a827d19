//! Configuration loaded from `passvault.toml`.

pub mod settings;

pub use settings::{default_data_dir, Settings};
