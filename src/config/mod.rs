//! Project configuration (`.macrovault.toml`).

pub mod settings;

pub use settings::Settings;
