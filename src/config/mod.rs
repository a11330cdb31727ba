pub mod resolve;
pub mod settings;

pub use settings::{
    CurveOverride, DiagramConfig, DiagramSettings, ServicePlacement, ZoomSettings,
};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("invalid value for {name}: '{value}'")]
    InvalidEnv { name: &'static str, value: String },
    #[error("invalid zoom bounds: min {min} must not exceed max {max}")]
    InvalidZoom { min: u32, max: u32 },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
