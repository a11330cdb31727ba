use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum SvcgraphError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to parse document at {path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse document at {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unknown node {0}")]
    UnknownNode(String),
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SvcgraphError>;
