use std::env;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, DiagramConfig};

pub const CONFIG_ENV: &str = "SVCGRAPH_CONFIG";
pub const ZOOM_ENV: &str = "SVCGRAPH_ZOOM";

pub fn resolve_config_path(
    start: impl AsRef<Path>,
    config_path: Option<PathBuf>,
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = config_path {
        return require_file(path).map(Some);
    }

    if let Ok(path) = env::var(CONFIG_ENV) {
        return require_file(PathBuf::from(path)).map(Some);
    }

    Ok(find_config_from(start.as_ref()))
}

pub fn load_diagram_config(
    start: impl AsRef<Path>,
    config_path: Option<PathBuf>,
) -> Result<DiagramConfig, ConfigError> {
    let mut config = match resolve_config_path(start, config_path)? {
        Some(path) => load_config_file(&path)?,
        None => DiagramConfig::default(),
    };
    apply_env_overrides(&mut config)?;
    if config.zoom.min > config.zoom.max {
        return Err(ConfigError::InvalidZoom {
            min: config.zoom.min,
            max: config.zoom.max,
        });
    }
    Ok(config)
}

pub fn load_config_file(path: &Path) -> Result<DiagramConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env_overrides(config: &mut DiagramConfig) -> Result<(), ConfigError> {
    if let Ok(value) = env::var(ZOOM_ENV) {
        config.zoom.default = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv {
                name: ZOOM_ENV,
                value: value.clone(),
            })?;
    }
    Ok(())
}

fn require_file(path: PathBuf) -> Result<PathBuf, ConfigError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ConfigError::ConfigNotFound(path))
    }
}

fn find_config_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|ancestor| ancestor.join(".svcgraph").join("config.toml"))
        .find(|candidate| candidate.is_file())
}
