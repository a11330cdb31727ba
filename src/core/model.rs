use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::node::ServiceIdentity;
use crate::error::{Result, SvcgraphError};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceVersionRecord {
    pub app: String,
    pub svc: String,
    pub svc_ver: String,
}

impl ServiceVersionRecord {
    pub fn identity(&self) -> ServiceIdentity {
        ServiceIdentity::new(&self.app, &self.svc)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceRef {
    pub app: String,
    pub svc: String,
}

impl ServiceRef {
    pub fn identity(&self) -> ServiceIdentity {
        ServiceIdentity::new(&self.app, &self.svc)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinkRecord {
    pub source: ServiceRef,
    pub target: ServiceRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppVersionRecord {
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub services: Vec<ServiceVersionRecord>,
    #[serde(default)]
    pub dependencies: Vec<ServiceVersionRecord>,
    #[serde(default)]
    pub links: Vec<LinkRecord>,
    /// Edges the deployment needs that `links` does not encode.
    #[serde(default)]
    pub implicit_links: Vec<LinkRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyEntry {
    pub target: String,
    #[serde(rename = "appVersion", alias = "app_version")]
    pub app_version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub app_versions: Vec<AppVersionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_graph: Option<BTreeMap<String, Vec<AdjacencyEntry>>>,
}

impl Document {
    pub fn from_json_str(content: &str) -> serde_json::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(content)
    }

    pub fn from_yaml_str(content: &str) -> serde_yaml::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            Self::from_yaml_str(&content).map_err(|source| SvcgraphError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        } else {
            Self::from_json_str(&content).map_err(|source| SvcgraphError::Document {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    pub fn is_empty(&self) -> bool {
        self.app_versions.is_empty()
            && self
                .dependency_graph
                .as_ref()
                .map(|graph| graph.is_empty())
                .unwrap_or(true)
    }
}
