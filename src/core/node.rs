use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceIdentity(String);

impl ServiceIdentity {
    pub fn new(app: &str, service: &str) -> Self {
        Self(format!("{app}/{service}"))
    }

    pub fn from_key(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn app(&self) -> &str {
        self.0.split_once('/').map(|(app, _)| app).unwrap_or(&self.0)
    }

    pub fn service(&self) -> &str {
        self.0.split_once('/').map(|(_, svc)| svc).unwrap_or("")
    }

    pub fn at(&self, version: &str) -> VersionedNode {
        VersionedNode(format!("{}@{}", self.0, version))
    }
}

impl fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionedNode(String);

impl VersionedNode {
    pub fn new(app: &str, service: &str, version: &str) -> Self {
        Self(format!("{app}/{service}@{version}"))
    }

    pub fn from_key(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    // The version is everything after the last '@'; service names never carry one.
    pub fn identity(&self) -> ServiceIdentity {
        match self.0.rsplit_once('@') {
            Some((identity, _)) => ServiceIdentity::from_key(identity),
            None => ServiceIdentity::from_key(self.0.clone()),
        }
    }

    pub fn version(&self) -> &str {
        self.0.rsplit_once('@').map(|(_, ver)| ver).unwrap_or("")
    }
}

impl fmt::Display for VersionedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DependencyEdge {
    pub source: VersionedNode,
    pub target: VersionedNode,
    pub app_version: u64,
}

impl DependencyEdge {
    pub fn new(source: VersionedNode, target: VersionedNode, app_version: u64) -> Self {
        Self {
            source,
            target,
            app_version,
        }
    }

    pub fn id(&self) -> EdgeId {
        EdgeId(format!(
            "{}|{}|{}",
            self.source, self.target, self.app_version
        ))
    }

    pub fn connection_key(&self) -> ConnectionKey {
        ConnectionKey(format!("{}|{}", self.source, self.target))
    }
}

/// `source|target|appVersion`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `source|target`, version-specific on both ends.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ConnectionKey(String);

impl ConnectionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
