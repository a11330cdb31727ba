pub mod model;
pub mod node;
pub mod version;

pub use model::{AppVersionRecord, Document, LinkRecord, ServiceRef, ServiceVersionRecord};
pub use node::{ConnectionKey, DependencyEdge, EdgeId, ServiceIdentity, VersionedNode};
