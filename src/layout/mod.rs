pub mod geometry;
pub mod positions;
pub mod zoom;

use crate::config::DiagramConfig;
use crate::core::node::{ServiceIdentity, VersionedNode};
use crate::graph::index::VersionIndex;

pub use geometry::{BoxGeometry, Point, QuadCurve, Rect};
pub use positions::PositionMap;
pub use zoom::Zoom;

/// Geometry derived from the version index and the current positions.
///
/// Nothing here is cached: every call recomputes from the position map, so a
/// drag only has to update the map.
pub struct DiagramLayout<'a> {
    pub index: &'a VersionIndex,
    pub positions: &'a PositionMap,
    pub config: &'a DiagramConfig,
}

impl<'a> DiagramLayout<'a> {
    pub fn new(index: &'a VersionIndex, positions: &'a PositionMap, config: &'a DiagramConfig) -> Self {
        Self {
            index,
            positions,
            config,
        }
    }

    pub fn service_box(&self, identity: &ServiceIdentity) -> Option<BoxGeometry> {
        let center = self.positions.get(identity)?;
        let count = self.index.versions(identity).len();
        Some(BoxGeometry::new(identity, center, count, &self.config.diagram))
    }

    pub fn version_center(&self, node: &VersionedNode) -> Option<Point> {
        let slot = self.index.position(node)?;
        let geometry = self.service_box(&node.identity())?;
        Some(geometry.version_center(slot))
    }

    /// `None` when either end is not placed or not a known version.
    pub fn connection_curve(&self, source: &VersionedNode, target: &VersionedNode) -> Option<QuadCurve> {
        let from = self.version_center(source)?;
        let to = self.version_center(target)?;
        let control_offset = self
            .config
            .curve_for(source.identity().as_str(), target.identity().as_str())
            .map(|curve| (curve.dx, curve.dy));
        Some(geometry::connection_curve(
            from,
            to,
            self.config.diagram.hex_size,
            self.config.diagram.curve_depth,
            control_offset,
        ))
    }
}
