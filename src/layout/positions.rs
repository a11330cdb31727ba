use std::collections::BTreeMap;

use crate::config::DiagramConfig;
use crate::core::node::ServiceIdentity;
use crate::graph::index::VersionIndex;
use crate::layout::geometry::Point;

pub const PALETTE: [&str; 5] = ["#4299e1", "#ed8936", "#ecc94b", "#48bb78", "#805ad5"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionMap {
    positions: BTreeMap<ServiceIdentity, Point>,
    colors: BTreeMap<ServiceIdentity, String>,
}

impl PositionMap {
    pub fn initial(index: &VersionIndex, config: &DiagramConfig) -> Self {
        let settings = &config.diagram;
        let mut map = Self::default();
        let mut columns: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

        for (slot, identity) in index.services().enumerate() {
            let next_column = columns.len();
            let (column, row) = columns.entry(identity.app()).or_insert((next_column, 0));
            let auto = Point::new(
                settings.origin_x + *column as f64 * settings.column_spacing,
                settings.origin_y + *row as f64 * settings.row_spacing,
            );
            *row += 1;

            let placement = config.services.get(identity.as_str());
            let point = placement
                .map(|placed| Point::new(placed.x, placed.y))
                .unwrap_or(auto);
            let color = placement
                .and_then(|placed| placed.color.clone())
                .unwrap_or_else(|| PALETTE[slot % PALETTE.len()].to_string());

            map.positions.insert(identity.clone(), point);
            map.colors.insert(identity.clone(), color);
        }
        map
    }

    pub fn get(&self, identity: &ServiceIdentity) -> Option<Point> {
        self.positions.get(identity).copied()
    }

    pub fn color(&self, identity: &ServiceIdentity) -> &str {
        self.colors
            .get(identity)
            .map(String::as_str)
            .unwrap_or(PALETTE[0])
    }

    pub fn drag(&mut self, identity: &ServiceIdentity, dx: f64, dy: f64) -> bool {
        match self.positions.get_mut(identity) {
            Some(point) => {
                *point = point.offset(dx, dy);
                true
            }
            None => false,
        }
    }
}
