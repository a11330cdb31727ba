use std::f64::consts::PI;

use serde::Serialize;

use crate::config::DiagramSettings;
use crate::core::node::ServiceIdentity;

pub const HEX_GAP: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn midpoint(self, other: Point) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuadCurve {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl QuadCurve {
    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        Point::new(
            u * u * self.start.x + 2.0 * u * t * self.control.x + t * t * self.end.x,
            u * u * self.start.y + 2.0 * u * t * self.control.y + t * t * self.end.y,
        )
    }

    pub fn midpoint(&self) -> Point {
        self.point_at(0.5)
    }

    pub fn svg_path(&self) -> String {
        format!(
            "M{},{} Q{},{} {},{}",
            fmt_coord(self.start.x),
            fmt_coord(self.start.y),
            fmt_coord(self.control.x),
            fmt_coord(self.control.y),
            fmt_coord(self.end.x),
            fmt_coord(self.end.y)
        )
    }
}

pub fn fmt_coord(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

pub fn hexagon_points(center: Point, size: f64) -> Vec<Point> {
    (0..6)
        .map(|i| {
            let angle = PI / 3.0 * i as f64 - PI / 6.0;
            Point::new(center.x + size * angle.cos(), center.y + size * angle.sin())
        })
        .collect()
}

pub fn name_width(identity: &ServiceIdentity) -> f64 {
    identity.as_str().chars().count() as f64 * 8.0 + 20.0
}

pub fn hex_pitch(settings: &DiagramSettings) -> f64 {
    settings.hex_size * 2.0 + HEX_GAP
}

pub fn box_width(identity: &ServiceIdentity, version_count: usize, settings: &DiagramSettings) -> f64 {
    let needed = name_width(identity) + 40.0 + version_count as f64 * hex_pitch(settings);
    settings.min_box_width.max(needed)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxGeometry {
    pub center: Point,
    pub rect: Rect,
    pub name_anchor: Point,
    hex_start_x: f64,
    hex_pitch: f64,
}

impl BoxGeometry {
    pub fn new(
        identity: &ServiceIdentity,
        center: Point,
        version_count: usize,
        settings: &DiagramSettings,
    ) -> Self {
        let width = box_width(identity, version_count, settings);
        let left = center.x - width / 2.0;
        Self {
            center,
            rect: Rect {
                x: left,
                y: center.y - settings.box_height / 2.0,
                width,
                height: settings.box_height,
            },
            name_anchor: Point::new(left + 10.0, center.y + 5.0),
            hex_start_x: left + name_width(identity) + 32.0,
            hex_pitch: hex_pitch(settings),
        }
    }

    pub fn version_center(&self, slot: usize) -> Point {
        Point::new(self.hex_start_x + slot as f64 * self.hex_pitch, self.center.y)
    }
}

pub fn connection_curve(
    source_center: Point,
    target_center: Point,
    hex_size: f64,
    curve_depth: f64,
    control_offset: Option<(f64, f64)>,
) -> QuadCurve {
    let start = source_center.offset(0.0, hex_size);
    let end = target_center.offset(0.0, -hex_size);
    let mid = start.midpoint(end);
    let control = match control_offset {
        Some((dx, dy)) => mid.offset(dx, dy),
        None => mid.offset(0.0, curve_depth),
    };
    QuadCurve {
        start,
        control,
        end,
    }
}
