use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagramConfig {
    #[serde(default)]
    pub diagram: DiagramSettings,
    #[serde(default)]
    pub zoom: ZoomSettings,
    #[serde(default)]
    pub services: HashMap<String, ServicePlacement>,
    #[serde(default)]
    pub curves: Vec<CurveOverride>,
}

impl DiagramConfig {
    pub fn curve_for(&self, source: &str, target: &str) -> Option<&CurveOverride> {
        self.curves
            .iter()
            .find(|curve| curve.source == source && curve.target == target)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagramSettings {
    #[serde(default = "default_hex_size")]
    pub hex_size: f64,
    #[serde(default = "default_min_box_width")]
    pub min_box_width: f64,
    #[serde(default = "default_box_height")]
    pub box_height: f64,
    /// Vertical shift of the default curve control point; negative bends upward.
    #[serde(default = "default_curve_depth")]
    pub curve_depth: f64,
    #[serde(default = "default_origin_x")]
    pub origin_x: f64,
    #[serde(default = "default_origin_y")]
    pub origin_y: f64,
    #[serde(default = "default_column_spacing")]
    pub column_spacing: f64,
    #[serde(default = "default_row_spacing")]
    pub row_spacing: f64,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            hex_size: default_hex_size(),
            min_box_width: default_min_box_width(),
            box_height: default_box_height(),
            curve_depth: default_curve_depth(),
            origin_x: default_origin_x(),
            origin_y: default_origin_y(),
            column_spacing: default_column_spacing(),
            row_spacing: default_row_spacing(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZoomSettings {
    #[serde(default = "default_zoom")]
    pub default: u32,
    #[serde(default = "default_zoom_min")]
    pub min: u32,
    #[serde(default = "default_zoom_max")]
    pub max: u32,
    #[serde(default = "default_zoom_step")]
    pub step: u32,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            default: default_zoom(),
            min: default_zoom_min(),
            max: default_zoom_max(),
            step: default_zoom_step(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServicePlacement {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurveOverride {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub dx: f64,
    #[serde(default)]
    pub dy: f64,
}

fn default_hex_size() -> f64 {
    30.0
}

fn default_min_box_width() -> f64 {
    300.0
}

fn default_box_height() -> f64 {
    80.0
}

fn default_curve_depth() -> f64 {
    -60.0
}

fn default_origin_x() -> f64 {
    200.0
}

fn default_origin_y() -> f64 {
    120.0
}

fn default_column_spacing() -> f64 {
    450.0
}

fn default_row_spacing() -> f64 {
    140.0
}

fn default_zoom() -> u32 {
    40
}

fn default_zoom_min() -> u32 {
    20
}

fn default_zoom_max() -> u32 {
    100
}

fn default_zoom_step() -> u32 {
    10
}
