use serde::Serialize;

use crate::config::DiagramConfig;
use crate::core::node::{ConnectionKey, ServiceIdentity, VersionedNode};
use crate::graph::aggregate::{connection_groups, MarkerLabel};
use crate::graph::index::VersionIndex;
use crate::graph::traverse::{highlight_for, Emphasis, HighlightSet};
use crate::graph::DependencyGraph;
use crate::layout::geometry::{fmt_coord, hexagon_points, Point, QuadCurve, Rect};
use crate::layout::{DiagramLayout, PositionMap, Zoom};
use crate::render::interaction::{FocusKind, InteractionState};

pub const HOVER_COLOR: &str = "#2ade4b";
pub const SELECTION_COLOR: &str = "#2adbfa";
pub const NEUTRAL_LINE: &str = "gray";
pub const MARKER_FILL: &str = "#718096";
const MARKER_RADIUS: f64 = 12.0;
const ACTIVE_MARKER_RADIUS: f64 = 16.0;
const CANVAS_MARGIN: f64 = 40.0;

#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub view_box: String,
    pub zoom_level: u32,
    pub scale: f64,
    pub focal: Option<VersionedNode>,
    pub focus: Option<FocusKind>,
    pub services: Vec<ServiceView>,
    pub connections: Vec<ConnectionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceView {
    pub identity: ServiceIdentity,
    pub color: String,
    pub rect: Rect,
    pub name_anchor: Point,
    pub versions: Vec<VersionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionView {
    pub node: VersionedNode,
    pub version: String,
    pub center: Point,
    pub points: String,
    pub emphasis: Emphasis,
    pub highlighted: bool,
    pub stroke: String,
    pub stroke_width: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionView {
    pub key: ConnectionKey,
    pub source: VersionedNode,
    pub target: VersionedNode,
    pub app_versions: Vec<u64>,
    pub curve: QuadCurve,
    pub path: String,
    pub emphasis: Emphasis,
    pub highlighted: bool,
    pub stroke: String,
    pub stroke_width: f64,
    pub opacity: f64,
    pub markers: Vec<MarkerView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerView {
    pub label: String,
    pub ellipsis: bool,
    pub center: Point,
    pub radius: f64,
    pub fill: String,
    pub opacity: f64,
    pub highlighted: bool,
}

pub struct SceneInput<'a> {
    pub graph: &'a DependencyGraph,
    pub index: &'a VersionIndex,
    pub positions: &'a PositionMap,
    pub config: &'a DiagramConfig,
    pub interaction: &'a InteractionState,
    pub zoom: &'a Zoom,
}

pub fn build_scene(input: &SceneInput<'_>) -> Scene {
    let highlight = highlight_for(input.graph, input.interaction.focal());
    let accent = match input.interaction.focus_kind() {
        Some(FocusKind::Selection) => SELECTION_COLOR,
        _ => HOVER_COLOR,
    };
    let layout = DiagramLayout::new(input.index, input.positions, input.config);

    let services: Vec<ServiceView> = input
        .index
        .services()
        .filter_map(|identity| service_view(&layout, identity, &highlight, accent))
        .collect();

    let connections: Vec<ConnectionView> = connection_groups(input.graph)
        .into_iter()
        .filter_map(|group| {
            let curve = layout.connection_curve(&group.source, &group.target)?;
            let any = group.any_highlighted(&highlight);
            let emphasis = highlight.emphasis(any);
            let midpoint = curve.midpoint();
            let markers = group
                .markers(&highlight)
                .into_iter()
                .map(|marker| {
                    let ellipsis = marker.label == MarkerLabel::Ellipsis;
                    let marker_emphasis = highlight.emphasis(marker.highlighted);
                    MarkerView {
                        label: marker.label.text(),
                        ellipsis,
                        center: midpoint.offset(marker.offset_x, marker.offset_y),
                        radius: if marker.highlighted && !ellipsis {
                            ACTIVE_MARKER_RADIUS
                        } else {
                            MARKER_RADIUS
                        },
                        fill: (if marker.highlighted { accent } else { MARKER_FILL }).to_string(),
                        opacity: line_opacity(marker_emphasis),
                        highlighted: marker.highlighted,
                    }
                })
                .collect();
            Some(ConnectionView {
                app_versions: group.edges.iter().map(|edge| edge.app_version).collect(),
                key: group.key,
                source: group.source,
                target: group.target,
                path: curve.svg_path(),
                curve,
                emphasis,
                highlighted: any,
                stroke: (if any { accent } else { NEUTRAL_LINE }).to_string(),
                stroke_width: if any { 3.0 } else { 1.0 },
                opacity: line_opacity(emphasis),
                markers,
            })
        })
        .collect();

    let (min, max) = bounds(&services);
    let view_width = max.x - min.x;
    let view_height = max.y - min.y;
    let scale = input.zoom.scale();

    Scene {
        width: view_width * scale,
        height: view_height * scale,
        view_box: format!(
            "{} {} {} {}",
            fmt_coord(min.x),
            fmt_coord(min.y),
            fmt_coord(view_width),
            fmt_coord(view_height)
        ),
        zoom_level: input.zoom.level(),
        scale,
        focal: highlight.focal.clone(),
        focus: input.interaction.focus_kind(),
        services,
        connections,
    }
}

fn service_view(
    layout: &DiagramLayout<'_>,
    identity: &ServiceIdentity,
    highlight: &HighlightSet,
    accent: &str,
) -> Option<ServiceView> {
    let geometry = layout.service_box(identity)?;
    let hex_size = layout.config.diagram.hex_size;
    let versions = layout
        .index
        .versions(identity)
        .iter()
        .enumerate()
        .map(|(slot, version)| {
            let node = identity.at(version);
            let center = geometry.version_center(slot);
            let emphasis = highlight.node_emphasis(&node);
            let highlighted = emphasis.is_highlighted();
            VersionView {
                points: hexagon_points(center, hex_size)
                    .iter()
                    .map(|p| format!("{},{}", fmt_coord(p.x), fmt_coord(p.y)))
                    .collect::<Vec<_>>()
                    .join(" "),
                node,
                version: version.clone(),
                center,
                emphasis,
                highlighted,
                stroke: (if highlighted { accent } else { "none" }).to_string(),
                stroke_width: if highlighted { 3.0 } else { 0.0 },
                opacity: if emphasis == Emphasis::Dimmed { 0.5 } else { 1.0 },
            }
        })
        .collect();

    Some(ServiceView {
        identity: identity.clone(),
        color: layout.positions.color(identity).to_string(),
        rect: geometry.rect,
        name_anchor: geometry.name_anchor,
        versions,
    })
}

fn line_opacity(emphasis: Emphasis) -> f64 {
    if emphasis == Emphasis::Dimmed {
        0.3
    } else {
        1.0
    }
}

fn bounds(services: &[ServiceView]) -> (Point, Point) {
    let mut rects = services.iter().map(|service| service.rect);
    let Some(first) = rects.next() else {
        return (Point::new(0.0, 0.0), Point::new(800.0, 1000.0));
    };
    let (min, max) = rects.fold(
        (
            Point::new(first.x, first.y),
            Point::new(first.x + first.width, first.y + first.height),
        ),
        |(min, max), rect| {
            (
                Point::new(min.x.min(rect.x), min.y.min(rect.y)),
                Point::new(
                    max.x.max(rect.x + rect.width),
                    max.y.max(rect.y + rect.height),
                ),
            )
        },
    );
    (
        min.offset(-CANVAS_MARGIN, -CANVAS_MARGIN),
        max.offset(CANVAS_MARGIN, CANVAS_MARGIN),
    )
}

#[cfg(test)]
mod tests {
    use crate::config::DiagramConfig;
    use crate::core::model::{AppVersionRecord, LinkRecord, ServiceRef, ServiceVersionRecord};
    use crate::core::node::VersionedNode;
    use crate::graph::builder::build_graph;
    use crate::graph::index::build_version_index;
    use crate::graph::traverse::Emphasis;
    use crate::layout::{PositionMap, Zoom};
    use crate::render::interaction::InteractionState;
    use crate::render::scene::{build_scene, Scene, SceneInput, HOVER_COLOR, SELECTION_COLOR};

    fn record(version: u64, svc_b: &str) -> AppVersionRecord {
        let svc = |app: &str, name: &str, ver: &str| ServiceVersionRecord {
            app: app.to_string(),
            svc: name.to_string(),
            svc_ver: ver.to_string(),
        };
        let reference = |app: &str, name: &str| ServiceRef {
            app: app.to_string(),
            svc: name.to_string(),
        };
        AppVersionRecord {
            version,
            app_name: "app1".to_string(),
            services: vec![svc("app1", "mfe-a", "1.0"), svc("app1", "service-b", svc_b)],
            dependencies: vec![svc("shared", "service-s", "0.0.4")],
            links: vec![
                LinkRecord {
                    source: reference("app1", "mfe-a"),
                    target: reference("app1", "service-b"),
                },
                LinkRecord {
                    source: reference("app1", "service-b"),
                    target: reference("shared", "service-s"),
                },
            ],
            implicit_links: Vec::new(),
        }
    }

    fn scene_with(interaction: &InteractionState) -> Scene {
        let records: Vec<_> = (1..=5).map(|v| record(v, if v < 3 { "2.0" } else { "2.1" })).collect();
        let graph = build_graph(&records);
        let index = build_version_index(&records);
        let config = DiagramConfig::default();
        let positions = PositionMap::initial(&index, &config);
        let zoom = Zoom::default();
        build_scene(&SceneInput {
            graph: &graph,
            index: &index,
            positions: &positions,
            config: &config,
            interaction,
            zoom: &zoom,
        })
    }

    #[test]
    fn baseline_scene_has_nothing_highlighted() {
        let scene = scene_with(&InteractionState::new());
        assert!(scene.focal.is_none());
        assert_eq!(scene.services.len(), 3);
        for service in &scene.services {
            for version in &service.versions {
                assert!(!version.highlighted);
                assert_eq!(version.emphasis, Emphasis::Neutral);
                assert_eq!(version.opacity, 1.0);
            }
        }
        for connection in &scene.connections {
            assert!(!connection.highlighted);
            assert_eq!(connection.opacity, 1.0);
            assert!(connection.markers.iter().all(|marker| !marker.highlighted));
        }
    }

    #[test]
    fn hover_dims_everything_outside_the_closure() {
        let mut interaction = InteractionState::new();
        interaction.hover_enter(VersionedNode::from_key("app1/service-b@2.0"));
        let scene = scene_with(&interaction);

        let svc_b = scene
            .services
            .iter()
            .find(|service| service.identity.as_str() == "app1/service-b")
            .expect("service-b box");
        assert_eq!(svc_b.versions.len(), 2);
        assert!(svc_b.versions[0].highlighted);
        assert_eq!(svc_b.versions[0].stroke, HOVER_COLOR);
        assert_eq!(svc_b.versions[1].emphasis, Emphasis::Dimmed);
        assert_eq!(svc_b.versions[1].opacity, 0.5);

        let dimmed = scene
            .connections
            .iter()
            .find(|conn| conn.target.as_str() == "app1/service-b@2.1")
            .expect("connection to 2.1");
        assert!(!dimmed.highlighted);
        assert_eq!(dimmed.opacity, 0.3);
        assert_eq!(dimmed.markers.len(), 3);
        assert_eq!(dimmed.markers[0].label, "3");
    }

    #[test]
    fn collapsed_groups_keep_ellipsis_radius() {
        let records: Vec<_> = (1..=5).map(|v| record(v, "2.0")).collect();
        let graph = build_graph(&records);
        let index = build_version_index(&records);
        let config = DiagramConfig::default();
        let positions = PositionMap::initial(&index, &config);
        let mut interaction = InteractionState::new();
        interaction.click(VersionedNode::from_key("app1/mfe-a@1.0"));
        let zoom = Zoom::default();
        let scene = build_scene(&SceneInput {
            graph: &graph,
            index: &index,
            positions: &positions,
            config: &config,
            interaction: &interaction,
            zoom: &zoom,
        });

        let group = scene
            .connections
            .iter()
            .find(|conn| conn.source.as_str() == "app1/mfe-a@1.0")
            .expect("mfe-a connection");
        assert_eq!(group.app_versions, vec![1, 2, 3, 4, 5]);
        let labels: Vec<_> = group.markers.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "\u{2026}", "5"]);
        assert_eq!(group.markers[0].radius, 16.0);
        assert_eq!(group.markers[1].radius, 12.0);
        assert_eq!(group.markers[1].fill, SELECTION_COLOR);
        assert_eq!(group.stroke, SELECTION_COLOR);
    }
}
