use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const DOCUMENT: &str = r#"{
  "app_versions": [
    {
      "version": 7,
      "app_name": "app1",
      "services": [
        {"app": "app1", "svc": "mfe-a", "svc_ver": "1.0"},
        {"app": "app1", "svc": "service-b", "svc_ver": "0.0.7"}
      ],
      "links": [{"source": {"app": "app1", "svc": "mfe-a"}, "target": {"app": "app1", "svc": "service-b"}}]
    },
    {
      "version": 8,
      "app_name": "app1",
      "services": [{"app": "app1", "svc": "mfe-a", "svc_ver": "1.1"}],
      "dependencies": [{"app": "app1", "svc": "service-c", "svc_ver": "2.0"}],
      "links": [{"source": {"app": "app1", "svc": "mfe-a"}, "target": {"app": "app1", "svc": "service-c"}}]
    }
  ]
}"#;

struct TestFixture {
    root: PathBuf,
    document: PathBuf,
}

impl TestFixture {
    fn new() -> Self {
        let root = unique_temp_dir("render");
        fs::create_dir_all(&root).expect("create fixture dir");
        let document = root.join("apps.json");
        fs::write(&document, DOCUMENT).expect("write document");
        Self { root, document }
    }

    fn render(&self, extra: &[&str]) -> std::process::Output {
        Command::new(svcgraph_bin())
            .current_dir(&self.root)
            .env_remove("SVCGRAPH_CONFIG")
            .env_remove("SVCGRAPH_ZOOM")
            .arg("render")
            .arg(&self.document)
            .args(extra)
            .output()
            .expect("run svcgraph render")
    }

    fn render_json(&self, extra: &[&str]) -> serde_json::Value {
        let mut args = vec!["--format", "json"];
        args.extend_from_slice(extra);
        let output = self.render(&args);
        assert!(
            output.status.success(),
            "render failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("parse scene json")
    }
}

impl Drop for TestFixture {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn svcgraph_bin() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_svcgraph") {
        return PathBuf::from(path);
    }

    let current_exe = std::env::current_exe().expect("resolve current test binary path");
    let target_dir = current_exe
        .parent()
        .and_then(|path| path.parent())
        .expect("derive cargo target dir from test binary path");
    let bin_name = if cfg!(windows) {
        "svcgraph.exe"
    } else {
        "svcgraph"
    };
    target_dir.join(bin_name)
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos();
    let pid = std::process::id();
    std::env::temp_dir().join(format!("svcgraph-{prefix}-{pid}-{nanos}"))
}

fn version_view<'a>(scene: &'a serde_json::Value, node: &str) -> &'a serde_json::Value {
    scene["services"]
        .as_array()
        .expect("services array")
        .iter()
        .flat_map(|service| service["versions"].as_array().expect("versions array"))
        .find(|version| version["node"] == node)
        .expect("version view")
}

#[test]
fn svg_contains_one_box_per_service_and_one_hexagon_per_version() {
    let fixture = TestFixture::new();
    let output = fixture.render(&[]);
    assert!(output.status.success());

    let svg = String::from_utf8_lossy(&output.stdout).to_string();
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<rect").count(), 3);
    assert_eq!(svg.matches("<polygon").count(), 4);
    assert_eq!(svg.matches("<path").count(), 2);
    // tera autoescaping writes `/` as `&#x2F;`
    assert!(svg.contains("service-b@0.0.7"));
}

#[test]
fn hover_dims_unrelated_versions() {
    let fixture = TestFixture::new();
    let scene = fixture.render_json(&["--focus", "app1/mfe-a@1.0"]);

    assert_eq!(scene["focus"], "hover");
    let focal = version_view(&scene, "app1/mfe-a@1.0");
    assert_eq!(focal["emphasis"], "highlighted");
    assert_eq!(focal["stroke"], "#2ade4b");

    let other = version_view(&scene, "app1/mfe-a@1.1");
    assert_eq!(other["emphasis"], "dimmed");
    assert_eq!(other["opacity"], 0.5);
}

#[test]
fn selection_wins_over_hover() {
    let fixture = TestFixture::new();
    let scene = fixture.render_json(&[
        "--focus",
        "app1/mfe-a@1.0",
        "--select",
        "app1/service-c@2.0",
    ]);

    assert_eq!(scene["focus"], "selection");
    assert_eq!(scene["focal"], "app1/service-c@2.0");
    assert_eq!(
        version_view(&scene, "app1/mfe-a@1.1")["stroke"],
        "#2adbfa"
    );
    assert_eq!(
        version_view(&scene, "app1/mfe-a@1.0")["emphasis"],
        "dimmed"
    );
}

#[test]
fn zoom_flag_is_clamped_to_range() {
    let fixture = TestFixture::new();
    let scene = fixture.render_json(&["--zoom", "500"]);
    assert_eq!(scene["zoom_level"], 100);
    assert_eq!(scene["scale"], 2.5);
}

#[test]
fn moving_a_service_moves_its_hexagons() {
    let fixture = TestFixture::new();
    let before = fixture.render_json(&[]);
    let after = fixture.render_json(&["--move", "app1/mfe-a=25,-10"]);

    let x_before = version_view(&before, "app1/mfe-a@1.0")["center"]["x"]
        .as_f64()
        .expect("x");
    let x_after = version_view(&after, "app1/mfe-a@1.0")["center"]["x"]
        .as_f64()
        .expect("x");
    assert!((x_after - x_before - 25.0).abs() < 1e-9);

    let y_before = version_view(&before, "app1/service-b@0.0.7")["center"]["y"]
        .as_f64()
        .expect("y");
    let y_after = version_view(&after, "app1/service-b@0.0.7")["center"]["y"]
        .as_f64()
        .expect("y");
    assert!((y_after - y_before).abs() < 1e-9);
}

#[test]
fn writes_output_file_and_overwrites_with_yes() {
    let fixture = TestFixture::new();
    let target = fixture.root.join("out.svg");
    fs::write(&target, "stale").expect("write stale output");

    let target_arg = target.to_string_lossy().to_string();
    let output = fixture.render(&["-o", &target_arg, "--yes"]);
    assert!(
        output.status.success(),
        "render failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let svg = fs::read_to_string(&target).expect("read output");
    assert!(svg.starts_with("<svg"));
    assert!(output.stdout.is_empty());
}

#[test]
fn unknown_render_format_fails() {
    let fixture = TestFixture::new();
    let output = fixture.render(&["--format", "png"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown render format"));
}
