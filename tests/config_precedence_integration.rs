use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const DOCUMENT: &str = r#"{"app_versions": [{"version": 1, "app_name": "app1",
  "services": [{"app": "app1", "svc": "mfe-a", "svc_ver": "1.0"}]}]}"#;

struct TestFixture {
    root: PathBuf,
    nested: PathBuf,
}

impl TestFixture {
    /// Discoverable config at the root sets zoom 60; `explicit.toml` sets 80.
    fn new() -> Self {
        let root = unique_temp_dir("config-precedence");
        let nested = root.join("diagrams").join("current");
        fs::create_dir_all(&nested).expect("create nested dir");
        fs::create_dir_all(root.join(".svcgraph")).expect("create .svcgraph");

        fs::write(
            root.join(".svcgraph").join("config.toml"),
            "[zoom]\ndefault = 60\n\n[services.\"app1/mfe-a\"]\nx = 500\ny = 300\ncolor = \"#123456\"\n",
        )
        .expect("write discovered config");
        fs::write(root.join("explicit.toml"), "[zoom]\ndefault = 80\n")
            .expect("write explicit config");
        fs::write(nested.join("apps.json"), DOCUMENT).expect("write document");

        Self { root, nested }
    }

    fn render(&self, global: &[&str], envs: &[(&str, String)]) -> std::process::Output {
        let mut cmd = Command::new(svcgraph_bin());
        cmd.current_dir(&self.nested)
            .env_remove("SVCGRAPH_CONFIG")
            .env_remove("SVCGRAPH_ZOOM")
            .args(global)
            .args(["render", "apps.json", "--format", "json"]);
        for (key, value) in envs {
            cmd.env(key, value);
        }
        cmd.output().expect("run svcgraph render")
    }

    fn zoom_level(&self, global: &[&str], envs: &[(&str, String)]) -> u64 {
        let output = self.render(global, envs);
        assert!(
            output.status.success(),
            "render failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let scene: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("parse scene json");
        scene["zoom_level"].as_u64().expect("zoom level")
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

#[test]
fn discovers_config_from_ancestor_directory() {
    let fixture = TestFixture::new();
    assert_eq!(fixture.zoom_level(&[], &[]), 60);

    let output = fixture.render(&[], &[]);
    let scene: serde_json::Value = serde_json::from_slice(&output.stdout).expect("parse scene");
    let service = &scene["services"][0];
    assert_eq!(service["color"], "#123456");
    assert_eq!(service["rect"]["y"], 300.0 - 40.0);
}

#[test]
fn env_config_overrides_discovery() {
    let fixture = TestFixture::new();
    let explicit = fixture.root.join("explicit.toml").to_string_lossy().to_string();
    assert_eq!(
        fixture.zoom_level(&[], &[("SVCGRAPH_CONFIG", explicit)]),
        80
    );
}

#[test]
fn flag_config_overrides_env() {
    let fixture = TestFixture::new();
    let other = fixture.root.join("flag.toml");
    fs::write(&other, "[zoom]\ndefault = 30\n").expect("write flag config");

    let explicit = fixture.root.join("explicit.toml").to_string_lossy().to_string();
    let other = other.to_string_lossy().to_string();
    assert_eq!(
        fixture.zoom_level(&["--config", &other], &[("SVCGRAPH_CONFIG", explicit)]),
        30
    );
}

#[test]
fn zoom_env_overrides_file_default() {
    let fixture = TestFixture::new();
    assert_eq!(
        fixture.zoom_level(&[], &[("SVCGRAPH_ZOOM", "90".to_string())]),
        90
    );
}

#[test]
fn invalid_zoom_env_fails() {
    let fixture = TestFixture::new();
    let output = fixture.render(&[], &[("SVCGRAPH_ZOOM", "wide".to_string())]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("SVCGRAPH_ZOOM"));
}

#[test]
fn missing_env_config_fails() {
    let fixture = TestFixture::new();
    let missing = fixture.root.join("missing.toml").to_string_lossy().to_string();
    let output = fixture.render(&[], &[("SVCGRAPH_CONFIG", missing)]);
    assert!(!output.status.success());
}

#[test]
fn config_flag_is_validated_for_every_document_command() {
    let fixture = TestFixture::new();
    let broken = fixture.root.join("broken.toml");
    fs::write(&broken, "[zoom\ndefault = ").expect("write broken config");
    let broken = broken.to_string_lossy().to_string();
    let missing = fixture.root.join("missing.toml").to_string_lossy().to_string();

    for command in ["versions", "graph", "highlight", "connections", "check"] {
        for config in [&broken, &missing] {
            let mut cmd = Command::new(svcgraph_bin());
            cmd.current_dir(&fixture.nested)
                .env_remove("SVCGRAPH_CONFIG")
                .env_remove("SVCGRAPH_ZOOM")
                .args(["--config", config.as_str(), command, "apps.json"]);
            if command == "highlight" {
                cmd.arg("app1/mfe-a@1.0");
            }
            let output = cmd.output().expect("run svcgraph");
            assert!(
                !output.status.success(),
                "{command} accepted --config {config}"
            );
            assert!(String::from_utf8_lossy(&output.stderr).contains("config"));
        }
    }

    let output = Command::new(svcgraph_bin())
        .current_dir(&fixture.nested)
        .args(["--config", missing.as_str(), "completions", "bash"])
        .output()
        .expect("run svcgraph completions");
    assert!(output.status.success());
}
