use std::path::Path;
use std::process::Command;

const METADATA: &str = "classes/java/main/META-INF/spring-configuration-metadata.json";

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn setup(field_doc: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("project/src/main/java/org/apereo/cas/Things.java"),
        &format!(
            "package org.apereo.cas;\npublic class Things {{\n{field_doc}\n    private int retryCount = 3;\n}}\n"
        ),
    );
    write(
        &dir.path().join("build").join(METADATA),
        r#"{ "groups": [], "properties": [ { "name": "cas.things", "type": "java.util.List<org.apereo.cas.Things>" } ] }"#,
    );
    dir
}

fn confmeta(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_confmeta"));
    cmd.arg(dir.join("build")).arg(dir.join("project"));
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_successful_run_rewrites_document() {
    let dir = setup("    /** Number of retries. */");
    let status = confmeta(dir.path()).status().unwrap();
    assert!(status.success());

    let content = std::fs::read_to_string(dir.path().join("build").join(METADATA)).unwrap();
    let document: serde_json::Value = serde_json::from_str(&content).unwrap();
    let names: Vec<&str> = document["properties"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names, vec!["cas.things", "cas.things[].retry-count"]);
}

#[test]
fn test_fatal_error_exits_with_failure() {
    let dir = setup("");
    let output = confmeta(dir.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("retryCount"), "{stderr}");
}

#[test]
fn test_custom_metadata_path() {
    let dir = setup("    /** Number of retries. */");
    let custom = dir.path().join("build/custom.json");
    std::fs::rename(dir.path().join("build").join(METADATA), &custom).unwrap();

    let status = confmeta(dir.path())
        .args(["--metadata-path", "custom.json"])
        .status()
        .unwrap();
    assert!(status.success());
    assert!(std::fs::read_to_string(custom).unwrap().contains("cas.things[].retry-count"));
}
