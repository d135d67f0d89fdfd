use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;

const VITE_INDEX: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <title>Shop</title>
    <script type="module" crossorigin src="/assets/index-B7x2.js"></script>
    <link rel="modulepreload" crossorigin href="/assets/vendor-Cq91.js">
    <link rel="stylesheet" crossorigin href="/assets/index-D0aa.css">
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>
"#;

const VITE_INDEX_PROCESSED: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <title>Shop</title>
    <link rel="modulepreload" crossorigin href="/assets/index-B7x2.js" />
    <script type="module" crossorigin src="/assets/index-B7x2.js"></script>
    <link rel="stylesheet" href="/assets/index-D0aa.css">
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>
"#;

fn hintweave() -> Command {
    Command::cargo_bin("hintweave").unwrap()
}

#[test]
fn process_rewrites_html_in_directory() {
    let dir = tempfile::tempdir().unwrap();
    let dist = dir.path().join("dist");
    fs::create_dir_all(dist.join("assets")).unwrap();
    fs::write(dist.join("index.html"), VITE_INDEX).unwrap();
    fs::write(dist.join("assets/index-B7x2.js"), "export {}").unwrap();

    hintweave()
        .current_dir(dir.path())
        .args(["process", "dist"])
        .assert()
        .success()
        .stderr(predicate::str::contains("1 of 1 file(s) rewritten"));

    assert_eq!(fs::read_to_string(dist.join("index.html")).unwrap(), VITE_INDEX_PROCESSED);
    assert_eq!(fs::read_to_string(dist.join("assets/index-B7x2.js")).unwrap(), "export {}");

    // Second run finds nothing left to do
    hintweave()
        .current_dir(dir.path())
        .args(["process", "dist"])
        .assert()
        .success()
        .stderr(predicate::str::contains("0 of 1 file(s) rewritten"));
}

#[test]
fn process_dry_run_does_not_write() {
    let dir = tempfile::tempdir().unwrap();
    let index = dir.path().join("index.html");
    fs::write(&index, VITE_INDEX).unwrap();

    hintweave()
        .current_dir(dir.path())
        .args(["process", "--dry-run", "index.html"])
        .assert()
        .success()
        .stderr(predicate::str::contains("would update"));

    assert_eq!(fs::read_to_string(&index).unwrap(), VITE_INDEX);
}

#[test]
fn process_honors_config_toggles() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), VITE_INDEX).unwrap();
    fs::write(
        dir.path().join("hintweave.toml"),
        "[hints]\nresource_hints = false\n",
    )
    .unwrap();

    hintweave()
        .current_dir(dir.path())
        .args(["process", "index.html"])
        .assert()
        .success();

    let html = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(html.contains(r#"<link rel="modulepreload" crossorigin href="/assets/vendor-Cq91.js">"#));
    assert!(html.contains(r#"<link rel="stylesheet" href="/assets/index-D0aa.css">"#));
}

#[test]
fn process_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), VITE_INDEX).unwrap();
    fs::write(dir.path().join("custom.toml"), "[hints]\ncritical_scripts = 0\n").unwrap();

    hintweave()
        .current_dir(dir.path())
        .args(["--config", "custom.toml", "process", "index.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("critical_scripts must be at least 1"));
}

#[test]
fn process_missing_path_fails() {
    let dir = tempfile::tempdir().unwrap();

    hintweave()
        .current_dir(dir.path())
        .args(["process", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to access nope"));
}

#[test]
fn chunks_prints_assignments() {
    let dir = tempfile::tempdir().unwrap();

    hintweave()
        .current_dir(dir.path())
        .args([
            "chunks",
            "node_modules/react-dom/index.js",
            "node_modules/@radix-ui/react-dialog/index.js",
            "node_modules/@radix-ui/react-tooltip/index.js",
            "src/App.tsx",
        ])
        .assert()
        .success()
        .stdout(predicate::eq(
            "node_modules/react-dom/index.js -> vendor\n\
             node_modules/@radix-ui/react-dialog/index.js -> radix-dialog\n\
             node_modules/@radix-ui/react-tooltip/index.js -> radix-ui\n\
             src/App.tsx -> (default)\n",
        ));
}

#[test]
fn chunks_reads_stdin_and_prints_json() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("hintweave.toml"),
        "[[chunks.rules]]\npatterns = [\"node_modules/zod\"]\nchunk = \"zod\"\n",
    )
    .unwrap();

    let output = hintweave()
        .current_dir(dir.path())
        .args(["chunks", "--json"])
        .write_stdin("node_modules/zod/lib/index.mjs\n\nnode_modules/react/index.js\nsrc/main.tsx\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        plan,
        serde_json::json!({
            "chunks": [
                { "name": "zod", "type": "manual", "module_ids": ["node_modules/zod/lib/index.mjs"] },
                { "name": "vendor", "type": "manual", "module_ids": ["node_modules/react/index.js"] },
                { "name": "(default)", "type": "default", "module_ids": ["src/main.tsx"] }
            ]
        })
    );
}

#[test]
fn init_writes_config_once() {
    let dir = tempfile::tempdir().unwrap();

    hintweave()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    let content = fs::read_to_string(dir.path().join("hintweave.toml")).unwrap();
    assert!(content.contains("critical_scripts = 2"));

    hintweave()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    hintweave()
        .current_dir(dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}
