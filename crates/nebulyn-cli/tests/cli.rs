// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! End-to-end runs of the `nebulyn` binary against temp dirs.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use nebulyn_dry_tests::{InMemoryStore, SnapshotBuilder};
use nebulyn_grid::snapshot::{SchemaVersion, UpgradeOptions};
use nebulyn_grid::{AnySnapshot, Direction, GridSnapshot};
use nebulyn_grid_service::{router, AppState, API_PREFIX};
use predicates::prelude::*;
use tempfile::TempDir;

fn sample() -> GridSnapshot {
    SnapshotBuilder::new()
        .name("Nebulyn Main Grid")
        .texture_base_path("tex/")
        .port(5, 10, |p| p.color("red").input(Direction::Top))
        .port(8, 12, |p| {
            p.color("blue")
                .output(Direction::Left)
                .output(Direction::Bottom)
        })
        .port(1, 1, |p| p.color("red").block("glass"))
        .build()
}

const LEGACY: &str = r#"{
  "name": "Old Grid",
  "version": "1.0.0",
  "ports": [
    { "coordinate": "3,4", "inputArrow": true, "outputArrow": false, "block": "stone", "color": "green" }
  ]
}"#;

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn sample_file(&self) -> PathBuf {
        self.write("main.json", &sample().to_json_pretty().unwrap())
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("nebulyn").unwrap();
        cmd.arg("--store-dir").arg(self.path("store"));
        cmd.env("RUST_LOG", "error");
        cmd
    }
}

/// Read a file the CLI wrote; it must be in the current schema.
fn read_current(path: &Path) -> GridSnapshot {
    let any = AnySnapshot::from_slice(&std::fs::read(path).unwrap()).unwrap();
    assert_eq!(any.schema(), SchemaVersion::V2, "{} not upgraded", path.display());
    any.into_current(&UpgradeOptions::default())
}

#[test]
fn show_draws_the_grid_and_lists_ports() {
    let env = Env::new();
    let file = env.sample_file();
    env.cmd()
        .arg("show")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nebulyn Main Grid (3 ports)"))
        .stdout(predicate::str::contains("tex/glass.png"))
        .stdout(predicate::str::contains("10,5").not())
        .stdout(predicate::str::contains("5,10"));
}

#[test]
fn show_css_uses_the_cell_size_pref() {
    let env = Env::new();
    let file = env.sample_file();
    env.cmd()
        .args(["prefs", "--cell-size", "42"])
        .assert()
        .success();
    env.cmd()
        .arg("show")
        .arg(&file)
        .arg("--css")
        .assert()
        .success()
        .stdout(predicate::str::contains("42px"));
}

#[test]
fn stats_json_reports_totals() {
    let env = Env::new();
    let file = env.sample_file();
    let output = env.cmd().arg("stats").arg(&file).arg("--json").output().unwrap();
    assert!(output.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["totalPorts"], 3);
    assert_eq!(stats["totalInputs"], 1);
    assert_eq!(stats["totalOutputs"], 2);
    assert_eq!(stats["colorDistribution"]["red"], 2);
    assert_eq!(stats["mostComplexPort"]["coordinate"], "8,12");
}

#[test]
fn stats_of_legacy_file_counts_boolean_arrows() {
    let env = Env::new();
    let file = env.write("old.json", LEGACY);
    env.cmd()
        .arg("stats")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total inputs"))
        .stdout(predicate::str::contains("green"));
}

#[test]
fn non_json_path_is_rejected() {
    let env = Env::new();
    let file = env.write("main.txt", "{}");
    env.cmd()
        .arg("show")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a JSON file"));
}

#[test]
fn garbage_file_is_rejected() {
    let env = Env::new();
    let file = env.write("broken.json", "not json at all");
    env.cmd()
        .arg("stats")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JSON file format"));
}

#[test]
fn upgrade_rewrites_legacy_arrows() {
    let env = Env::new();
    let file = env.write("old.json", LEGACY);
    let out = env.path("new.json");
    env.cmd()
        .arg("upgrade")
        .arg(&file)
        .arg("--out")
        .arg(&out)
        .args(["--input-direction", "left", "--texture-base-path", "blocks/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("version 2.0.0"));

    let snap = read_current(&out);
    assert_eq!(snap.texture_base_path, "blocks/");
    let port = &snap.ports[0].port;
    assert!(port.input_arrows.contains(Direction::Left));
    assert!(port.output_arrows.is_empty());
}

#[test]
fn unknown_direction_is_a_usage_error() {
    let env = Env::new();
    let file = env.write("old.json", LEGACY);
    env.cmd()
        .arg("upgrade")
        .arg(&file)
        .arg("--out")
        .arg(env.path("x.json"))
        .args(["--input-direction", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sideways"));
}

#[test]
fn partition_then_merge_restores_ports() {
    let env = Env::new();
    let file = env.sample_file();
    let parts = env.path("parts");
    env.cmd()
        .arg("partition")
        .arg(&file)
        .arg("--out-dir")
        .arg(&parts)
        .assert()
        .success()
        .stdout(predicate::str::contains("red.json (2 ports)"))
        .stdout(predicate::str::contains("blue.json (1 ports)"));

    let red = read_current(&parts.join("red.json"));
    assert_eq!(red.name, "Nebulyn Red Grid");
    assert!(red.ports.iter().all(|r| r.port.color_only));

    let merged = env.path("merged.json");
    env.cmd()
        .arg("merge")
        .arg(parts.join("red.json"))
        .arg(parts.join("blue.json"))
        .arg("--out")
        .arg(&merged)
        .assert()
        .success();
    let snap = read_current(&merged);
    assert!(snap.same_ports(&sample()));
}

#[test]
fn merge_refuses_duplicate_colours() {
    let env = Env::new();
    let file = env.sample_file();
    let parts = env.path("parts");
    env.cmd()
        .arg("partition")
        .arg(&file)
        .arg("--out-dir")
        .arg(&parts)
        .assert()
        .success();
    env.cmd()
        .arg("merge")
        .arg(parts.join("red.json"))
        .arg(parts.join("red.json"))
        .arg("--out")
        .arg(env.path("merged.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("two partitions"));
}

#[test]
fn library_save_list_load_delete() {
    let env = Env::new();
    let file = env.sample_file();

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("library is empty"));

    env.cmd()
        .arg("save")
        .arg(&file)
        .args(["--name", "main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("saved \"main\""));

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("main"))
        .stdout(predicate::str::contains("2.0.0"));

    let out = env.path("loaded.json");
    env.cmd()
        .args(["load", "main", "--out"])
        .arg(&out)
        .assert()
        .success();
    let snap = read_current(&out);
    assert!(snap.same_ports(&sample()));

    env.cmd().args(["delete", "main"]).assert().success();
    env.cmd()
        .args(["delete", "main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no grid named"));
}

#[test]
fn save_rejects_bad_names() {
    let env = Env::new();
    let file = env.sample_file();
    env.cmd()
        .arg("save")
        .arg(&file)
        .args(["--name", "../escape"])
        .assert()
        .failure();
}

#[test]
fn prefs_persist_between_runs() {
    let env = Env::new();
    env.cmd()
        .args(["prefs", "--grid-name", "Workbench"])
        .assert()
        .success();
    env.cmd()
        .arg("prefs")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workbench"))
        .stdout(predicate::str::contains("textures/"));
    env.cmd()
        .args(["prefs", "--cell-size", "0"])
        .assert()
        .failure();
}

#[test]
fn prefs_reset_restores_defaults() {
    let env = Env::new();
    env.cmd()
        .args(["prefs", "--grid-name", "Workbench"])
        .assert()
        .success();
    env.cmd()
        .args(["prefs", "--reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Workbench").not());
    env.cmd()
        .arg("prefs")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workbench").not());
}

#[test]
fn rust_log_raises_the_log_level() {
    let env = Env::new();
    env.cmd()
        .env("RUST_LOG", "debug")
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("store opened"));
}

#[test]
fn debug_logs_are_quiet_by_default() {
    let env = Env::new();
    env.cmd()
        .env_remove("RUST_LOG")
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("store opened").not());
}

fn spawn_service() -> String {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, router(AppState::with_store(InMemoryStore::new())))
                .await
                .unwrap();
        });
    });
    format!("http://{}{API_PREFIX}", rx.recv().unwrap())
}

#[test]
fn push_pull_and_remote_list() {
    let env = Env::new();
    let url = spawn_service();
    let file = env.sample_file();

    env.cmd()
        .args(["remote-list", "--url", &url])
        .assert()
        .success()
        .stdout(predicate::str::contains("no remote grids"));

    let output = env
        .cmd()
        .arg("push")
        .arg(&file)
        .args(["--url", &url])
        .output()
        .unwrap();
    assert!(output.status.success());
    let id = String::from_utf8(output.stdout).unwrap().trim().to_owned();
    assert!(!id.is_empty());

    env.cmd()
        .args(["remote-list", "--url", &url])
        .assert()
        .success()
        .stdout(predicate::str::contains(id.as_str()));

    let out = env.path("pulled.json");
    env.cmd()
        .args(["pull", &id, "--url", &url, "--out"])
        .arg(&out)
        .assert()
        .success();
    let snap = read_current(&out);
    assert!(snap.same_ports(&sample()));

    env.cmd()
        .args(["pull", "missing-id", "--url", &url, "--out"])
        .arg(env.path("none.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("grid not found"));
}
