#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// A throwaway data directory for one board.
pub struct TestBoard {
    dir: TempDir,
}

impl TestBoard {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `kanban` pointed at this board, logging off.
    pub fn cmd(&self) -> Command {
        let mut cmd = kanban_cmd();
        cmd.env("KANBAN_DIR", self.dir.path());
        cmd
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.path().join("kanbanData.json")
    }

    pub fn read_snapshot_raw(&self) -> Option<String> {
        fs::read_to_string(self.snapshot_path()).ok()
    }

    pub fn read_snapshot(&self) -> Value {
        let raw = self.read_snapshot_raw().expect("snapshot exists");
        serde_json::from_str(&raw).expect("snapshot is json")
    }

    pub fn write_snapshot(&self, raw: &str) {
        fs::write(self.snapshot_path(), raw).expect("write snapshot");
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.dir.path().join("kanban.toml");
        fs::write(&path, contents).expect("write config");
        path
    }

    /// Add a task through the CLI and return its id.
    pub fn add(&self, text: &str, list: &str) -> String {
        let output = self
            .cmd()
            .args(["--json", "add", text, "--list", list])
            .output()
            .expect("run add");
        assert!(output.status.success(), "add failed: {output:?}");
        let value: Value = serde_json::from_slice(&output.stdout).expect("json output");
        value["data"]["task_id"]
            .as_str()
            .expect("task id")
            .to_string()
    }
}

pub fn kanban_cmd() -> Command {
    let mut cmd = Command::cargo_bin("kanban").expect("binary");
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("KANBAN_DIR");
    cmd
}

pub fn parse_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("valid json")
}
