#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! へ移行

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// 典型的なサーバー状態を含むスナップショット
pub const FLEET_SNAPSHOT: &str = r#"{
  "docs": [
    {
      "id": "srv-prov",
      "name": "fresh-vps",
      "provider": "dflow",
      "dflowVpsDetails": { "status": "provisioning" }
    },
    {
      "id": "srv-conn",
      "name": "edge-1",
      "provider": "dFlow",
      "dflowVpsDetails": { "status": "running", "next_billing_date": "2025-08-01T00:00:00Z" },
      "connectionAttempts": 29,
      "connection": { "status": "not-checked-yet" },
      "publicIp": "999.999.999.999",
      "tailscalePrivateIp": "100.64.0.12"
    },
    {
      "id": "srv-ok",
      "name": "api",
      "provider": "hetzner",
      "connection": { "status": "success" },
      "onboarded": true,
      "preferConnectionType": "ssh",
      "ip": "203.0.113.20"
    },
    {
      "id": "srv-lock",
      "name": "builder",
      "provider": "aws",
      "connection": { "status": "success" },
      "dpkgLocked": true,
      "publicIp": "198.51.100.3"
    }
  ],
  "totalDocs": 4
}"#;

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn write_snapshot(&self) -> PathBuf {
        self.write_file("servers.json", FLEET_SNAPSHOT)
    }

    #[allow(dead_code)]
    pub fn write_config(&self, content: &str) -> PathBuf {
        self.write_file("dflow.yaml", content)
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    /// ホームや設定ディレクトリを隔離した dflow コマンド
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("dflow").unwrap();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env("NO_COLOR", "1")
            .env_remove("DFLOW_CONFIG_PATH")
            .env_remove("DFLOW_ORGANISATION")
            .env_remove("DFLOW_POLL_INTERVAL")
            .env_remove("RUST_LOG");
        cmd
    }
}
