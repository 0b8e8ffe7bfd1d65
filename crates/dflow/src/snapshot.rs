use anyhow::Context as _;
use dflow_core::{ServerRecord, SnapshotFormat, load_servers_file, parse_servers};
use std::io::Read;
use std::path::Path;

/// ファイルまたは標準入力からサーバー一覧を読み込む
pub fn read_records(file: Option<&Path>) -> anyhow::Result<Vec<ServerRecord>> {
    match file {
        Some(path) if path != Path::new("-") => load_servers_file(path)
            .with_context(|| format!("スナップショットを読み込めません: {}", path.display())),
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("標準入力を読み込めません")?;
            parse_servers(&content, detect_format(&content))
                .context("標準入力のスナップショットを解析できません")
        }
    }
}

/// 標準入力は中身で判定する
pub fn detect_format(content: &str) -> SnapshotFormat {
    match content.trim_start().chars().next() {
        Some('{') | Some('[') => SnapshotFormat::Json,
        _ => SnapshotFormat::Yaml,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format("  [{\"provider\": \"dflow\"}]"), SnapshotFormat::Json);
        assert_eq!(detect_format("{\"docs\": []}"), SnapshotFormat::Json);
        assert_eq!(detect_format("- provider: dflow\n"), SnapshotFormat::Yaml);
        assert_eq!(detect_format(""), SnapshotFormat::Yaml);
    }

    #[test]
    fn test_read_records_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("servers.json");
        std::fs::write(&path, r#"[{"provider": "dflow", "name": "a"}]"#).unwrap();

        let records = read_records(Some(&path)).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_read_records_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_records(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("スナップショットを読み込めません"));
    }
}
