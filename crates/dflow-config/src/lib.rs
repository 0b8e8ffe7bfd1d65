pub mod error;

pub use error::*;

use dflow_core::{ClassifierOptions, DpkgPrecedence, MAX_CONNECTION_ATTEMPTS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 設定ファイルを直接指定する環境変数
pub const CONFIG_PATH_ENV: &str = "DFLOW_CONFIG_PATH";

/// 検索するファイル名（優先順）
const CANDIDATES: [&str; 4] = [
    "dflow.local.yaml",
    ".dflow.local.yaml",
    "dflow.yaml",
    ".dflow.yaml",
];

const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// 指定ディレクトリとその .dflow/ から設定ファイルを探す
pub fn find_config_file_from(dir: &Path) -> Option<PathBuf> {
    for filename in &CANDIDATES {
        let path = dir.join(filename);
        if path.exists() {
            return Some(path);
        }
    }

    let dflow_dir = dir.join(".dflow");
    if dflow_dir.is_dir() {
        for filename in &CANDIDATES {
            let path = dflow_dir.join(filename);
            if path.exists() {
                return Some(path);
            }
        }
    }

    None
}

/// 設定ファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 DFLOW_CONFIG_PATH (直接パス指定)
/// 2. カレントディレクトリ: dflow.local.yaml, .dflow.local.yaml, dflow.yaml, .dflow.yaml
/// 3. ./.dflow/ ディレクトリ内: 同様の順序
/// 4. ~/.config/dflow/dflow.yaml (グローバル設定)
pub fn find_config_file() -> Result<PathBuf> {
    // 1. 環境変数で直接指定
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(&config_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!(env_path = %config_path, "DFLOW_CONFIG_PATH is set but file does not exist");
    }

    // 2, 3. カレントディレクトリと ./.dflow/
    let current_dir = std::env::current_dir()?;
    if let Some(path) = find_config_file_from(&current_dir) {
        return Ok(path);
    }

    // 4. グローバル設定ファイル
    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("dflow").join("dflow.yaml");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}

/// dflow の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Settings {
    /// 詳細リンクに使う組織スラッグ
    pub organisation: Option<String>,

    /// dFlowサーバーの接続試行回数の上限
    pub max_connection_attempts: u32,

    /// オンボーディングとdpkgロックの判定順
    pub dpkg_precedence: DpkgPrecedence,

    /// watch の再読み込み間隔（秒）
    pub poll_interval: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            organisation: None,
            max_connection_attempts: MAX_CONNECTION_ATTEMPTS,
            dpkg_precedence: DpkgPrecedence::default(),
            poll_interval: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl Settings {
    /// YAML文字列から設定を読み込む（空なら既定値）
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: Settings =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_connection_attempts == 0 {
            return Err(ConfigError::InvalidConfig(
                "max-connection-attempts は1以上を指定してください".to_string(),
            ));
        }
        if self.poll_interval == 0 {
            return Err(ConfigError::InvalidConfig(
                "poll-interval は1以上を指定してください".to_string(),
            ));
        }
        Ok(())
    }

    pub fn classifier_options(&self) -> ClassifierOptions {
        ClassifierOptions {
            max_connection_attempts: self.max_connection_attempts,
            dpkg_precedence: self.dpkg_precedence,
        }
    }
}

/// 読み込んだ設定と、その読み込み元
#[derive(Debug, Clone, Default)]
pub struct LoadedSettings {
    pub settings: Settings,
    /// 設定ファイルが無い場合は None
    pub source: Option<PathBuf>,
}

/// 指定ファイルから設定を読み込む
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    Settings::from_yaml(&content, path)
}

/// 設定ファイルを探して読み込む。見つからなければ既定値を返す
pub fn load_settings() -> Result<LoadedSettings> {
    match find_config_file() {
        Ok(path) => {
            let settings = load_settings_from(&path)?;
            tracing::debug!(path = %path.display(), "loaded settings");
            Ok(LoadedSettings {
                settings,
                source: Some(path),
            })
        }
        Err(ConfigError::ConfigFileNotFound) => {
            tracing::debug!("no config file found, using defaults");
            Ok(LoadedSettings::default())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn test_find_config_file_from_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("dflow.yaml"), "# test").unwrap();

        let result = find_config_file_from(temp_dir.path()).unwrap();
        assert!(result.ends_with("dflow.yaml"));
    }

    #[test]
    fn test_local_file_priority() {
        let temp_dir = tempfile::tempdir().unwrap();

        // dflow.yaml と dflow.local.yaml の両方を作成
        fs::write(temp_dir.path().join("dflow.yaml"), "# shared").unwrap();
        fs::write(temp_dir.path().join("dflow.local.yaml"), "# local").unwrap();

        // dflow.local.yaml が優先される
        let result = find_config_file_from(temp_dir.path()).unwrap();
        assert!(result.ends_with("dflow.local.yaml"));
    }

    #[test]
    fn test_hidden_file_priority() {
        let temp_dir = tempfile::tempdir().unwrap();

        fs::write(temp_dir.path().join(".dflow.local.yaml"), "# hidden local").unwrap();
        fs::write(temp_dir.path().join("dflow.yaml"), "# visible").unwrap();

        let result = find_config_file_from(temp_dir.path()).unwrap();
        assert!(result.ends_with(".dflow.local.yaml"));
    }

    #[test]
    fn test_find_config_file_in_dflow_dir() {
        let temp_dir = tempfile::tempdir().unwrap();

        let dflow_dir = temp_dir.path().join(".dflow");
        fs::create_dir(&dflow_dir).unwrap();
        fs::write(dflow_dir.join("dflow.yaml"), "# in dflow dir").unwrap();

        let result = find_config_file_from(temp_dir.path()).unwrap();
        assert!(result.ends_with(".dflow/dflow.yaml"));
    }

    #[test]
    fn test_find_config_file_from_empty_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(find_config_file_from(temp_dir.path()).is_none());
    }

    #[test]
    #[serial]
    fn test_find_config_file_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("dflow.yaml"), "# test").unwrap();

        // テンポラリディレクトリに移動
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = temp_env::with_var_unset(CONFIG_PATH_ENV, find_config_file);

        // 元のディレクトリに戻る
        std::env::set_current_dir(original_dir).unwrap();

        assert!(result.unwrap().ends_with("dflow.yaml"));
    }

    #[test]
    #[serial]
    fn test_find_config_file_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("custom.yaml");
        fs::write(&config_path, "# custom").unwrap();

        let result = temp_env::with_var(CONFIG_PATH_ENV, Some(config_path.as_os_str()), || {
            find_config_file()
        });
        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    #[serial]
    fn test_load_settings_from_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("custom.yaml");
        fs::write(
            &config_path,
            "organisation: acme\nmax-connection-attempts: 12\ndpkg-precedence: dpkg-first\n",
        )
        .unwrap();

        let loaded = temp_env::with_var(CONFIG_PATH_ENV, Some(config_path.as_os_str()), || {
            load_settings()
        })
        .unwrap();

        assert_eq!(loaded.source.as_deref(), Some(config_path.as_path()));
        assert_eq!(loaded.settings.organisation.as_deref(), Some("acme"));
        assert_eq!(loaded.settings.max_connection_attempts, 12);
        assert_eq!(loaded.settings.dpkg_precedence, DpkgPrecedence::DpkgFirst);
        // 未指定の項目は既定値
        assert_eq!(loaded.settings.poll_interval, 10);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_connection_attempts, 30);
        assert_eq!(settings.dpkg_precedence, DpkgPrecedence::AsWritten);
        assert!(settings.organisation.is_none());

        let options = settings.classifier_options();
        assert_eq!(options, ClassifierOptions::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        let settings = Settings::from_yaml("  \n", Path::new("dflow.yaml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = Settings::from_yaml("max-attempts: 5\n", Path::new("dflow.yaml"));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_zero_attempts_is_invalid() {
        let result = Settings::from_yaml("max-connection-attempts: 0\n", Path::new("dflow.yaml"));
        assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_settings_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("dflow.yaml");
        fs::write(&path, "poll-interval: 3\n").unwrap();

        let settings = load_settings_from(&path).unwrap();
        assert_eq!(settings.poll_interval, 3);
    }
}
