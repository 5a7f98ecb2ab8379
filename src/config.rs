use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 環境変数で接続先を上書きする
pub const BASE_URL_ENV: &str = "IDCARD_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    /// 写真参照の基点（未設定なら base_url）
    #[serde(default)]
    pub photo_base: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            photo_base: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;

        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        Ok(config)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            ClientError::Config("ホームディレクトリが見つかりません".into())
        })?;
        Ok(home.join(".config").join("idcard").join("config.json"))
    }

    pub fn photo_base(&self) -> &str {
        self.photo_base.as_deref().unwrap_or(&self.base_url)
    }

    /// 末尾の `/` は落とす。保存は呼び出し側で行う
    pub fn set_base_url(&mut self, url: &str) -> Result<()> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::Config(format!("URLが不正です: {}", url)));
        }
        self.base_url = url.trim_end_matches('/').to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.photo_base(), "http://localhost:8080");
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_missing_file_gives_default() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config.base_url, Config::default().base_url);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.set_base_url("https://idcard.example.com/").unwrap();
        config.photo_base = Some("https://cdn.example.com".into());
        config.save_to(&path).expect("設定保存失敗");

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.base_url, "https://idcard.example.com");
        assert_eq!(loaded.photo_base(), "https://cdn.example.com");
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"base_url":"http://10.0.0.2:8080"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.photo_base(), "http://10.0.0.2:8080");
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_base_url("localhost:8080"),
            Err(ClientError::Config(_))
        ));
        assert_eq!(config.base_url, "http://localhost:8080");
    }
}
