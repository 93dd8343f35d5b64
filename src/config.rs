use crate::error::{DssError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_WORKBOOK: &str = "KD#1_ Data Storage Matrix.xlsx";
pub const DEFAULT_DATA: &str = "app/data/services.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 取込元のワークブック
    pub workbook_path: PathBuf,
    /// 読み込むデータファイル
    pub data_path: PathBuf,
    /// build の出力先
    pub output_path: PathBuf,
    /// カスタム推薦ポリシー（JSON）
    pub policy_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workbook_path: PathBuf::from(DEFAULT_WORKBOOK),
            data_path: PathBuf::from(DEFAULT_DATA),
            output_path: PathBuf::from(DEFAULT_DATA),
            policy_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
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

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DssError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("dss-matrix").join("config.json"))
    }
}
