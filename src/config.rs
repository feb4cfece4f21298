use crate::error::{NameMatchError, Result};
use name_match_common::export::excel_core::DEFAULT_SHEET_NAME;
use name_match_common::{MatchOptions, Normalizer, OutputLabels, SubstitutionRule};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 既定の氏名列
pub const DEFAULT_NAME_COLUMN: &str = "اسم الموظف";
/// 既定の重複チェック列
pub const DEFAULT_DUPLICATE_COLUMN: &str = "Iban";

/// 設定ファイルの場所を上書きする環境変数
const CONFIG_PATH_ENV: &str = "NAME_MATCH_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub name_column: String,
    pub duplicate_column: String,
    pub score_threshold: f64,
    pub token_prefix_len: usize,
    pub parallel: bool,
    pub sheet_name: String,
    pub labels: OutputLabels,
    /// 既定の置換テーブルに追加するルール
    pub substitutions: Vec<SubstitutionRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        // 環境変数を優先
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| NameMatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("name-match").join("config.json"))
    }

    fn default_config() -> Self {
        let options = MatchOptions::default();
        Self {
            name_column: DEFAULT_NAME_COLUMN.into(),
            duplicate_column: DEFAULT_DUPLICATE_COLUMN.into(),
            score_threshold: options.score_threshold,
            token_prefix_len: options.token_prefix_len,
            parallel: options.parallel,
            sheet_name: DEFAULT_SHEET_NAME.into(),
            labels: OutputLabels::default(),
            substitutions: Vec::new(),
        }
    }

    /// 照合オプションを組み立てる
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            score_threshold: self.score_threshold,
            token_prefix_len: self.token_prefix_len,
            parallel: self.parallel,
        }
    }

    /// 既定ルール + 追加ルールの正規化器
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::default().with_rules(self.substitutions.iter().cloned())
    }

    pub fn set_name_column(&mut self, column: String) -> Result<()> {
        if column.trim().is_empty() {
            return Err(NameMatchError::Config("氏名列が空です".into()));
        }
        self.name_column = column.trim().to_string();
        Ok(())
    }

    pub fn set_duplicate_column(&mut self, column: String) -> Result<()> {
        if column.trim().is_empty() {
            return Err(NameMatchError::Config("重複チェック列が空です".into()));
        }
        self.duplicate_column = column.trim().to_string();
        Ok(())
    }

    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        if !(0.0..=100.0).contains(&threshold) {
            return Err(NameMatchError::Config(format!(
                "閾値は0〜100で指定してください: {}",
                threshold
            )));
        }
        self.score_threshold = threshold;
        Ok(())
    }
}
