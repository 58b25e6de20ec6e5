//! replay_kifu の設定
//!
//! ```toml
//! threads = 4
//! extensions = ["kif"]
//! default_dialect = "kif"
//! fail_fast = false
//!
//! [[dialect_rules]]
//! pattern = "81Dojo"
//! dialect = "dojo81"
//!
//! [readings]
//! "香" = "kaori"
//! ```
//!
//! 全てのキーは省略可能。コマンドライン引数が設定ファイルより優先される。

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rshogi_kifu::ReadingTable;
use rshogi_kifu::error::ReadingTableError;
use serde::Deserialize;
use thiserror::Error;

use crate::common::record::{DialectRules, RecordDialect};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid dialect pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid readings: {0}")]
    Readings(#[from] ReadingTableError),
}

/// ファイル名に対する方言の割り当て
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DialectRule {
    /// ファイル名に対する正規表現
    pub pattern: String,
    pub dialect: RecordDialect,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplayConfig {
    /// 並列数（0 = rayon 既定）
    pub threads: usize,
    /// ディレクトリ探索で拾う拡張子（大文字小文字は区別しない。`.gz` は外して比較）
    pub extensions: Vec<String>,
    /// どの規則にも一致しないファイルの方言
    pub default_dialect: RecordDialect,
    /// 1局でも失敗したら全体を失敗にする
    pub fail_fast: bool,
    pub dialect_rules: Vec<DialectRule>,
    /// 要素 → 読み の追加表
    pub readings: BTreeMap<String, String>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            extensions: vec!["kif".to_string()],
            default_dialect: RecordDialect::Kif,
            fail_fast: false,
            dialect_rules: vec![DialectRule {
                pattern: "81Dojo".to_string(),
                dialect: RecordDialect::Dojo81,
            }],
            readings: BTreeMap::new(),
        }
    }
}

impl ReplayConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn dialect_rules(&self) -> Result<DialectRules, ConfigError> {
        let mut rules = DialectRules::new(self.default_dialect);
        for rule in &self.dialect_rules {
            rules.push(&rule.pattern, rule.dialect).map_err(|source| ConfigError::Pattern {
                pattern: rule.pattern.clone(),
                source,
            })?;
        }
        Ok(rules)
    }

    /// 読みの追加表。組み込みの読みへ委譲する。
    pub fn reading_table(&self) -> Result<ReadingTable, ConfigError> {
        Ok(ReadingTable::from_pairs(&self.readings)?)
    }

    /// ディレクトリ探索で対象にするファイルか
    pub fn accepts(&self, path: &Path) -> bool {
        let stem_path;
        let path = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("gz") => {
                stem_path = path.with_extension("");
                stem_path.as_path()
            }
            _ => path,
        };
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rshogi_kifu::PhoneticReader;

    #[test]
    fn test_empty_config_is_default() {
        let config = ReplayConfig::from_toml_str("").unwrap();
        assert_eq!(config, ReplayConfig::default());
        let rules = config.dialect_rules().unwrap();
        assert_eq!(rules.dialect_for(Path::new("81Dojo-x.kif")), RecordDialect::Dojo81);
        assert_eq!(rules.dialect_for(Path::new("x.kif")), RecordDialect::Kif);
    }

    #[test]
    fn test_full_config() {
        let text = r#"
threads = 4
extensions = ["kif", ".kifu"]
default_dialect = "dojo81"
fail_fast = true

[[dialect_rules]]
pattern = "^wars_"
dialect = "kif"

[readings]
"Ｎ" = "katsura"
"#;
        let config = ReplayConfig::from_toml_str(text).unwrap();
        assert_eq!(config.threads, 4);
        assert!(config.fail_fast);
        assert_eq!(config.default_dialect, RecordDialect::Dojo81);

        let rules = config.dialect_rules().unwrap();
        assert_eq!(rules.dialect_for(Path::new("wars_1.kif")), RecordDialect::Kif);
        assert_eq!(rules.dialect_for(Path::new("other.kif")), RecordDialect::Dojo81);

        let table = config.reading_table().unwrap();
        assert_eq!(table.read('Ｎ'), Some("katsura"));
        assert_eq!(table.read('桂'), Some("katsura"));

        assert!(config.accepts(Path::new("a/b.KIFU")));
        assert!(config.accepts(Path::new("a/b.kif.gz")));
        assert!(!config.accepts(Path::new("a/b.csa")));
        assert!(!config.accepts(Path::new("a/kif")));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(ReplayConfig::from_toml_str("thread = 2").is_err());
        assert!(ReplayConfig::from_toml_str("default_dialect = \"csa\"").is_err());
    }

    #[test]
    fn test_bad_pattern_and_reading() {
        let mut config = ReplayConfig::default();
        config.dialect_rules.push(DialectRule {
            pattern: "[".to_string(),
            dialect: RecordDialect::Kif,
        });
        assert!(matches!(config.dialect_rules(), Err(ConfigError::Pattern { .. })));

        config.readings.insert("同じ".to_string(), "dou".to_string());
        assert!(matches!(
            config.reading_table(),
            Err(ConfigError::Readings(ReadingTableError::NotSingleElement(_)))
        ));
    }
}
