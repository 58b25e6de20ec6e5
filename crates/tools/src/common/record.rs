//! 棋譜テキストから指し手トークン列を取り出す
//!
//! 対応する方言:
//!
//! ```text
//! Kif     "   1 ７六歩(77)"                       行末の欄がトークン
//! Dojo81  "   1 ７六歩(77)   ( 0:01/00:00:01)"    手数の次の欄がトークン、最終行は捨てる
//! ```
//!
//! 欄の区切りは ASCII の空白だけ。全角空白（`同　銀` の間）では区切らない。

use std::fmt;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 「同」
const SAME_SQUARE: char = '同';
/// 全角空白
const WIDE_SPACE: char = '\u{3000}';

/// 終局・中断を表す指し手欄。ここで局を打ち切る。
pub const TERMINATION_MARKERS: [&str; 12] = [
    "投了",
    "中断",
    "詰み",
    "千日手",
    "持将棋",
    "切れ負け",
    "反則勝ち",
    "反則負け",
    "入玉勝ち",
    "不戦勝",
    "不戦敗",
    "封じ手",
];

/// 棋譜ファイルの方言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecordDialect {
    /// 一般的な KIF
    Kif,
    /// 81道場の KIF（消費時間欄つき・末尾に結果行）
    #[value(name = "dojo81")]
    Dojo81,
}

impl RecordDialect {
    pub const fn layout(self) -> RecordLayout {
        match self {
            RecordDialect::Kif => RecordLayout {
                token_field: TokenField::Last,
                trailer_lines: 0,
            },
            RecordDialect::Dojo81 => RecordLayout {
                token_field: TokenField::Index(1),
                trailer_lines: 1,
            },
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            RecordDialect::Kif => "kif",
            RecordDialect::Dojo81 => "dojo81",
        }
    }
}

impl fmt::Display for RecordDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 指し手行のどの欄をトークンとするか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenField {
    /// 最後の欄
    Last,
    /// 先頭から n 番目（0 始まり、0 は手数）
    Index(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    pub token_field: TokenField,
    /// 末尾から捨てる行数
    pub trailer_lines: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("line {line}: move field is missing")]
    MissingField { line: usize },

    #[error("no move lines found")]
    NoMoves,
}

/// `text` から1局分の指し手トークンを順に取り出す
pub fn extract_tokens(text: &str, layout: RecordLayout) -> Result<Vec<String>, RecordError> {
    let lines: Vec<&str> = text.lines().collect();
    let body = &lines[..lines.len().saturating_sub(layout.trailer_lines)];

    // 手数 1 の行までがヘッダ
    let start = body
        .iter()
        .position(|line| line.split_ascii_whitespace().next() == Some("1"))
        .ok_or(RecordError::NoMoves)?;

    let mut tokens = Vec::new();
    for (offset, line) in body[start..].iter().enumerate() {
        if line.trim_ascii().is_empty() {
            break;
        }
        if !line.starts_with(|c: char| c == ' ' || c.is_ascii_digit()) {
            continue;
        }
        let fields: Vec<&str> = line.split_ascii_whitespace().collect();
        let field = match layout.token_field {
            TokenField::Last => fields.last(),
            TokenField::Index(i) => fields.get(i),
        };
        let token = *field.ok_or(RecordError::MissingField {
            line: start + offset + 1,
        })?;
        if TERMINATION_MARKERS.contains(&token) {
            break;
        }
        tokens.push(normalize_same_square(token));
    }

    if tokens.is_empty() {
        return Err(RecordError::NoMoves);
    }
    Ok(tokens)
}

/// `同銀(31)` → `同　銀(31)`
fn normalize_same_square(token: &str) -> String {
    let mut chars = token.chars();
    if chars.next() == Some(SAME_SQUARE) {
        let rest = chars.as_str();
        if !rest.is_empty() && !rest.starts_with(WIDE_SPACE) {
            return format!("{SAME_SQUARE}{WIDE_SPACE}{rest}");
        }
    }
    token.to_string()
}

/// ファイル名から方言を選ぶ規則（先に一致したものを採用）
#[derive(Debug, Clone)]
pub struct DialectRules {
    rules: Vec<(Regex, RecordDialect)>,
    default: RecordDialect,
}

impl DialectRules {
    pub fn new(default: RecordDialect) -> Self {
        Self {
            rules: Vec::new(),
            default,
        }
    }

    pub fn push(&mut self, pattern: &str, dialect: RecordDialect) -> Result<(), regex::Error> {
        self.rules.push((Regex::new(pattern)?, dialect));
        Ok(())
    }

    pub fn default_dialect(&self) -> RecordDialect {
        self.default
    }

    pub fn dialect_for(&self, path: &Path) -> RecordDialect {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(&name))
            .map_or(self.default, |&(_, dialect)| dialect)
    }
}
