//! 棋譜ファイルの一括再生ツール群
//!
//! - [`common::record`]: 棋譜テキストから指し手トークン列を取り出す
//! - [`config`]: TOML 設定
//! - [`snapshot`]: JSONL 出力レコード

pub mod common;
pub mod config;
pub mod snapshot;
