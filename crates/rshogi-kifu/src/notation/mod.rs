//! 指し手表記の解読
//!
//! トークンの各要素（文字）を [`PhoneticReader`] でローマ字読みに変換し、
//! 閉じた列挙型（[`readings`]）で筋・段・駒名・修飾語を確定させる。
//! 読みの供給元は注入するので、外部の言語処理系なしで決定的に試験できる。

mod decoder;
mod reader;
pub mod readings;

pub use decoder::NotationDecoder;
pub use reader::{HepburnReader, PhoneticReader, ReadingTable};
