//! rshogi-kifu
//!
//! ローマ字読みを経由して KIF 形式の指し手トークンを解読し、
//! 盤面・持ち駒の状態機械に適用して局面列を再生するライブラリ。
//!
//! # 構成
//!
//! ```text
//! types (Color, PieceType, Piece, Square, Hand, Move)
//!   ↓
//! board (Board: 9x9 盤 + 両者の持ち駒)
//!   ↓
//! notation (PhoneticReader → NotationDecoder)   executor (apply)
//!   ↓                                              ↓
//!                     replay (GameReplayer)
//! ```
//!
//! 合法手判定・終局判定・棋譜文字列の生成は扱わない。

pub mod board;
pub mod error;
pub mod executor;
pub mod notation;
pub mod replay;
pub mod types;

pub use board::Board;
pub use error::{DecodeError, ExecuteError, InvariantViolation, ReplayError, ReplayErrorKind};
pub use executor::apply;
pub use notation::{HepburnReader, NotationDecoder, PhoneticReader, ReadingTable};
pub use replay::{GameReplayer, OwnedPly, PlyCollector, PlyRecord, ReplayOutcome, ReplayState};
pub use types::{Color, Hand, Move, Origin, Piece, PieceType, Square};
