//! 基本型モジュール
//!
//! # 型の依存関係
//!
//! ```text
//! Color
//!   ↓
//! Square
//!   ↓
//! PieceType
//!   ↓
//! Piece ← Move
//!   ↓
//! Hand
//! ```

mod color;
mod hand;
mod moves;
mod piece;
mod piece_type;
mod square;

pub use color::Color;
pub use hand::Hand;
pub use moves::{Move, Origin};
pub use piece::Piece;
pub use piece_type::PieceType;
pub use square::Square;
