//! 駒（Piece）

use super::{Color, PieceType};

/// 駒（先後・成りの区別あり）
///
/// 玉は成らない。`promoted` を直接書き換えず [`Piece::promote`] を使うこと。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
    pub promoted: bool,
}

impl Piece {
    /// 生駒を生成
    #[inline]
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Self {
            piece_type,
            color,
            promoted: false,
        }
    }

    /// 成る。玉の場合は何もせず false を返す。
    #[must_use]
    #[inline]
    pub fn promote(&mut self) -> bool {
        if self.piece_type == PieceType::King {
            return false;
        }
        self.promoted = true;
        true
    }

    /// 取られた駒として相手の持ち駒に移る形に変える（手番反転・成り解除）
    #[inline]
    pub fn captured_by(self, capturer: Color) -> Self {
        Self::new(self.piece_type, capturer)
    }

    /// SFEN 表記（成駒は `+` 付き、後手は小文字）
    pub fn to_sfen(self) -> String {
        let c = match self.color {
            Color::Black => self.piece_type.sfen_char(),
            Color::White => self.piece_type.sfen_char().to_ascii_lowercase(),
        };
        if self.promoted { format!("+{c}") } else { c.to_string() }
    }
}
