//! 指し手（Move）
//!
//! 1手ごとに解読器が生成し、適用後は破棄される。
//! 次の手へ引き継がれるのは実際の移動先と手番だけ。

use std::fmt;

use super::{PieceType, Square};

/// 移動元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// 盤上の升から動かす
    Board(Square),
    /// 持ち駒から打つ
    Hand(PieceType),
}

/// 解読済みの指し手
///
/// 打ちと盤上の移動元は `Origin` で排他になっている。
/// `recapture` が立っている場合の `dest` は直前の手の移動先であり、トークンからは読まない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub dest: Square,
    pub origin: Origin,
    pub promote: bool,
    pub recapture: bool,
}

impl Move {
    /// 盤上の駒を動かす手
    pub const fn board(origin: Square, dest: Square, promote: bool) -> Self {
        Self {
            dest,
            origin: Origin::Board(origin),
            promote,
            recapture: false,
        }
    }

    /// 駒打ち
    pub const fn drop(piece_type: PieceType, dest: Square) -> Self {
        Self {
            dest,
            origin: Origin::Hand(piece_type),
            promote: false,
            recapture: false,
        }
    }

    /// 「同」表記の手として印を付ける
    pub const fn with_recapture(mut self) -> Self {
        self.recapture = true;
        self
    }

    /// 駒打ちか
    #[inline]
    pub const fn is_drop(&self) -> bool {
        matches!(self.origin, Origin::Hand(_))
    }

    /// 打つ駒の種類（打ちのときだけ Some）
    #[inline]
    pub const fn drop_piece(&self) -> Option<PieceType> {
        match self.origin {
            Origin::Hand(pt) => Some(pt),
            Origin::Board(_) => None,
        }
    }

    /// 盤上の移動元（打ちのときは None）
    #[inline]
    pub const fn origin_square(&self) -> Option<Square> {
        match self.origin {
            Origin::Board(sq) => Some(sq),
            Origin::Hand(_) => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            Origin::Board(from) => write!(f, "{from}-{}", self.dest)?,
            Origin::Hand(pt) => write!(f, "{}*{}", pt.sfen_char(), self.dest)?,
        }
        if self.promote {
            f.write_str("+")?;
        }
        if self.recapture {
            f.write_str(" (same)")?;
        }
        Ok(())
    }
}
