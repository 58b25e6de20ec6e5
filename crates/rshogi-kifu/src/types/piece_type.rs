//! 駒種（PieceType）

/// 駒種（先後・成りの区別なし）
///
/// 成りは [`Piece`](super::Piece) 側のフラグで持つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceType {
    Pawn = 0,
    Lance = 1,
    Knight = 2,
    Silver = 3,
    Gold = 4,
    Bishop = 5,
    Rook = 6,
    King = 7,
}

impl PieceType {
    /// 駒種の数
    pub const NUM: usize = 8;

    /// 手駒になる駒種の数
    pub const HAND_NUM: usize = 7;

    /// 手駒になる駒種一覧（`hand_index` の順）
    pub const HAND_PIECES: [PieceType; 7] = [
        PieceType::Pawn,
        PieceType::Lance,
        PieceType::Knight,
        PieceType::Silver,
        PieceType::Gold,
        PieceType::Bishop,
        PieceType::Rook,
    ];

    /// 成れるかどうか
    #[inline]
    pub const fn can_promote(self) -> bool {
        !matches!(self, PieceType::Gold | PieceType::King)
    }

    /// 手駒配列でのインデックス（玉は手駒にならないので None）
    #[inline]
    pub const fn hand_index(self) -> Option<usize> {
        match self {
            PieceType::King => None,
            _ => Some(self as usize),
        }
    }

    /// SFEN の駒文字（先手の大文字）
    pub const fn sfen_char(self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Lance => 'L',
            PieceType::Knight => 'N',
            PieceType::Silver => 'S',
            PieceType::Gold => 'G',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::King => 'K',
        }
    }
}
