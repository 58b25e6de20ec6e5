//! 盤面（Board）
//!
//! 9x9 の升と先後の持ち駒を持つ。盤上の駒は Board が、持ち駒は各 Hand が所有する。
//! 平手初期局面から到達した局面では盤上と両者の持ち駒の合計が常に 40 枚。

use std::fmt::Write as _;

use crate::error::InvariantViolation;
use crate::types::{Color, Hand, Piece, PieceType, Square};

/// 平手の駒数
pub const TOTAL_PIECES: usize = 40;

/// 平手初期局面の SFEN
pub const STARTPOS_SFEN: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

const BACK_RANK: [PieceType; 9] = [
    PieceType::Lance,
    PieceType::Knight,
    PieceType::Silver,
    PieceType::Gold,
    PieceType::King,
    PieceType::Gold,
    PieceType::Silver,
    PieceType::Knight,
    PieceType::Lance,
];

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Piece>; Square::NUM],
    hands: [Hand; Color::NUM],
}

impl Board {
    /// 駒のない盤
    pub fn empty() -> Self {
        Self {
            cells: [None; Square::NUM],
            hands: [Hand::new(Color::Black), Hand::new(Color::White)],
        }
    }

    /// 平手初期局面
    pub fn startpos() -> Self {
        let mut board = Self::empty();
        for (file, pt) in (1..=9).zip(BACK_RANK) {
            board.set(file, 1, Piece::new(pt, Color::White));
            board.set(file, 9, Piece::new(pt, Color::Black));
        }
        for file in 1..=9 {
            board.set(file, 3, Piece::new(PieceType::Pawn, Color::White));
            board.set(file, 7, Piece::new(PieceType::Pawn, Color::Black));
        }
        // 後手: 8二飛・2二角 / 先手: 2八飛・8八角
        board.set(8, 2, Piece::new(PieceType::Rook, Color::White));
        board.set(2, 2, Piece::new(PieceType::Bishop, Color::White));
        board.set(2, 8, Piece::new(PieceType::Rook, Color::Black));
        board.set(8, 8, Piece::new(PieceType::Bishop, Color::Black));
        board
    }

    fn set(&mut self, file: u8, rank: u8, piece: Piece) {
        if let Some(sq) = Square::new(file, rank) {
            self.cells[sq.index()] = Some(piece);
        }
    }

    /// 升の駒
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()]
    }

    #[inline]
    pub(crate) fn piece_at_mut(&mut self, sq: Square) -> Option<&mut Piece> {
        self.cells[sq.index()].as_mut()
    }

    /// 空き升に駒を置く
    pub fn place(&mut self, sq: Square, piece: Piece) -> Result<(), InvariantViolation> {
        let cell = &mut self.cells[sq.index()];
        if cell.is_some() {
            return Err(InvariantViolation::Occupied(sq));
        }
        *cell = Some(piece);
        Ok(())
    }

    /// 升の駒を取り除いて返す
    pub fn remove(&mut self, sq: Square) -> Result<Piece, InvariantViolation> {
        self.cells[sq.index()].take().ok_or(InvariantViolation::EmptySquare(sq))
    }

    #[inline]
    pub fn hand(&self, color: Color) -> &Hand {
        &self.hands[color.index()]
    }

    #[inline]
    pub fn hand_mut(&mut self, color: Color) -> &mut Hand {
        &mut self.hands[color.index()]
    }

    /// 盤上の駒を (升, 駒) で列挙
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// 盤上の駒数
    pub fn board_piece_count(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    /// 盤上と両者の持ち駒の合計
    pub fn piece_count(&self) -> usize {
        self.board_piece_count() + self.hands.iter().map(Hand::total).sum::<usize>()
    }

    /// SFEN 文字列に変換
    pub fn to_sfen(&self, side_to_move: Color, ply: u32) -> String {
        let mut out = String::new();
        for rank in 1..=9u8 {
            let mut empty = 0u8;
            for file in (1..=9u8).rev() {
                let piece = Square::new(file, rank).and_then(|sq| self.piece_at(sq));
                match piece {
                    Some(p) => {
                        if empty > 0 {
                            let _ = write!(out, "{empty}");
                            empty = 0;
                        }
                        out.push_str(&p.to_sfen());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                let _ = write!(out, "{empty}");
            }
            if rank != 9 {
                out.push('/');
            }
        }
        out.push(' ');
        out.push(match side_to_move {
            Color::Black => 'b',
            Color::White => 'w',
        });
        out.push(' ');
        let hands = format!(
            "{}{}",
            self.hand(Color::Black).to_sfen(),
            self.hand(Color::White).to_sfen()
        );
        if hands.is_empty() {
            out.push('-');
        } else {
            out.push_str(&hands);
        }
        let _ = write!(out, " {ply}");
        out
    }
}
