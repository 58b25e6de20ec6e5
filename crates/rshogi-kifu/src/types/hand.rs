//! 手駒（Hand）

use super::{Color, Piece, PieceType};
use crate::error::{ExecuteError, InvariantViolation};

/// 手駒（駒種ごとの枚数）
///
/// 同種の駒は区別しない多重集合。玉は持てない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hand {
    owner: Color,
    counts: [u8; PieceType::HAND_NUM],
}

impl Hand {
    /// 空の手駒
    pub const fn new(owner: Color) -> Self {
        Self {
            owner,
            counts: [0; PieceType::HAND_NUM],
        }
    }

    /// 持ち主
    #[inline]
    pub const fn owner(&self) -> Color {
        self.owner
    }

    /// 指定駒種の枚数を取得
    #[inline]
    pub fn count(&self, pt: PieceType) -> u32 {
        pt.hand_index().map_or(0, |i| u32::from(self.counts[i]))
    }

    /// 指定駒種を持っているか
    #[inline]
    pub fn has(&self, pt: PieceType) -> bool {
        self.count(pt) > 0
    }

    /// 全駒種の合計枚数
    pub fn total(&self) -> usize {
        self.counts.iter().map(|&n| usize::from(n)).sum()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&n| n == 0)
    }

    /// 1枚追加（成りは解除される）
    pub fn add(&mut self, piece: Piece) -> Result<(), InvariantViolation> {
        let i = piece.piece_type.hand_index().ok_or(InvariantViolation::KingInHand)?;
        self.counts[i] += 1;
        Ok(())
    }

    /// 1枚取り出す。持ち主の生駒として返る。
    pub fn take_one(&mut self, pt: PieceType) -> Result<Piece, ExecuteError> {
        let missing = ExecuteError::NoSuchPieceInHand {
            color: self.owner,
            piece_type: pt,
        };
        let Some(i) = pt.hand_index() else {
            return Err(missing);
        };
        if self.counts[i] == 0 {
            return Err(missing);
        }
        self.counts[i] -= 1;
        Ok(Piece::new(pt, self.owner))
    }

    /// (駒種, 枚数) を HAND_PIECES の順に返す（0枚も含む）
    pub fn iter(&self) -> impl Iterator<Item = (PieceType, u32)> + '_ {
        PieceType::HAND_PIECES.iter().map(move |&pt| (pt, self.count(pt)))
    }

    /// SFEN の持ち駒部分（飛角金銀桂香歩の順、枚数 2 以上は前置）
    pub fn to_sfen(&self) -> String {
        let mut out = String::new();
        for pt in PieceType::HAND_PIECES.iter().rev() {
            let n = self.count(*pt);
            if n == 0 {
                continue;
            }
            if n > 1 {
                out.push_str(&n.to_string());
            }
            let c = pt.sfen_char();
            out.push(match self.owner {
                Color::Black => c,
                Color::White => c.to_ascii_lowercase(),
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_empty() {
        let hand = Hand::new(Color::Black);
        assert!(hand.is_empty());
        assert_eq!(hand.total(), 0);
        assert_eq!(hand.count(PieceType::Pawn), 0);
        assert!(!hand.has(PieceType::Pawn));
    }

    #[test]
    fn test_hand_add_clears_promotion() {
        let mut hand = Hand::new(Color::Black);
        let mut p = Piece::new(PieceType::Pawn, Color::Black);
        assert!(p.promote());
        hand.add(p).unwrap();
        let taken = hand.take_one(PieceType::Pawn).unwrap();
        assert!(!taken.promoted);
        assert_eq!(taken.color, Color::Black);
    }

    #[test]
    fn test_hand_counts_identical_pieces_separately() {
        let mut hand = Hand::new(Color::White);
        let p = Piece::new(PieceType::Pawn, Color::White);
        hand.add(p).unwrap();
        hand.add(p).unwrap();
        assert_eq!(hand.count(PieceType::Pawn), 2);

        hand.take_one(PieceType::Pawn).unwrap();
        assert_eq!(hand.count(PieceType::Pawn), 1);
        hand.take_one(PieceType::Pawn).unwrap();
        assert!(hand.is_empty());
    }

    #[test]
    fn test_hand_take_one_missing() {
        let mut hand = Hand::new(Color::White);
        let err = hand.take_one(PieceType::Knight).unwrap_err();
        assert_eq!(
            err,
            ExecuteError::NoSuchPieceInHand {
                color: Color::White,
                piece_type: PieceType::Knight,
            }
        );
        assert!(hand.is_empty());
    }

    #[test]
    fn test_hand_rejects_king() {
        let mut hand = Hand::new(Color::Black);
        let err = hand.add(Piece::new(PieceType::King, Color::Black)).unwrap_err();
        assert_eq!(err, InvariantViolation::KingInHand);
        assert!(hand.is_empty());
        assert!(hand.take_one(PieceType::King).is_err());
    }

    #[test]
    fn test_hand_to_sfen() {
        let mut hand = Hand::new(Color::Black);
        for pt in [PieceType::Pawn, PieceType::Pawn, PieceType::Rook, PieceType::Silver] {
            hand.add(Piece::new(pt, Color::Black)).unwrap();
        }
        assert_eq!(hand.to_sfen(), "RS2P");

        let mut hand = Hand::new(Color::White);
        hand.add(Piece::new(PieceType::Bishop, Color::White)).unwrap();
        assert_eq!(hand.to_sfen(), "b");
    }
}
