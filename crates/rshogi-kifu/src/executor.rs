//! 指し手の適用
//!
//! 検査を全て済ませてから盤面を書き換える。失敗した呼び出しは盤面・持ち駒を一切変えない。
//! 利き・王手・二歩などの合法性は見ない。

use crate::board::Board;
use crate::error::{ExecuteError, InvariantViolation};
use crate::types::{Color, Move, Origin, PieceType, Square};

/// `side` の指し手 `mv` を `board` に適用し、実際の移動先を返す
///
/// 「同」の手は `mv.dest` ではなく `prev_dest` に動かす。
pub fn apply(
    board: &mut Board,
    side: Color,
    mv: &Move,
    prev_dest: Option<Square>,
) -> Result<Square, ExecuteError> {
    match mv.origin {
        Origin::Hand(pt) => apply_drop(board, side, pt, mv.dest),
        Origin::Board(from) => {
            let to = if mv.recapture {
                prev_dest.ok_or(InvariantViolation::MissingPreviousDestination)?
            } else {
                mv.dest
            };
            apply_board_move(board, side, from, to, mv.promote)
        }
    }
}

fn apply_drop(
    board: &mut Board,
    side: Color,
    pt: PieceType,
    to: Square,
) -> Result<Square, ExecuteError> {
    if board.piece_at(to).is_some() {
        return Err(InvariantViolation::Occupied(to).into());
    }
    let piece = board.hand_mut(side).take_one(pt)?;
    board.place(to, piece)?;
    Ok(to)
}

fn apply_board_move(
    board: &mut Board,
    side: Color,
    from: Square,
    to: Square,
    promote: bool,
) -> Result<Square, ExecuteError> {
    let moving = board.piece_at(from).ok_or(InvariantViolation::EmptyOrigin(from))?;
    if moving.color != side {
        return Err(InvariantViolation::ForeignOrigin {
            square: from,
            owner: moving.color,
            side,
        }
        .into());
    }
    if from == to {
        return Err(InvariantViolation::NullMove(from).into());
    }
    if promote && moving.piece_type == PieceType::King {
        return Err(InvariantViolation::KingPromotion(from).into());
    }
    if let Some(target) = board.piece_at(to) {
        if target.color == side {
            return Err(InvariantViolation::CaptureOwnPiece(to).into());
        }
        if target.piece_type == PieceType::King {
            return Err(InvariantViolation::KingCapture(to).into());
        }
    }

    if let Some(target) = board.piece_at(to) {
        board.remove(to)?;
        board.hand_mut(side).add(target.captured_by(side))?;
    }
    let piece = board.remove(from)?;
    board.place(to, piece)?;
    if promote {
        if let Some(p) = board.piece_at_mut(to) {
            // 玉は上で弾いている
            let _ = p.promote();
        }
    }
    Ok(to)
}
