//! エラー型
//!
//! 解読・適用のどちらの失敗も値として呼び出し側へ返す。
//! 壊れた局面のまま再生を続けることはない。

use std::fmt;

use thiserror::Error;

use crate::types::{Color, PieceType, Square};

/// トークン中の解読対象
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// 移動先の筋
    Column,
    /// 移動先の段
    Row,
    /// 打つ駒の名前
    PieceName,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Column => "column",
            Field::Row => "row",
            Field::PieceName => "piece name",
        })
    }
}

/// 指し手トークンの解読エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty move token")]
    Empty,

    #[error("move token too short: need {needed} elements, found {found}")]
    Truncated { needed: usize, found: usize },

    #[error("element {element:?} at position {position} has no reading")]
    Unreadable { position: usize, element: char },

    #[error("reading {reading:?} at position {position} is not a valid {field}")]
    UnknownReading {
        position: usize,
        field: Field,
        reading: String,
    },

    #[error("element {element:?} at position {position} is not an origin digit 1-9")]
    InvalidOriginDigit { position: usize, element: char },

    #[error("same-square move without a previous destination")]
    MissingPreviousDestination,
}

/// 盤面・持ち駒の不変条件違反
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("square {0} is already occupied")]
    Occupied(Square),

    #[error("square {0} is empty")]
    EmptySquare(Square),

    #[error("no piece to move at {0}")]
    EmptyOrigin(Square),

    #[error("piece at {square} belongs to {owner}, not {side}")]
    ForeignOrigin {
        square: Square,
        owner: Color,
        side: Color,
    },

    #[error("origin and destination are both {0}")]
    NullMove(Square),

    #[error("cannot capture own piece at {0}")]
    CaptureOwnPiece(Square),

    #[error("king at {0} cannot be captured")]
    KingCapture(Square),

    #[error("king at {0} cannot promote")]
    KingPromotion(Square),

    #[error("king cannot be held in hand")]
    KingInHand,

    #[error("same-square move without a previous destination")]
    MissingPreviousDestination,

    #[error("piece count drifted: expected {expected}, found {actual}")]
    PieceCountDrift { expected: usize, actual: usize },
}

/// 指し手適用のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecuteError {
    #[error("no {piece_type:?} in {color} hand")]
    NoSuchPieceInHand { color: Color, piece_type: PieceType },

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// 再生失敗の種別
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayErrorKind {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("apply failed: {0}")]
    Execute(#[from] ExecuteError),

    /// 終了済み（Done/Failed）の再生器に指し手が渡された
    #[error("replay already finished")]
    Halted,
}

/// 1局の再生エラー（手数・トークン付き）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ply {ply} ({side}) token {token:?}: {kind}")]
pub struct ReplayError {
    /// 1 始まりの手数
    pub ply: usize,
    pub token: String,
    pub side: Color,
    pub kind: ReplayErrorKind,
}

/// 読みテーブル構築エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadingTableError {
    #[error("reading key {0:?} must be exactly one element")]
    NotSingleElement(String),

    #[error("reading for {0:?} is empty")]
    EmptyReading(char),
}
