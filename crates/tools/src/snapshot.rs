//! JSONL 出力レコード
//!
//! 1手ごとに `"type":"ply"`、局の終わりに `"type":"game"` を1行ずつ書く。

use std::collections::BTreeMap;

use rshogi_kifu::{Color, Hand, PieceType, PlyRecord, ReplayOutcome};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Snapshot {
    Ply(PlySnapshot),
    Game(GameSnapshot),
}

/// 1手適用後の局面
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlySnapshot {
    pub game: String,
    pub ply: usize,
    /// この手を指した側（"sente" / "gote"）
    pub side: String,
    /// 実際の移動先（"76"）
    pub dest: String,
    /// 移動元。打ちのときは null
    pub origin: Option<String>,
    /// 打った駒の SFEN 文字
    pub drop_piece: Option<String>,
    pub drop: bool,
    pub promote: bool,
    pub recapture: bool,
    /// 移動先にいる駒の SFEN 文字（先後とも大文字）
    pub piece: Option<String>,
    pub promoted: bool,
    /// 次の手番から見た SFEN
    pub sfen: String,
}

impl PlySnapshot {
    pub fn from_record(game: &str, record: &PlyRecord<'_>) -> Self {
        let placed = record.board.piece_at(record.dest);
        let next_ply = u32::try_from(record.ply + 1).unwrap_or(u32::MAX);
        Self {
            game: game.to_string(),
            ply: record.ply,
            side: record.side.name().to_string(),
            dest: record.dest.to_string(),
            origin: record.mv.origin_square().map(|sq| sq.to_string()),
            drop_piece: record.mv.drop_piece().map(sfen_letter),
            drop: record.mv.is_drop(),
            promote: record.mv.promote,
            recapture: record.mv.recapture,
            piece: placed.map(|p| sfen_letter(p.piece_type)),
            promoted: placed.is_some_and(|p| p.promoted),
            sfen: record.board.to_sfen(!record.side, next_ply),
        }
    }
}

/// 1局の最終局面
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game: String,
    pub plies: usize,
    pub sfen: String,
    /// 駒種の SFEN 文字 → 枚数（0 枚は省く）
    pub black_hand: BTreeMap<String, u32>,
    pub white_hand: BTreeMap<String, u32>,
}

impl GameSnapshot {
    pub fn from_outcome(game: &str, outcome: &ReplayOutcome) -> Self {
        let next_ply = u32::try_from(outcome.plies + 1).unwrap_or(u32::MAX);
        Self {
            game: game.to_string(),
            plies: outcome.plies,
            sfen: outcome.board.to_sfen(outcome.side_to_move, next_ply),
            black_hand: hand_counts(outcome.board.hand(Color::Black)),
            white_hand: hand_counts(outcome.board.hand(Color::White)),
        }
    }
}

fn sfen_letter(pt: PieceType) -> String {
    pt.sfen_char().to_string()
}

fn hand_counts(hand: &Hand) -> BTreeMap<String, u32> {
    hand.iter().filter(|&(_, n)| n > 0).map(|(pt, n)| (sfen_letter(pt), n)).collect()
}
