//! 読みの閉じた列挙
//!
//! 読み文字列からの変換は全て網羅 `match` で行い、表に無い読みは None を返す。
//! 既定値で埋めることはしない。

use crate::types::PieceType;

/// 「同」（直前の移動先と同じ升）の読み
pub const SAME_SQUARE: &str = "dou";

/// 先頭要素
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lead {
    /// 同
    SameSquare,
    /// 移動先の筋（1-9）
    Column(u8),
}

impl Lead {
    pub fn from_reading(reading: &str) -> Option<Self> {
        if reading == SAME_SQUARE {
            return Some(Lead::SameSquare);
        }
        let column = match reading {
            "1" => 1,
            "2" => 2,
            "3" => 3,
            "4" => 4,
            "5" => 5,
            "6" => 6,
            "7" => 7,
            "8" => 8,
            "9" => 9,
            _ => return None,
        };
        Some(Lead::Column(column))
    }
}

/// 段の読み（漢数字）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowReading {
    Ichi,
    Ni,
    San,
    Shi,
    Go,
    Roku,
    Shichi,
    Hachi,
    Kyuu,
}

impl RowReading {
    pub fn from_reading(reading: &str) -> Option<Self> {
        let row = match reading {
            "ichi" => RowReading::Ichi,
            "ni" => RowReading::Ni,
            "san" => RowReading::San,
            "shi" => RowReading::Shi,
            "go" => RowReading::Go,
            "roku" => RowReading::Roku,
            "shichi" => RowReading::Shichi,
            "hachi" => RowReading::Hachi,
            "kyuu" => RowReading::Kyuu,
            _ => return None,
        };
        Some(row)
    }

    /// 段（1-9）
    pub const fn rank(self) -> u8 {
        match self {
            RowReading::Ichi => 1,
            RowReading::Ni => 2,
            RowReading::San => 3,
            RowReading::Shi => 4,
            RowReading::Go => 5,
            RowReading::Roku => 6,
            RowReading::Shichi => 7,
            RowReading::Hachi => 8,
            RowReading::Kyuu => 9,
        }
    }
}

/// 打つ駒の名前の読み。玉は打てないので含まない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceReading {
    Ho,
    Kaori,
    Katsura,
    Gin,
    Kin,
    Kaku,
    Hi,
}

impl PieceReading {
    pub fn from_reading(reading: &str) -> Option<Self> {
        let piece = match reading {
            "ho" => PieceReading::Ho,
            "kaori" => PieceReading::Kaori,
            "katsura" => PieceReading::Katsura,
            "gin" => PieceReading::Gin,
            "kin" => PieceReading::Kin,
            "kaku" => PieceReading::Kaku,
            "hi" => PieceReading::Hi,
            _ => return None,
        };
        Some(piece)
    }

    pub const fn piece_type(self) -> PieceType {
        match self {
            PieceReading::Ho => PieceType::Pawn,
            PieceReading::Kaori => PieceType::Lance,
            PieceReading::Katsura => PieceType::Knight,
            PieceReading::Gin => PieceType::Silver,
            PieceReading::Kin => PieceType::Gold,
            PieceReading::Kaku => PieceType::Bishop,
            PieceReading::Hi => PieceType::Rook,
        }
    }
}

/// 修飾語（打・成・どちらでもない）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    Drop,
    Promote,
    Plain,
}

impl Qualifier {
    /// 読めない要素・他の読みは Plain
    pub fn from_reading(reading: Option<&str>) -> Self {
        match reading {
            Some("da") => Qualifier::Drop,
            Some("sei") => Qualifier::Promote,
            _ => Qualifier::Plain,
        }
    }
}
