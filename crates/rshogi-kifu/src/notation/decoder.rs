//! 指し手トークンの解読器
//!
//! トークンの並び（例: `７六歩(77)`, `同　角成(45)`, `３三桂打`）:
//!
//! | 位置        | 内容                                            |
//! |-------------|-------------------------------------------------|
//! | 0           | 筋（数字）または「同」                          |
//! | 1           | 段（漢数字）。「同」のときは読まない            |
//! | 2           | 駒名（打つときだけ読む）                        |
//! | 3           | 修飾語（打 / 成 / それ以外）                    |
//! | len-3,len-2 | 移動元の筋・段（数字そのまま、打ち以外で読む）  |

use crate::error::{DecodeError, Field};
use crate::types::{Move, Square};

use super::readings::{Lead, PieceReading, Qualifier, RowReading};
use super::{HepburnReader, PhoneticReader};

const ROW_POS: usize = 1;
const PIECE_POS: usize = 2;
const QUALIFIER_POS: usize = 3;

/// 打ち以外で必要な最小要素数（修飾語の後ろに移動元2桁と閉じ括弧）
const MIN_BOARD_MOVE_LEN: usize = 6;

/// 指し手トークンを [`Move`] に変換する。呼び出しごとに状態を持たない。
#[derive(Debug, Clone, Default)]
pub struct NotationDecoder<R = HepburnReader> {
    reader: R,
}

impl<R: PhoneticReader> NotationDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// 1トークンを解読する
    ///
    /// `prev_dest` は「同」の解決にだけ使う。
    pub fn decode(&self, token: &str, prev_dest: Option<Square>) -> Result<Move, DecodeError> {
        let elements: Vec<char> = token.chars().collect();
        if elements.is_empty() {
            return Err(DecodeError::Empty);
        }
        if elements.len() <= QUALIFIER_POS {
            return Err(DecodeError::Truncated {
                needed: QUALIFIER_POS + 1,
                found: elements.len(),
            });
        }

        let lead = self.read(&elements, 0)?;
        let (dest, recapture) = match Lead::from_reading(lead) {
            Some(Lead::SameSquare) => {
                (prev_dest.ok_or(DecodeError::MissingPreviousDestination)?, true)
            }
            Some(Lead::Column(file)) => (self.destination(&elements, file)?, false),
            None => {
                return Err(DecodeError::UnknownReading {
                    position: 0,
                    field: Field::Column,
                    reading: lead.to_string(),
                });
            }
        };

        let qualifier = Qualifier::from_reading(self.reader.read(elements[QUALIFIER_POS]));
        let mv = match qualifier {
            Qualifier::Drop => {
                let reading = self.read(&elements, PIECE_POS)?;
                let piece = PieceReading::from_reading(reading).ok_or_else(|| {
                    DecodeError::UnknownReading {
                        position: PIECE_POS,
                        field: Field::PieceName,
                        reading: reading.to_string(),
                    }
                })?;
                Move::drop(piece.piece_type(), dest)
            }
            Qualifier::Promote | Qualifier::Plain => {
                let origin = origin_square(&elements)?;
                Move::board(origin, dest, qualifier == Qualifier::Promote)
            }
        };
        let mv = if recapture { mv.with_recapture() } else { mv };

        log::trace!("decoded {token} -> {mv}");
        Ok(mv)
    }

    fn read(&self, elements: &[char], position: usize) -> Result<&str, DecodeError> {
        let element = elements[position];
        self.reader.read(element).ok_or(DecodeError::Unreadable { position, element })
    }

    fn destination(&self, elements: &[char], file: u8) -> Result<Square, DecodeError> {
        let reading = self.read(elements, ROW_POS)?;
        let unknown = || DecodeError::UnknownReading {
            position: ROW_POS,
            field: Field::Row,
            reading: reading.to_string(),
        };
        let row = RowReading::from_reading(reading).ok_or_else(unknown)?;
        Square::new(file, row.rank()).ok_or_else(unknown)
    }
}

/// 末尾の `(77)` から移動元を読む。読み変換はしない。
fn origin_square(elements: &[char]) -> Result<Square, DecodeError> {
    if elements.len() < MIN_BOARD_MOVE_LEN {
        return Err(DecodeError::Truncated {
            needed: MIN_BOARD_MOVE_LEN,
            found: elements.len(),
        });
    }
    let file_pos = elements.len() - 3;
    let rank_pos = elements.len() - 2;
    let file = positional_digit(elements, file_pos)?;
    let rank = positional_digit(elements, rank_pos)?;
    Square::new(file, rank).ok_or(DecodeError::InvalidOriginDigit {
        position: file_pos,
        element: elements[file_pos],
    })
}

fn positional_digit(elements: &[char], position: usize) -> Result<u8, DecodeError> {
    let element = elements[position];
    let digit = match element {
        '1'..='9' => element as u32 - '0' as u32,
        '１'..='９' => element as u32 - '０' as u32,
        _ => return Err(DecodeError::InvalidOriginDigit { position, element }),
    };
    // 1..=9 に収まっている
    Ok(digit as u8)
}
