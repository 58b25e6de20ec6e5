//! 1局の再生
//!
//! トークン列を順に解読・適用し、手番交代と直前の移動先を管理する。
//! 1手ごとの結果は [`PlyCollector`] に渡す。失敗した時点でその局の再生は打ち切る。

use crate::board::Board;
use crate::error::{InvariantViolation, ReplayError, ReplayErrorKind};
use crate::executor::apply;
use crate::notation::{HepburnReader, NotationDecoder, PhoneticReader};
use crate::types::{Color, Move, Square};

/// 再生器の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    /// 次の指し手待ち
    AwaitingMove,
    /// トークン列を使い切った
    Done,
    /// 解読・適用に失敗した
    Failed,
}

/// 1手分の結果（盤面は参照）
#[derive(Debug, Clone, Copy)]
pub struct PlyRecord<'a> {
    /// 1 始まりの手数
    pub ply: usize,
    /// この手を指した側
    pub side: Color,
    pub mv: Move,
    /// 実際の移動先
    pub dest: Square,
    /// 適用後の盤面
    pub board: &'a Board,
}

/// [`PlyRecord`] の所有版
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedPly {
    pub ply: usize,
    pub side: Color,
    pub mv: Move,
    pub dest: Square,
    pub board: Board,
}

impl From<&PlyRecord<'_>> for OwnedPly {
    fn from(record: &PlyRecord<'_>) -> Self {
        Self {
            ply: record.ply,
            side: record.side,
            mv: record.mv,
            dest: record.dest,
            board: record.board.clone(),
        }
    }
}

/// 1手ごとの結果の受け取り手
pub trait PlyCollector {
    fn on_ply(&mut self, record: &PlyRecord<'_>);
}

impl<F> PlyCollector for F
where
    F: FnMut(&PlyRecord<'_>),
{
    fn on_ply(&mut self, record: &PlyRecord<'_>) {
        self(record)
    }
}

impl PlyCollector for Vec<OwnedPly> {
    fn on_ply(&mut self, record: &PlyRecord<'_>) {
        self.push(OwnedPly::from(record));
    }
}

/// 結果を捨てる
impl PlyCollector for () {
    fn on_ply(&mut self, _record: &PlyRecord<'_>) {}
}

/// 再生完了時の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// 適用した手数
    pub plies: usize,
    /// 最終局面（両者の持ち駒を含む）
    pub board: Board,
    pub side_to_move: Color,
    /// 最後の手の移動先
    pub last_dest: Option<Square>,
}

/// 1局分の再生器
///
/// 盤面はこの再生器だけが所有し、他の局とは共有しない。
#[derive(Debug, Clone)]
pub struct GameReplayer<R = HepburnReader> {
    decoder: NotationDecoder<R>,
    board: Board,
    side: Color,
    prev_dest: Option<Square>,
    plies: usize,
    expected_total: usize,
    state: ReplayState,
}

impl<R: PhoneticReader> GameReplayer<R> {
    /// 平手初期局面・先手番から始める
    pub fn new(decoder: NotationDecoder<R>) -> Self {
        Self::with_board(decoder, Board::startpos(), Color::Black)
    }

    /// 任意の局面から始める。駒数の検査はこの局面の合計枚数を基準にする。
    pub fn with_board(decoder: NotationDecoder<R>, board: Board, side_to_move: Color) -> Self {
        let expected_total = board.piece_count();
        Self {
            decoder,
            board,
            side: side_to_move,
            prev_dest: None,
            plies: 0,
            expected_total,
            state: ReplayState::AwaitingMove,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side
    }

    pub fn prev_dest(&self) -> Option<Square> {
        self.prev_dest
    }

    /// 適用済みの手数
    pub fn plies(&self) -> usize {
        self.plies
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    /// 1手進める。実際の移動先を返す。
    pub fn step<C>(&mut self, token: &str, collector: &mut C) -> Result<Square, ReplayError>
    where
        C: PlyCollector + ?Sized,
    {
        let ply = self.plies + 1;
        if self.state != ReplayState::AwaitingMove {
            return Err(self.error(ply, token, ReplayErrorKind::Halted));
        }

        let mv = match self.decoder.decode(token, self.prev_dest) {
            Ok(mv) => mv,
            Err(e) => return Err(self.fail(ply, token, e.into())),
        };
        let dest = match apply(&mut self.board, self.side, &mv, self.prev_dest) {
            Ok(dest) => dest,
            Err(e) => return Err(self.fail(ply, token, e.into())),
        };
        let actual = self.board.piece_count();
        if actual != self.expected_total {
            let drift = InvariantViolation::PieceCountDrift {
                expected: self.expected_total,
                actual,
            };
            return Err(self.fail(ply, token, ReplayErrorKind::Execute(drift.into())));
        }

        let side = self.side;
        self.plies = ply;
        self.prev_dest = Some(dest);
        self.side = !side;
        collector.on_ply(&PlyRecord {
            ply,
            side,
            mv,
            dest,
            board: &self.board,
        });
        Ok(dest)
    }

    /// トークン列を最後まで再生する
    pub fn replay<I, S, C>(mut self, tokens: I, collector: &mut C) -> Result<ReplayOutcome, ReplayError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        C: PlyCollector + ?Sized,
    {
        for token in tokens {
            self.step(token.as_ref(), collector)?;
        }
        self.finish()
    }

    /// 再生を終えて最終局面を取り出す
    pub fn finish(mut self) -> Result<ReplayOutcome, ReplayError> {
        if self.state == ReplayState::Failed {
            return Err(self.error(self.plies + 1, "", ReplayErrorKind::Halted));
        }
        self.state = ReplayState::Done;
        log::debug!(
            "replay done: {} plies, {} to move, last dest {:?}",
            self.plies,
            self.side,
            self.prev_dest.map(|sq| sq.to_string())
        );
        Ok(ReplayOutcome {
            plies: self.plies,
            board: self.board,
            side_to_move: self.side,
            last_dest: self.prev_dest,
        })
    }

    fn fail(&mut self, ply: usize, token: &str, kind: ReplayErrorKind) -> ReplayError {
        self.state = ReplayState::Failed;
        let err = self.error(ply, token, kind);
        log::debug!("replay aborted: {err}");
        err
    }

    fn error(&self, ply: usize, token: &str, kind: ReplayErrorKind) -> ReplayError {
        ReplayError {
            ply,
            token: token.to_string(),
            side: self.side,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, ExecuteError};
    use crate::types::{Piece, PieceType};

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(file, rank).unwrap()
    }

    fn replayer() -> GameReplayer {
        GameReplayer::new(NotationDecoder::new(HepburnReader))
    }

    #[test]
    fn test_step_alternates_side_and_tracks_dest() {
        let mut r = replayer();
        let mut sides = Vec::new();
        let mut collect = |rec: &PlyRecord<'_>| sides.push((rec.ply, rec.side, rec.dest));

        assert_eq!(r.step("７六歩(77)", &mut collect), Ok(sq(7, 6)));
        assert_eq!(r.step("３四歩(33)", &mut collect), Ok(sq(3, 4)));
        assert_eq!(r.side_to_move(), Color::Black);
        assert_eq!(r.prev_dest(), Some(sq(3, 4)));
        assert_eq!(r.plies(), 2);
        assert_eq!(r.state(), ReplayState::AwaitingMove);
        assert_eq!(sides, vec![(1, Color::Black, sq(7, 6)), (2, Color::White, sq(3, 4))]);
    }

    #[test]
    fn test_recapture_resolves_to_previous_ply() {
        let tokens = ["７六歩(77)", "３四歩(33)", "２二角成(88)", "同　銀(31)"];
        let mut plies: Vec<OwnedPly> = Vec::new();
        let outcome = replayer().replay(tokens, &mut plies).unwrap();

        assert_eq!(plies.len(), 4);
        assert!(plies[3].mv.recapture);
        assert_eq!(plies[3].dest, plies[2].dest);
        assert_eq!(outcome.last_dest, Some(sq(2, 2)));
        assert_eq!(
            outcome.board.piece_at(sq(2, 2)),
            Some(Piece::new(PieceType::Silver, Color::White))
        );
        assert_eq!(outcome.board.hand(Color::White).count(PieceType::Bishop), 1);
        assert_eq!(outcome.board.hand(Color::Black).count(PieceType::Bishop), 1);
    }

    #[test]
    fn test_decode_failure_aborts_with_context() {
        let mut r = replayer();
        r.step("７六歩(77)", &mut |_: &PlyRecord<'_>| {}).unwrap();
        let err = r.step("３?歩(33)", &mut |_: &PlyRecord<'_>| {}).unwrap_err();
        assert_eq!(err.ply, 2);
        assert_eq!(err.side, Color::White);
        assert_eq!(err.token, "３?歩(33)");
        assert_eq!(
            err.kind,
            ReplayErrorKind::Decode(DecodeError::Unreadable { position: 1, element: '?' })
        );
        assert_eq!(r.state(), ReplayState::Failed);

        // 失敗後は進まない
        let err = r.step("３四歩(33)", &mut |_: &PlyRecord<'_>| {}).unwrap_err();
        assert_eq!(err.kind, ReplayErrorKind::Halted);
        assert_eq!(r.plies(), 1);
        assert!(r.finish().is_err());
    }

    #[test]
    fn test_missing_hand_piece_aborts() {
        let tokens = ["７六歩(77)", "５五角打"];
        let err = replayer().replay(tokens, &mut Vec::<OwnedPly>::new()).unwrap_err();
        assert_eq!(err.ply, 2);
        assert_eq!(
            err.kind,
            ReplayErrorKind::Execute(ExecuteError::NoSuchPieceInHand {
                color: Color::White,
                piece_type: PieceType::Bishop,
            })
        );
    }

    #[test]
    fn test_first_ply_recapture_is_a_decode_error() {
        let err = replayer().replay(["同　歩(77)"], &mut Vec::<OwnedPly>::new()).unwrap_err();
        assert_eq!(err.ply, 1);
        assert_eq!(err.kind, ReplayErrorKind::Decode(DecodeError::MissingPreviousDestination));
    }

    #[test]
    fn test_empty_game_is_done() {
        let outcome = replayer().replay(Vec::<String>::new(), &mut ()).unwrap();
        assert_eq!(outcome.plies, 0);
        assert_eq!(outcome.board, Board::startpos());
        assert_eq!(outcome.side_to_move, Color::Black);
        assert_eq!(outcome.last_dest, None);
    }

    #[test]
    fn test_with_board_uses_custom_total() {
        let mut board = Board::empty();
        board.place(sq(5, 9), Piece::new(PieceType::King, Color::Black)).unwrap();
        board.place(sq(5, 1), Piece::new(PieceType::King, Color::White)).unwrap();
        board.hand_mut(Color::White).add(Piece::new(PieceType::Gold, Color::White)).unwrap();

        let r = GameReplayer::with_board(NotationDecoder::new(HepburnReader), board, Color::White);
        let outcome = r.replay(["５二金打"], &mut Vec::<OwnedPly>::new()).unwrap();
        assert_eq!(outcome.board.piece_count(), 3);
        assert_eq!(outcome.side_to_move, Color::Black);
        assert_eq!(
            outcome.board.piece_at(sq(5, 2)),
            Some(Piece::new(PieceType::Gold, Color::White))
        );
    }
}
