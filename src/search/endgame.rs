use cozy_chess::{Color, Move, Piece, Square};
use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::error::{EngineError, Result};
use crate::search::eval::Score;

/// At or below this many pieces (kings included) the position counts as an endgame.
pub const ENDGAME_PIECE_LIMIT: usize = 10;
pub const MATE_PATTERN_BONUS: Score = 500;
pub const CHECK_PATTERN_BONUS: Score = 200;
pub const CENTER_PRESENCE_BONUS: Score = 50;

const CENTER: [Square; 4] = [Square::D4, Square::E4, Square::D5, Square::E5];

/// A known mating configuration, e.g. `KRK` for king and rook against king.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndgamePattern {
    pub name: String,
    pub pieces: String,
}

fn piece_from_letter(c: char) -> Option<Piece> {
    match c.to_ascii_uppercase() {
        'P' => Some(Piece::Pawn),
        'N' => Some(Piece::Knight),
        'B' => Some(Piece::Bishop),
        'R' => Some(Piece::Rook),
        'Q' => Some(Piece::Queen),
        'K' => Some(Piece::King),
        _ => None,
    }
}

impl EndgamePattern {
    pub fn new(name: &str, pieces: &str) -> Self {
        Self { name: name.to_string(), pieces: pieces.to_string() }
    }

    pub fn piece_set(&self) -> Result<Vec<Piece>> {
        self.pieces
            .chars()
            .map(|c| piece_from_letter(c).ok_or_else(|| EngineError::BadPatternPiece { pattern: self.name.clone(), letter: c }))
            .collect()
    }

    /// True if the board holds at least the pattern's pieces, colors ignored.
    pub fn matches(&self, pos: &Position) -> bool {
        let Ok(wanted) = self.piece_set() else { return false };
        let board = pos.board();
        wanted.iter().all(|&p| {
            let need = wanted.iter().filter(|&&q| q == p).count();
            board.pieces(p).into_iter().count() >= need
        })
    }
}

pub fn king_rook_king() -> EndgamePattern { EndgamePattern::new("king_rook_king", "KRK") }
pub fn king_queen_king() -> EndgamePattern { EndgamePattern::new("king_queen_king", "KQK") }
pub fn king_two_bishops_king() -> EndgamePattern { EndgamePattern::new("king_two_bishops_king", "KBBK") }
pub fn king_bishop_knight_king() -> EndgamePattern { EndgamePattern::new("king_bishop_knight_king", "KBNK") }

pub fn patterns_for(difficulty: crate::config::Difficulty) -> Vec<EndgamePattern> {
    use crate::config::Difficulty::*;
    match difficulty {
        Easy => vec![king_rook_king(), king_queen_king()],
        Intermediate => vec![king_rook_king(), king_queen_king(), king_two_bishops_king()],
        Hard => vec![king_rook_king(), king_queen_king(), king_two_bishops_king(), king_bishop_knight_king()],
    }
}

pub fn is_endgame(pos: &Position) -> bool { pos.piece_count() <= ENDGAME_PIECE_LIMIT }

fn black_center_pieces(pos: &Position) -> Score {
    CENTER.iter().filter(|&&sq| matches!(pos.piece_at(sq), Some((_, Color::Black)))).count() as Score
}

/// Root-only bonus for playing `mv` from `pos` once material is sparse.
///
/// Each pattern replays `mv` on its own detached copy, so `pos` is never
/// touched. A move that is illegal in the copy contributes nothing for that
/// pattern.
pub fn bonus(pos: &Position, mv: Move, patterns: &[EndgamePattern]) -> Score {
    if !is_endgame(pos) { return 0; }
    let mut total = 0;
    for pattern in patterns {
        let mut sim = pos.detached();
        if sim.play(mv).is_err() { continue; }
        if sim.is_checkmate() {
            total += MATE_PATTERN_BONUS;
        } else if sim.in_check() {
            total += CHECK_PATTERN_BONUS;
        }
        total += CENTER_PRESENCE_BONUS * black_center_pieces(&sim);
        if pattern.matches(&sim) {
            log::trace!("endgame pattern {} present after {}", pattern.name, pos.to_uci(mv));
        }
    }
    total
}
