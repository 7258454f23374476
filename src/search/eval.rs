use cozy_chess::{Color, Piece, Square};
use serde::{Deserialize, Serialize};

use crate::board::Position;

pub type Score = i32;

pub const PAWN: Score = 100;
pub const KNIGHT: Score = 320;
pub const BISHOP: Score = 330;
pub const ROOK: Score = 500;
pub const QUEEN: Score = 900;
pub const KING: Score = 20_000;

pub const CHECK_BONUS: Score = 50;
pub const CHECKMATE_BONUS: Score = 10_000;

const PIECES: [Piece; 6] = [Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King];

// Rows are ranks counted from the owner's back rank, columns are files a..h.
const PAWN_TABLE: [[Score; 8]; 8] = [
    [  0,   0,   0,   0,   0,   0,   0,   0],
    [  5,  10,  10, -20, -20,  10,  10,   5],
    [  5,  -5, -10,   0,   0, -10,  -5,   5],
    [  0,   0,   0,  20,  20,   0,   0,   0],
    [  5,   5,  10,  25,  25,  10,   5,   5],
    [ 10,  10,  20,  30,  30,  20,  10,  10],
    [ 50,  50,  50,  50,  50,  50,  50,  50],
    [  0,   0,   0,   0,   0,   0,   0,   0],
];

/// How the check and checkmate terms are signed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalBonus {
    /// Always positive, whichever side is in check or mated.
    #[default]
    Flat,
    /// Credited to the side delivering the check or mate.
    SideAdjusted,
}

pub fn piece_value(piece: Piece) -> Score {
    match piece {
        Piece::Pawn => PAWN,
        Piece::Knight => KNIGHT,
        Piece::Bishop => BISHOP,
        Piece::Rook => ROOK,
        Piece::Queen => QUEEN,
        Piece::King => KING,
    }
}

#[inline]
fn sign(color: Color) -> Score {
    if color == Color::White { 1 } else { -1 }
}

pub fn pawn_square_bonus(sq: Square, color: Color) -> Score {
    let rank = sq.rank() as usize;
    let own_rank = if color == Color::White { rank } else { 7 - rank };
    PAWN_TABLE[own_rank][sq.file() as usize]
}

// Material plus pawn placement; positive means White is better.
pub fn static_eval_cp(pos: &Position) -> Score {
    let board = pos.board();
    let mut score = 0;
    for color in [Color::White, Color::Black] {
        let s = sign(color);
        for piece in PIECES {
            for sq in board.colors(color) & board.pieces(piece) {
                score += s * piece_value(piece);
                if piece == Piece::Pawn { score += s * pawn_square_bonus(sq, color); }
            }
        }
    }
    score
}

pub fn evaluate(pos: &Position) -> Score {
    evaluate_with(pos, TerminalBonus::Flat)
}

pub fn evaluate_with(pos: &Position, policy: TerminalBonus) -> Score {
    let mut score = static_eval_cp(pos);
    if pos.in_check() {
        let s = match policy {
            TerminalBonus::Flat => 1,
            // the side to move is the one in check
            TerminalBonus::SideAdjusted => -sign(pos.side_to_move()),
        };
        score += s * CHECK_BONUS;
        if !pos.has_legal_moves() { score += s * CHECKMATE_BONUS; }
    }
    score
}
