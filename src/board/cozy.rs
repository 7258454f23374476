use std::ops::{Deref, DerefMut};

use cozy_chess::{Board as CozyBoard, Color, File, Move, Piece, Square};
use serde::Serialize;

use crate::error::{EngineError, Result};

/// Terminal-state flags reported to the host after every ply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GameStatus {
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    pub draw: bool,
    pub game_over: bool,
}

/// Live game position: a cozy-chess board plus the stack of boards it came
/// from, so moves can be undone in reverse order of application.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
    stack: Vec<CozyBoard>,
}

impl Default for Position {
    fn default() -> Self { Self::startpos() }
}

impl Position {
    pub fn startpos() -> Self {
        Self::from_board(CozyBoard::default())
    }

    pub fn from_board(board: CozyBoard) -> Self {
        Self { board, stack: Vec::with_capacity(128) }
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        CozyBoard::from_fen(fen, false)
            .map(Self::from_board)
            .map_err(|e| EngineError::InvalidFen { fen: fen.to_string(), reason: format!("{e:?}") })
    }

    pub fn fen(&self) -> String { format!("{}", self.board) }

    pub fn board(&self) -> &CozyBoard { &self.board }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    /// Number of plies applied since this position was created.
    pub fn ply_count(&self) -> usize { self.stack.len() }

    /// Legal moves in cozy-chess generation order. Root tie-breaking depends on
    /// this order, so callers must not reorder it.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.board.generate_moves(|ml| {
            for m in ml { moves.push(m); }
            false
        });
        moves
    }

    pub fn has_legal_moves(&self) -> bool {
        let mut any = false;
        self.board.generate_moves(|ml| {
            if !ml.is_empty() { any = true; }
            any
        });
        any
    }

    pub fn is_legal(&self, mv: Move) -> bool { self.legal_moves().contains(&mv) }

    pub fn play(&mut self, mv: Move) -> Result<()> {
        if !self.is_legal(mv) {
            return Err(EngineError::IllegalMove(self.to_uci(mv)));
        }
        self.push(mv);
        Ok(())
    }

    pub fn play_uci(&mut self, uci: &str) -> Result<Move> {
        let mv = self.parse_uci(uci).ok_or_else(|| EngineError::IllegalMove(uci.to_string()))?;
        self.push(mv);
        Ok(mv)
    }

    /// Reverts the most recently applied move. Returns false on an empty history.
    pub fn undo(&mut self) -> bool {
        match self.stack.pop() {
            Some(prev) => { self.board = prev; true }
            None => false,
        }
    }

    /// Applies `mv` for the lifetime of the returned guard; dropping the guard
    /// undoes it. `mv` must come from `legal_moves()` of this position.
    pub fn scoped(&mut self, mv: Move) -> MoveGuard<'_> {
        self.push(mv);
        MoveGuard { pos: self }
    }

    /// Independent copy of the current board with no history attached.
    pub fn detached(&self) -> Self { Self::from_board(self.board.clone()) }

    // `mv` must be legal here; cozy-chess panics otherwise.
    pub(crate) fn push(&mut self, mv: Move) {
        self.stack.push(self.board.clone());
        self.board.play(mv);
    }

    fn is_castle(&self, mv: Move) -> bool {
        self.board.piece_on(mv.from) == Some(Piece::King)
            && self.board.color_on(mv.to) == Some(self.board.side_to_move())
    }

    /// Coordinate notation with castling written as the king's destination
    /// (`e1g1`) rather than cozy-chess's king-takes-rook form (`e1h1`).
    pub fn to_uci(&self, mv: Move) -> String {
        let mut mv = mv;
        if self.is_castle(mv) {
            let file = if (mv.to.file() as usize) > (mv.from.file() as usize) { File::G } else { File::C };
            mv.to = Square::new(file, mv.from.rank());
        }
        format!("{}", mv)
    }

    /// Resolves a coordinate move against the legal moves of this position.
    /// A bare four-character pawn move onto the last rank promotes to a queen.
    pub fn parse_uci(&self, uci: &str) -> Option<Move> {
        let uci = uci.trim();
        let moves = self.legal_moves();
        if let Some(m) = moves.iter().copied().find(|&m| self.to_uci(m) == uci || format!("{}", m) == uci) {
            return Some(m);
        }
        if uci.len() == 4 {
            let queen = format!("{uci}q");
            return moves.into_iter().find(|&m| format!("{}", m) == queen);
        }
        None
    }

    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        Some((self.board.piece_on(sq)?, self.board.color_on(sq)?))
    }

    pub fn piece_count(&self) -> usize { self.board.occupied().into_iter().count() }

    pub fn in_check(&self) -> bool { !self.board.checkers().is_empty() }

    pub fn is_checkmate(&self) -> bool { self.in_check() && !self.has_legal_moves() }

    pub fn is_stalemate(&self) -> bool { !self.in_check() && !self.has_legal_moves() }

    pub fn is_fifty_move_draw(&self) -> bool { self.board.halfmove_clock() >= 100 }

    /// Bare kings, or a single minor piece against a bare king.
    pub fn is_insufficient_material(&self) -> bool {
        let b = &self.board;
        let heavy = b.pieces(Piece::Pawn) | b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
        if !heavy.is_empty() { return false; }
        (b.pieces(Piece::Knight) | b.pieces(Piece::Bishop)).into_iter().count() <= 1
    }

    pub fn is_threefold_repetition(&self) -> bool {
        let key = self.board.hash();
        1 + self.stack.iter().filter(|b| b.hash() == key).count() >= 3
    }

    pub fn is_draw(&self) -> bool {
        self.is_stalemate()
            || self.is_insufficient_material()
            || self.is_fifty_move_draw()
            || self.is_threefold_repetition()
    }

    pub fn is_game_over(&self) -> bool { !self.has_legal_moves() || self.is_draw() }

    pub fn status(&self) -> GameStatus {
        let check = self.in_check();
        let has_moves = self.has_legal_moves();
        let checkmate = check && !has_moves;
        let stalemate = !check && !has_moves;
        let draw = stalemate
            || self.is_insufficient_material()
            || self.is_fifty_move_draw()
            || self.is_threefold_repetition();
        GameStatus { check, checkmate, stalemate, draw, game_over: !has_moves || draw }
    }

    /// Leaf count of the legal move tree, walked with make/undo on this position.
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 { return 1; }
        let moves = self.legal_moves();
        if depth == 1 { return moves.len() as u64; }
        let mut nodes = 0u64;
        for m in moves {
            let mut child = self.scoped(m);
            nodes += child.perft(depth - 1);
        }
        nodes
    }
}

/// A move applied to a `Position` that is undone when the guard is dropped,
/// including on early `break`/`return` out of a search loop.
pub struct MoveGuard<'a> {
    pos: &'a mut Position,
}

impl Deref for MoveGuard<'_> {
    type Target = Position;
    fn deref(&self) -> &Position { self.pos }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Position { self.pos }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) { self.pos.undo(); }
}
