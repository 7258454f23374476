use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cozy_chess::{Color, Move};
use log::{debug, info, trace, warn};
use rand::Rng;
use serde::Serialize;

use crate::board::{GameStatus, Position};
use crate::chess_openings::{select_opening, OpeningLine};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::search::alphabeta::{Searcher, INFINITY};
use crate::search::endgame;
use crate::search::eval::{Score, TerminalBonus};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveSource {
    Book,
    Search,
}

/// A root candidate and its aggregated score, from the mover's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: Score,
}

/// Outcome of one AI turn as reported to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub mv: Option<Move>,
    pub uci: Option<String>,
    pub source: Option<MoveSource>,
    pub score: Option<Score>,
    pub nodes: u64,
    pub status: GameStatus,
}

impl Turn {
    fn game_over(status: GameStatus) -> Self {
        Self { mv: None, uci: None, source: None, score: None, nodes: 0, status }
    }
}

/// Highest-or-equal wins, so ties go to the last candidate in enumeration order.
pub fn pick_last_best(scored: &[ScoredMove]) -> Option<ScoredMove> {
    let mut best: Option<ScoredMove> = None;
    for &s in scored {
        if best.map_or(true, |b| s.score >= b.score) { best = Some(s); }
    }
    best
}

pub struct MoveSelector {
    config: EngineConfig,
    searcher: Searcher,
}

impl MoveSelector {
    pub fn new(config: EngineConfig) -> Self {
        let searcher = Searcher::new(config.limits, config.terminal_bonus);
        Self { config, searcher }
    }

    pub fn config(&self) -> &EngineConfig { &self.config }

    pub fn searcher_mut(&mut self) -> &mut Searcher { &mut self.searcher }

    pub fn set_abort_flag(&mut self, flag: Arc<AtomicBool>) { self.searcher.set_abort_flag(flag); }

    /// The line's move for this ply, if it exists and is legal here.
    pub fn book_move(&self, pos: &Position, line: &OpeningLine, move_count: usize) -> Option<Move> {
        let uci = line.next(move_count)?;
        let mv = pos.parse_uci(uci);
        if mv.is_none() {
            debug!("book move {} of {} rejected at ply {}; falling back to search", uci, line.name, move_count);
        }
        mv
    }

    /// Scores every legal root move: search at depth-1 from the mover's side
    /// plus the endgame bonus. `pos` is restored before returning.
    pub fn rank_moves(&mut self, pos: &mut Position) -> Vec<ScoredMove> {
        self.searcher.begin();
        self.score_root(pos)
    }

    pub fn best_move(&mut self, pos: &mut Position) -> Option<ScoredMove> {
        let ranked = self.rank_moves(pos);
        pick_last_best(&ranked)
    }

    fn score_root(&mut self, pos: &mut Position) -> Vec<ScoredMove> {
        let depth = self.config.search_depth.saturating_sub(1);
        let root_white = pos.side_to_move() == Color::White;
        // Flat terms favour White; a Black root negates, so it needs them credited to the attacker.
        let policy = if root_white { self.config.terminal_bonus } else { TerminalBonus::SideAdjusted };
        self.searcher.set_terminal_bonus(policy);
        let moves = pos.legal_moves();
        let mut scored = Vec::with_capacity(moves.len());
        for m in moves {
            let bonus = endgame::bonus(pos, m, &self.config.endgame_patterns);
            let value = {
                let mut child = pos.scoped(m);
                self.searcher.search(&mut child, depth, !root_white, -INFINITY, INFINITY)
            };
            let score = bonus + if root_white { value } else { -value };
            trace!("root {} value={} bonus={} score={}", pos.to_uci(m), value, bonus, score);
            scored.push(ScoredMove { mv: m, score });
        }
        scored
    }

    /// Picks and plays the AI's move. A legal book move for `move_count` is
    /// played without searching; otherwise the best searched move is. Only a
    /// position without legal moves yields no move; rule draws still get one.
    /// The move counter advances by one when a move is played.
    pub fn choose_move(&mut self, pos: &mut Position, move_count: &mut usize, line: &OpeningLine) -> Turn {
        self.searcher.begin();
        if !pos.has_legal_moves() {
            let status = pos.status();
            debug!("no move to play: {:?}", status);
            return Turn::game_over(status);
        }

        if let Some(m) = self.book_move(pos, line, *move_count) {
            debug!("book move {} ({}, ply {})", pos.to_uci(m), line.name, move_count);
            return self.commit(pos, move_count, m, MoveSource::Book, None);
        }

        let ranked = self.score_root(pos);
        let Some(best) = pick_last_best(&ranked) else { return Turn::game_over(pos.status()) };
        if self.searcher.stopped() {
            warn!("search limit hit after {} nodes; playing best move found", self.searcher.nodes());
        }
        debug!(
            "search move {} score={} nodes={} depth={}",
            pos.to_uci(best.mv), best.score, self.searcher.nodes(), self.config.search_depth
        );
        self.commit(pos, move_count, best.mv, MoveSource::Search, Some(best.score))
    }

    fn commit(&self, pos: &mut Position, move_count: &mut usize, mv: Move, source: MoveSource, score: Option<Score>) -> Turn {
        let uci = pos.to_uci(mv);
        pos.push(mv);
        *move_count += 1;
        Turn { mv: Some(mv), uci: Some(uci), source: Some(source), score, nodes: self.searcher.nodes(), status: pos.status() }
    }
}

/// One game against the engine: the live position, the opening line chosen at
/// game start and the ply counter that indexes it.
pub struct Game {
    position: Position,
    selector: MoveSelector,
    line: OpeningLine,
    move_count: usize,
    abort: Arc<AtomicBool>,
}

impl Game {
    pub fn new<R: Rng + ?Sized>(config: EngineConfig, rng: &mut R) -> Self {
        let line = select_opening(&config.openings, rng);
        Self::with_line(config, line)
    }

    pub fn with_line(config: EngineConfig, line: OpeningLine) -> Self {
        Self::with_position(config, line, Position::startpos())
    }

    /// Starts from an arbitrary position. No book line applies.
    pub fn from_fen(config: EngineConfig, fen: &str) -> Result<Self> {
        Ok(Self::with_position(config, OpeningLine::default(), Position::from_fen(fen)?))
    }

    pub fn with_position(config: EngineConfig, line: OpeningLine, position: Position) -> Self {
        info!("new game: difficulty={} depth={} opening={:?}", config.difficulty, config.search_depth, line.name);
        let abort = Arc::new(AtomicBool::new(false));
        let mut selector = MoveSelector::new(config);
        selector.set_abort_flag(abort.clone());
        Self { position, selector, line, move_count: 0, abort }
    }

    pub fn play_ai_turn(&mut self) -> Turn {
        self.abort.store(false, Ordering::Relaxed);
        self.selector.choose_move(&mut self.position, &mut self.move_count, &self.line)
    }

    pub fn play_opponent(&mut self, uci: &str) -> Result<GameStatus> {
        self.position.play_uci(uci)?;
        self.move_count += 1;
        Ok(self.position.status())
    }

    pub fn status(&self) -> GameStatus { self.position.status() }

    pub fn position(&self) -> &Position { &self.position }

    pub fn move_count(&self) -> usize { self.move_count }

    pub fn opening(&self) -> &OpeningLine { &self.line }

    pub fn config(&self) -> &EngineConfig { self.selector.config() }

    /// Raising this flag from another thread cuts the current search short.
    pub fn abort_handle(&self) -> Arc<AtomicBool> { self.abort.clone() }
}
