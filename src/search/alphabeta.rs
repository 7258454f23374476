use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::search::eval::{evaluate_with, Score, TerminalBonus};

/// Wider than any reachable evaluation; used as the open root window.
pub const INFINITY: Score = Score::MAX;

/// Optional budgets for one AI turn. `None` means unbounded.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    #[serde(default)]
    pub max_nodes: Option<u64>,
    #[serde(default)]
    pub movetime_ms: Option<u64>,
}

impl SearchLimits {
    pub fn movetime(&self) -> Option<Duration> { self.movetime_ms.map(Duration::from_millis) }
}

pub struct Searcher {
    pub(crate) nodes: u64,
    node_limit: u64,
    movetime: Option<Duration>,
    deadline: Option<Instant>,
    abort: Option<Arc<AtomicBool>>,
    stopped: bool,
    use_pruning: bool,
    terminal_bonus: TerminalBonus,
}

impl Default for Searcher {
    fn default() -> Self {
        Self {
            nodes: 0,
            node_limit: u64::MAX,
            movetime: None,
            deadline: None,
            abort: None,
            stopped: false,
            use_pruning: true,
            terminal_bonus: TerminalBonus::Flat,
        }
    }
}

impl Searcher {
    pub fn new(limits: SearchLimits, terminal_bonus: TerminalBonus) -> Self {
        let mut s = Self::default();
        s.set_limits(limits);
        s.terminal_bonus = terminal_bonus;
        s
    }

    pub fn set_limits(&mut self, limits: SearchLimits) {
        self.node_limit = limits.max_nodes.unwrap_or(u64::MAX);
        self.movetime = limits.movetime();
    }

    /// Turning pruning off gives exhaustive minimax over the same tree.
    pub fn set_use_pruning(&mut self, on: bool) { self.use_pruning = on; }

    pub fn set_abort_flag(&mut self, flag: Arc<AtomicBool>) { self.abort = Some(flag); }

    pub fn set_terminal_bonus(&mut self, policy: TerminalBonus) { self.terminal_bonus = policy; }

    /// Resets counters and arms the wall-clock budget for a new turn.
    pub fn begin(&mut self) {
        self.nodes = 0;
        self.stopped = false;
        self.deadline = self.movetime.map(|d| Instant::now() + d);
    }

    pub fn nodes(&self) -> u64 { self.nodes }

    /// True if a node, time or abort limit cut the last search short.
    pub fn stopped(&self) -> bool { self.stopped }

    fn out_of_budget(&mut self) -> bool {
        if self.stopped { return true; }
        if let Some(ref flag) = self.abort { if flag.load(Ordering::Relaxed) { self.stopped = true; } }
        if self.nodes >= self.node_limit { self.stopped = true; }
        if let Some(dl) = self.deadline { if Instant::now() >= dl { self.stopped = true; } }
        self.stopped
    }

    /// Fixed-depth minimax with alpha-beta pruning. White maximizes and Black
    /// minimizes; `maximizing` must match the side to move in `pos`.
    ///
    /// Every move is applied through a scoped guard, so `pos` is unchanged on
    /// return. Positions without legal moves, and every node once a limit has
    /// tripped, score as their static evaluation.
    pub fn search(&mut self, pos: &mut Position, depth: u32, maximizing: bool, mut alpha: Score, mut beta: Score) -> Score {
        self.nodes += 1;
        if depth == 0 || self.out_of_budget() { return evaluate_with(pos, self.terminal_bonus); }

        let moves = pos.legal_moves();
        if moves.is_empty() { return evaluate_with(pos, self.terminal_bonus); }

        if maximizing {
            let mut best = -INFINITY;
            for m in moves {
                let value = {
                    let mut child = pos.scoped(m);
                    self.search(&mut child, depth - 1, false, alpha, beta)
                };
                best = best.max(value);
                alpha = alpha.max(value);
                if self.use_pruning && beta <= alpha { break; }
            }
            best
        } else {
            let mut best = INFINITY;
            for m in moves {
                let value = {
                    let mut child = pos.scoped(m);
                    self.search(&mut child, depth - 1, true, alpha, beta)
                };
                best = best.min(value);
                beta = beta.min(value);
                if self.use_pruning && beta <= alpha { break; }
            }
            best
        }
    }
}
