use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use cozy_chess::Color;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::board::Position;
use crate::chess_openings::select_opening;
use crate::config::{Difficulty, EngineConfig};
use crate::error::{EngineError, Result};
use crate::search::alphabeta::SearchLimits;
use crate::selector::{MoveSelector, MoveSource};

#[derive(Clone, Debug)]
pub struct SelfPlayParams {
    pub games: usize,
    pub max_plies: usize,
    pub white: Difficulty,
    pub black: Difficulty,
    pub seed: u64,
    pub limits: SearchLimits,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameRecord {
    pub white: Difficulty,
    pub black: Difficulty,
    pub white_opening: String,
    pub black_opening: String,
    pub moves: Vec<String>,
    pub book_plies: usize,
    pub result: i8, // 1 white win, 0 draw or unfinished, -1 black win
    pub termination: &'static str,
}

/// Plays one engine-vs-engine game from the start position. Each side draws
/// its own opening line from its difficulty's catalog.
pub fn play_game(params: &SelfPlayParams, rng: &mut SmallRng) -> GameRecord {
    let cfg_w = EngineConfig::for_difficulty(params.white).with_limits(params.limits);
    let cfg_b = EngineConfig::for_difficulty(params.black).with_limits(params.limits);
    let line_w = select_opening(&cfg_w.openings, rng);
    let line_b = select_opening(&cfg_b.openings, rng);
    let mut record = GameRecord {
        white: params.white,
        black: params.black,
        white_opening: line_w.name.clone(),
        black_opening: line_b.name.clone(),
        moves: Vec::new(),
        book_plies: 0,
        result: 0,
        termination: "max_plies",
    };
    let mut sel_w = MoveSelector::new(cfg_w);
    let mut sel_b = MoveSelector::new(cfg_b);
    let mut pos = Position::startpos();
    let mut move_count = 0usize;

    while move_count < params.max_plies {
        let (sel, line) = if pos.side_to_move() == Color::White { (&mut sel_w, &line_w) } else { (&mut sel_b, &line_b) };
        let turn = sel.choose_move(&mut pos, &mut move_count, line);
        let Some(uci) = turn.uci else { break };
        record.moves.push(uci);
        if turn.source == Some(MoveSource::Book) { record.book_plies += 1; }
        if turn.status.game_over { break; }
    }

    let status = pos.status();
    if status.checkmate {
        record.result = if pos.side_to_move() == Color::White { -1 } else { 1 };
        record.termination = "checkmate";
    } else if status.stalemate {
        record.termination = "stalemate";
    } else if status.draw {
        record.termination = "draw";
    }
    log::debug!("game finished: {} after {} plies ({})", record.termination, record.moves.len(), record.white_opening);
    record
}

pub fn generate_games(params: &SelfPlayParams) -> Vec<GameRecord> {
    let mut rng = SmallRng::seed_from_u64(params.seed);
    (0..params.games).map(|_| play_game(params, &mut rng)).collect()
}

/// Writes one JSON object per line.
pub fn write_records(records: &[GameRecord], path: &Path) -> Result<()> {
    let io_err = |source: std::io::Error| EngineError::Io { path: path.to_path_buf(), source };
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() { create_dir_all(dir).map_err(io_err)?; }
    }
    let mut w = BufWriter::new(File::create(path).map_err(io_err)?);
    for r in records {
        serde_json::to_writer(&mut w, r)?;
        w.write_all(b"\n").map_err(io_err)?;
    }
    w.flush().map_err(io_err)?;
    Ok(())
}
