//! Scripted opening lines, grouped by difficulty.
//! Each line lists both sides' half-moves in coordinate notation, indexed by
//! the game's ply counter.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Difficulty;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningLine {
    pub name: String,
    pub moves: Vec<String>,
}

impl OpeningLine {
    pub fn new(name: &str, moves: &[&str]) -> Self {
        Self { name: name.to_string(), moves: moves.iter().map(|m| m.to_string()).collect() }
    }

    pub fn len(&self) -> usize { self.moves.len() }

    pub fn is_empty(&self) -> bool { self.moves.is_empty() }

    /// The scripted move for ply `move_index`, if the line reaches that far.
    /// Legality is the caller's concern.
    pub fn next(&self, move_index: usize) -> Option<&str> {
        self.moves.get(move_index).map(String::as_str)
    }
}

pub fn easy_openings() -> Vec<OpeningLine> {
    vec![
        OpeningLine::new("Italian Game", &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "f8c5", "e1g1", "g8f6"]),
        OpeningLine::new("Ruy Lopez", &["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6", "b5a4", "g8f6"]),
        OpeningLine::new("Scotch Game", &["e2e4", "e7e5", "g1f3", "b8c6", "d2d4", "e5d4", "f3d4", "f8c5"]),
        OpeningLine::new("Vienna Game", &["e2e4", "e7e5", "b1c3", "g8f6", "f2f4", "d7d5", "f4e5", "f6e4"]),
        OpeningLine::new("London System", &["d2d4", "d7d5", "g1f3", "g8f6", "c1f4", "c7c5", "e2e3", "b8c6"]),
    ]
}

pub fn intermediate_openings() -> Vec<OpeningLine> {
    vec![
        OpeningLine::new("Queen's Gambit", &["d2d4", "d7d5", "c2c4", "e7e6", "b1c3", "g8f6", "c1g5", "f8e7"]),
        OpeningLine::new("Sicilian Defense - Dragon Variation", &["e2e4", "c7c5", "g1f3", "d7d6", "d2d4", "c5d4", "f3d4", "g8f6"]),
        OpeningLine::new("French Defense", &["e2e4", "e7e6", "d2d4", "d7d5", "b1c3", "f8b4", "e4e5", "c7c5"]),
        OpeningLine::new("Caro-Kann Defense", &["e2e4", "c7c6", "d2d4", "d7d5", "b1c3", "d5e4", "c3e4", "c8f5"]),
        OpeningLine::new("English Opening", &["c2c4", "e7e5", "b1c3", "g8f6", "g2g3", "d7d5", "c4d5", "f6d5"]),
        OpeningLine::new("Scandinavian Defense", &["e2e4", "d7d5", "e4d5", "d8d5", "b1c3", "d5a5", "d2d4", "g8f6"]),
        OpeningLine::new("King's Gambit", &["e2e4", "e7e5", "f2f4", "e5f4", "g1f3", "g7g5", "h2h4", "g5g4"]),
    ]
}

pub fn hard_openings() -> Vec<OpeningLine> {
    vec![
        OpeningLine::new("King's Indian Defense", &["d2d4", "g8f6", "c2c4", "g7g6", "b1c3", "f8g7", "e2e4", "d7d6"]),
        OpeningLine::new("Queen's Indian Defense", &["d2d4", "g8f6", "c2c4", "e7e6", "g1f3", "b7b6", "g2g3", "c8b7"]),
        OpeningLine::new("Nimzo-Indian Defense", &["d2d4", "g8f6", "c2c4", "e7e6", "b1c3", "f8b4", "e2e3", "e8g8"]),
        OpeningLine::new("Pirc Defense", &["e2e4", "d7d6", "d2d4", "g8f6", "b1c3", "g7g6", "f2f4", "f8g7"]),
        OpeningLine::new("Alekhine's Defense", &["e2e4", "g8f6", "e4e5", "f6d5", "d2d4", "d7d6", "g1f3", "c8g4"]),
        OpeningLine::new("Benoni Defense", &["d2d4", "g8f6", "c2c4", "c7c5", "d4d5", "e7e6", "b1c3", "e6d5"]),
        OpeningLine::new("Dutch Defense", &["d2d4", "f7f5", "g2g3", "g8f6", "f1g2", "e7e6", "g1f3", "f8e7"]),
        OpeningLine::new("Catalan Opening", &["d2d4", "g8f6", "c2c4", "e7e6", "g2g3", "d7d5", "f1g2", "f8e7"]),
    ]
}

pub fn openings_for(difficulty: Difficulty) -> Vec<OpeningLine> {
    match difficulty {
        Difficulty::Easy => easy_openings(),
        Difficulty::Intermediate => intermediate_openings(),
        Difficulty::Hard => hard_openings(),
    }
}

/// Every built-in line across all difficulties.
pub fn get_chess_openings() -> Vec<OpeningLine> {
    Difficulty::ALL.into_iter().flat_map(openings_for).collect()
}

/// Picks one line uniformly at random. An empty catalog gives an empty line,
/// which never supplies a book move.
pub fn select_opening<R: Rng + ?Sized>(catalog: &[OpeningLine], rng: &mut R) -> OpeningLine {
    if catalog.is_empty() { return OpeningLine::default(); }
    catalog[rng.gen_range(0..catalog.len())].clone()
}
