use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chess_openings::{openings_for, OpeningLine};
use crate::error::{EngineError, Result};
use crate::search::alphabeta::SearchLimits;
use crate::search::endgame::{patterns_for, EndgamePattern};
use crate::search::eval::TerminalBonus;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Intermediate,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Intermediate, Difficulty::Hard];

    pub fn search_depth(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Intermediate => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" | "e" => Ok(Difficulty::Easy),
            "intermediate" | "medium" | "i" => Ok(Difficulty::Intermediate),
            "hard" | "h" => Ok(Difficulty::Hard),
            _ => Err(EngineError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Everything a game needs to know about its difficulty, fixed at game start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub difficulty: Difficulty,
    pub search_depth: u32,
    #[serde(default)]
    pub openings: Vec<OpeningLine>,
    #[serde(default)]
    pub endgame_patterns: Vec<EndgamePattern>,
    #[serde(default)]
    pub limits: SearchLimits,
    #[serde(default)]
    pub terminal_bonus: TerminalBonus,
}

impl EngineConfig {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            search_depth: difficulty.search_depth(),
            openings: openings_for(difficulty),
            endgame_patterns: patterns_for(difficulty),
            limits: SearchLimits::default(),
            terminal_bonus: TerminalBonus::default(),
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| EngineError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.search_depth == 0 {
            return Err(EngineError::InvalidConfig("search_depth must be at least 1".to_string()));
        }
        for p in &self.endgame_patterns { p.piece_set()?; }
        if let Some(line) = self.openings.iter().find(|l| l.moves.iter().any(|m| !(4..=5).contains(&m.len()))) {
            return Err(EngineError::InvalidConfig(format!("opening `{}` has a malformed move", line.name)));
        }
        Ok(())
    }
}
