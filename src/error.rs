use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid FEN `{fen}`: {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("illegal move `{0}` in the current position")]
    IllegalMove(String),

    #[error("unknown difficulty `{0}` (expected easy, intermediate or hard)")]
    UnknownDifficulty(String),

    #[error("endgame pattern `{pattern}` has unknown piece letter `{letter}`")]
    BadPatternPiece { pattern: String, letter: char },

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
