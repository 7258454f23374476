// Move-decision engine for a difficulty-tunable chess opponent
pub mod board;
pub mod chess_openings;
pub mod config;
pub mod error;
pub mod search;
pub mod selector;
pub mod selfplay;

pub use board::{GameStatus, Position};
pub use config::{Difficulty, EngineConfig};
pub use error::{EngineError, Result};
pub use selector::{Game, MoveSelector, MoveSource, Turn};
