pub mod cozy;

pub use cozy::{GameStatus, MoveGuard, Position};
