pub mod alphabeta;
pub mod endgame;
pub mod eval;
