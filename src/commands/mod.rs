pub mod cable;
pub mod cost;
