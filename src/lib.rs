mod board;
mod input;
mod solver;

pub use board::{Board, Move};
pub use input::{parse_board, ParseError};
pub use solver::{Priority, SearchStats, Solver, SolverConfig, SolverError};
