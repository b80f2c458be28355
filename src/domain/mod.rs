pub mod grid;
pub mod movement;
pub mod solver;
pub mod tile;
