pub mod fitness;
pub mod level;
