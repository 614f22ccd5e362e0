pub mod cells;
pub mod principles;
pub mod scores;
pub mod sources;
pub mod weights;
