//! **maze_carver** generates perfect rectangular mazes with a recursive backtracker, solves them
//! and renders them as text or PNG images.

pub mod cells;
pub mod generators;
pub mod grid;
pub mod grid_dimensions;
pub mod grid_displays;
pub mod grid_iterators;
pub mod maze;
pub mod pathing;
pub mod renderers;
pub mod units;
