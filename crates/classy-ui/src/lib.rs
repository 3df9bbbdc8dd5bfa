//! Terminal front end for Classy Weather.

pub mod models;
pub mod render;
pub mod terminal;

pub use render::render;
pub use terminal::{lookup_once, run, RunOptions};
