pub use core_2048::*;

pub mod ai;
pub mod config;
pub mod game;
pub mod hint;
pub mod persist;
