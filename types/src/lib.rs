//! Common types for the Tài Xỉu dice game.

mod constants;
mod game;
mod history;
mod signal;

pub use constants::*;
pub use game::*;
pub use history::*;
pub use signal::*;

#[cfg(test)]
mod tests;
