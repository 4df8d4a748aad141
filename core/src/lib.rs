#![no_std]

extern crate alloc;

pub use error::*;
pub use grid::*;
pub use moves::*;
pub use problem::*;
pub use replay::*;
pub use types::*;

mod error;
mod grid;
mod moves;
mod problem;
mod replay;
mod types;
