//! Replays a minesweeper solver's traces: fetches problems from the generator, runs them through the solver and
//! steps through the recorded moves, by hand or on a timer.

pub use backend::*;
pub use commands::*;
pub use error::*;
pub use render::*;
pub use scheduler::*;
pub use session::*;
pub use settings::*;

mod backend;
mod commands;
mod error;
mod render;
mod scheduler;
mod session;
mod settings;
