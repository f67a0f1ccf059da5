//! Echo core engine - deterministic ICMP-themed pong rounds

pub mod ball;
pub mod controller;
pub mod mode;
pub mod physics;
pub mod render;
pub mod report;
pub mod round;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use mode::RoundMode;
pub use render::{Cell, Scene};
pub use report::{Report, Totals};
pub use round::{PaddleMemory, Round, RoundError, Step};
pub use session::{Flow, MatchOutcome, Session};
pub use types::*;
