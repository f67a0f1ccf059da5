//! Test doubles shared by the unit tests.

use crate::types::RandomSource;
use std::collections::VecDeque;

/// Replays a fixed list of draws, then returns zero forever
pub struct ScriptedRandom {
    draws: VecDeque<u32>,
}

impl ScriptedRandom {
    pub fn new(draws: &[u32]) -> Self {
        ScriptedRandom {
            draws: draws.iter().copied().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn int_n(&mut self, n: u32) -> u32 {
        self.draws.pop_front().unwrap_or(0).min(n.saturating_sub(1))
    }
}
