//! Match orchestration: sequencing rounds and collecting their results.

use crate::render::{compose, Scene};
use crate::round::{PaddleMemory, Round, RoundError, Step};
use crate::types::*;

/// How a match ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Every configured round was played
    Completed(Vec<RoundResult>),
    /// The user stopped early; results of the finished rounds
    Aborted(Vec<RoundResult>),
}

impl MatchOutcome {
    pub fn results(&self) -> &[RoundResult] {
        match self {
            MatchOutcome::Completed(results) | MatchOutcome::Aborted(results) => results,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, MatchOutcome::Aborted(_))
    }
}

/// Result of feeding one event to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Done(MatchOutcome),
}

/// A match: the configured number of rounds against one destination.
///
/// Owns all mutable game state. Events are handled strictly one at a time.
pub struct Session<R: RandomSource> {
    config: Config,
    destination: String,
    rng: R,
    size: Size,
    memory: PaddleMemory,
    seq: u32,
    round: Round,
    results: Vec<RoundResult>,
}

impl<R: RandomSource> Session<R> {
    /// Start a match; the first round opens immediately
    pub fn new(
        config: Config,
        destination: impl Into<String>,
        size: Size,
        mut rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let memory = PaddleMemory::default();
        let round = Round::new(&config, size, memory, &mut rng);
        tracing::info!(rounds = config.rounds, hops = config.hop_budget, "match started");

        Ok(Session {
            config,
            destination: destination.into(),
            rng,
            size,
            memory,
            seq: 1,
            round,
            results: Vec::new(),
        })
    }

    /// Feed one event. Errors end the match.
    pub fn handle(&mut self, event: Event) -> Result<Flow, RoundError> {
        if self.config.rounds == 0 {
            return Ok(Flow::Done(MatchOutcome::Completed(Vec::new())));
        }
        if let Event::Resize(size) = event {
            self.size = size;
        }

        let step = self.round.handle(event, &mut self.rng)?;
        self.memory = self.round.memory();

        match step {
            Step::Continue => Ok(Flow::Continue),
            Step::Aborted => {
                tracing::info!(seq = self.seq, "match aborted");
                Ok(Flow::Done(MatchOutcome::Aborted(std::mem::take(&mut self.results))))
            }
            Step::Finished(result) => {
                tracing::info!(
                    seq = self.seq,
                    received = result.received,
                    hops = result.remaining_hops,
                    "round finished"
                );
                self.results.push(result);
                if self.seq >= self.config.rounds {
                    return Ok(Flow::Done(MatchOutcome::Completed(std::mem::take(
                        &mut self.results,
                    ))));
                }
                self.seq += 1;
                self.round = Round::new(&self.config, self.size, self.memory, &mut self.rng);
                Ok(Flow::Continue)
            }
        }
    }

    /// Frame for the current state
    pub fn scene(&self) -> Scene {
        compose(&self.round, self.seq, &self.destination)
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    /// 1-based index of the round in progress
    pub fn seq(&self) -> u32 {
        self.seq
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }
}
