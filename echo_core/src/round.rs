//! One serve-to-resolution round and its per-tick pipeline.

use crate::ball::{Ball, Pacer};
use crate::controller;
use crate::mode::RoundMode;
use crate::physics::{Paddle, Wall};
use crate::types::*;
use std::fmt;
use std::time::Instant;

const HUMAN_GLYPHS: &str = "|";
const OPPONENT_GLYPHS: &str = "||G|W|||";
const OPPONENT_X: i32 = 3;

/// Errors that end a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    /// The terminal is smaller than the playable minimum
    TerminalTooSmall {
        width: i32,
        height: i32,
        min_width: i32,
        min_height: i32,
    },
}

impl fmt::Display for RoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundError::TerminalTooSmall {
                width,
                height,
                min_width,
                min_height,
            } => write!(
                f,
                "This term({}x{}) is too narrow. Requires {}x{} area",
                width, height, min_width, min_height
            ),
        }
    }
}

impl std::error::Error for RoundError {}

/// What happened after handling one event
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    /// Round still running
    Continue,
    /// Round over, result dwell included
    Finished(RoundResult),
    /// User asked to stop
    Aborted,
}

/// Paddle rows remembered across rounds and resizes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct PaddleMemory {
    pub human: Option<i32>,
    pub opponent: Option<i32>,
}

/// Per-round game state: geometry, ball, paddles, hop budget and phase
pub struct Round {
    config: Config,
    court: Court,
    top_wall: Wall,
    bottom_wall: Wall,
    ball: Ball,
    human: Paddle,
    opponent: Paddle,
    hops: i32,
    mode: RoundMode,
    ball_pacer: Pacer,
    opponent_pacer: Pacer,
    started: Instant,
    outcome: Option<RoundResult>,
}

impl Round {
    /// Lay out a fresh round for a terminal of `size`
    pub fn new(
        config: &Config,
        size: Size,
        memory: PaddleMemory,
        rng: &mut impl RandomSource,
    ) -> Self {
        let court = Court::new(size);
        let paddle_size = Size::new(config.paddle_width, config.paddle_height);
        let human_y = court.correct_paddle_y(memory.human, config.paddle_height);
        let opponent_y = court.correct_paddle_y(memory.opponent, config.paddle_height);

        let round = Round {
            config: config.clone(),
            court,
            top_wall: Wall::new(court.top_wall_y(), size.width),
            bottom_wall: Wall::new(court.bottom_wall_y(), size.width),
            ball: Ball::serve(size, &config.payload, config.speed_level_cap(), rng),
            human: Paddle::new(
                Position::new(size.width - 4, human_y),
                paddle_size,
                HUMAN_GLYPHS,
            ),
            opponent: Paddle::new(
                Position::new(OPPONENT_X, opponent_y),
                paddle_size,
                OPPONENT_GLYPHS,
            ),
            hops: config.hop_budget,
            mode: RoundMode::opening(config.message_ticks),
            ball_pacer: Pacer::new(config.ball_interval),
            opponent_pacer: Pacer::new(config.opponent_interval),
            started: Instant::now(),
            outcome: None,
        };
        tracing::debug!(
            width = size.width,
            height = size.height,
            human_y,
            opponent_y,
            "round laid out"
        );
        round
    }

    /// Handle one event
    pub fn handle(
        &mut self,
        event: Event,
        rng: &mut impl RandomSource,
    ) -> Result<Step, RoundError> {
        match event {
            Event::Key(Key::Abort) => Ok(Step::Aborted),
            Event::Key(Key::Up) => {
                self.move_human(-1);
                Ok(Step::Continue)
            }
            Event::Key(Key::Down) => {
                self.move_human(1);
                Ok(Step::Continue)
            }
            Event::Resize(size) => {
                self.resize(size, rng);
                Ok(Step::Continue)
            }
            Event::Tick => self.tick(rng),
        }
    }

    /// Rebuild everything for a new terminal size, keeping paddle rows that
    /// still fit. Countdowns, hop budget, speed and serve start over.
    pub fn resize(&mut self, size: Size, rng: &mut impl RandomSource) {
        tracing::info!(width = size.width, height = size.height, "terminal resized");
        let memory = self.memory();
        let opponent_pacer = self.opponent_pacer;
        *self = Round::new(&self.config, size, memory, rng);
        self.opponent_pacer = opponent_pacer;
    }

    /// Advance the round by one clock tick
    pub fn tick(&mut self, rng: &mut impl RandomSource) -> Result<Step, RoundError> {
        self.mode = self.mode.advance();
        if self.mode.is_ended() {
            return Ok(Step::Finished(self.outcome.unwrap_or_else(RoundResult::lost)));
        }

        if self.is_narrow() {
            if self.mode.is_opening() {
                return Ok(Step::Continue);
            }
            return Err(RoundError::TerminalTooSmall {
                width: self.court.width(),
                height: self.court.height(),
                min_width: self.config.min_width,
                min_height: self.config.min_height,
            });
        }

        let ball_due = self
            .ball_pacer
            .tick(self.ball.interval(self.config.ball_interval));
        let opponent_due = self.opponent_pacer.tick(self.config.opponent_interval);

        if opponent_due && self.mode.is_playing() {
            controller::step(
                &mut self.opponent,
                &self.court,
                self.ball.head(),
                self.ball.velocity(),
                self.human.y(),
                self.hops,
                rng,
            );
        }

        if ball_due {
            match self.mode {
                RoundMode::Playing => {
                    self.ball.advance();
                    if let Some(step) = self.resolve(rng) {
                        return Ok(step);
                    }
                }
                RoundMode::ResultMessage(_) => self.ball.advance(),
                RoundMode::OpeningMessage(_) | RoundMode::Ended => {}
            }
        }

        Ok(Step::Continue)
    }

    /// Collisions and boundary checks after a ball advance.
    ///
    /// Walls run again after the paddles: a paddle bounce near a corner can
    /// land the ball on a wall row.
    fn resolve(&mut self, rng: &mut impl RandomSource) -> Option<Step> {
        self.reflect_walls();

        if self.human.reflect(&mut self.ball) {
            tracing::debug!(head = ?self.ball.head(), "human return");
            if rng.coin() {
                self.ball.speed_up();
            }
        }

        if self.opponent.reflect(&mut self.ball) {
            self.hops -= 1;
            tracing::debug!(hops = self.hops, "opponent return");
            if self.hops <= 0 {
                tracing::info!("hop budget exhausted");
                return Some(Step::Finished(RoundResult::lost()));
            }
        }

        self.reflect_walls();

        let x = self.ball.head().x;
        if x < 1 {
            let elapsed = self.elapsed();
            tracing::info!(hops = self.hops, elapsed, "echo received");
            self.finish(RoundResult::received(self.hops, elapsed));
        } else if self.court.width() - 1 <= x {
            tracing::info!("request timed out");
            self.finish(RoundResult::lost());
        }
        None
    }

    fn reflect_walls(&mut self) {
        self.top_wall.reflect(&mut self.ball);
        self.bottom_wall.reflect(&mut self.ball);
    }

    fn finish(&mut self, result: RoundResult) {
        self.outcome = Some(result);
        self.mode = RoundMode::result(self.config.message_ticks);
    }

    fn move_human(&mut self, dy: i32) {
        if self
            .court
            .paddle_fits(self.human.y() + dy, self.human.size.height)
        {
            self.human.move_y(dy);
        }
    }

    fn elapsed(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    /// Current paddle rows, to carry into the next round
    pub fn memory(&self) -> PaddleMemory {
        PaddleMemory {
            human: Some(self.human.y()),
            opponent: Some(self.opponent.y()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn court(&self) -> &Court {
        &self.court
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn human(&self) -> &Paddle {
        &self.human
    }

    pub fn opponent(&self) -> &Paddle {
        &self.opponent
    }

    pub fn hops(&self) -> i32 {
        self.hops
    }

    pub fn mode(&self) -> RoundMode {
        self.mode
    }

    pub fn outcome(&self) -> Option<RoundResult> {
        self.outcome
    }

    pub fn is_narrow(&self) -> bool {
        self.court.is_narrow(&self.config)
    }

    /// Ticks between ball advances right now
    pub fn ball_interval(&self) -> u32 {
        self.ball.interval(self.config.ball_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRandom;

    fn run_ticks(round: &mut Round, rng: &mut ScriptedRandom, n: u32) -> Vec<Step> {
        (0..n).map(|_| round.tick(rng).unwrap()).collect()
    }

    fn new_round(size: Size, rng: &mut ScriptedRandom) -> Round {
        Round::new(&Config::default(), size, PaddleMemory::default(), rng)
    }

    fn playing_round(size: Size, script: &[u32]) -> (Round, ScriptedRandom) {
        let mut rng = ScriptedRandom::new(script);
        let mut round = new_round(size, &mut rng);
        round.mode = RoundMode::Playing;
        (round, rng)
    }

    #[test]
    fn test_serve_layout() {
        let mut rng = ScriptedRandom::new(&[2, 3]);
        let round = new_round(Size::new(80, 24), &mut rng);

        assert_eq!(round.ball().head(), Position::new(1, 10)); // 2 + 24 / 3
        assert_eq!(round.ball().velocity(), Velocity::new(1.0, 0.5));
        assert_eq!(round.human().position, Position::new(76, 10));
        assert_eq!(round.opponent().position, Position::new(3, 10));
        assert_eq!(round.hops(), 64);
        assert_eq!(round.mode(), RoundMode::OpeningMessage(150));
    }

    #[test]
    fn test_ball_waits_through_opening() {
        let mut rng = ScriptedRandom::new(&[0, 0]);
        let mut round = new_round(Size::new(80, 24), &mut rng);
        let start = round.ball().head();

        let steps = run_ticks(&mut round, &mut rng, 149);
        assert!(steps.iter().all(|s| *s == Step::Continue));
        assert_eq!(round.ball().head(), start);

        round.tick(&mut rng).unwrap();
        assert_eq!(round.mode(), RoundMode::Playing);
    }

    #[test]
    fn test_unobstructed_ball_times_out_after_38_advances() {
        // Row 53 with dy 0.5 stays clear of both paddles (rows 48..51)
        let (mut round, mut rng) = playing_round(Size::new(40, 100), &[20, 3]);
        assert_eq!(round.ball().head(), Position::new(1, 53));

        let steps = run_ticks(&mut round, &mut rng, 38 * 9 - 1);
        assert!(steps.iter().all(|s| *s == Step::Continue));
        assert!(round.mode().is_playing());
        assert_eq!(round.ball().head().x, 38);

        round.tick(&mut rng).unwrap();
        assert_eq!(round.ball().head().x, 39);
        assert_eq!(round.mode(), RoundMode::ResultMessage(150));
        assert_eq!(round.outcome().map(|r| r.received), Some(false));
        assert_eq!(round.outcome(), Some(RoundResult::lost()));
    }

    #[test]
    fn test_result_dwell_then_finished() {
        let (mut round, mut rng) = playing_round(Size::new(40, 100), &[20, 3]);
        run_ticks(&mut round, &mut rng, 38 * 9);

        let steps = run_ticks(&mut round, &mut rng, 149);
        assert!(steps.iter().all(|s| *s == Step::Continue));

        match round.tick(&mut rng).unwrap() {
            Step::Finished(result) => {
                assert_eq!(result, RoundResult::lost());
            }
            other => panic!("Expected finished round, got {:?}", other),
        }
    }

    #[test]
    fn test_result_dwell_ball_passes_through_everything() {
        let (mut round, mut rng) = playing_round(Size::new(80, 24), &[0, 0]);
        round.finish(RoundResult::lost());

        // Onto the top wall
        round.ball = Ball::new(Position::new(20, 2), Velocity::new(1.0, -1.0), "ICMP", 8);
        round.ball_pacer = Pacer::new(1);
        round.tick(&mut rng).unwrap();
        assert_eq!(round.ball().head(), Position::new(21, 1));
        assert_eq!(round.ball().velocity(), Velocity::new(1.0, -1.0));

        // Into the human paddle
        let top = round.human().y();
        round.ball = Ball::new(Position::new(75, top + 1), Velocity::new(1.0, 0.25), "ICMP", 8);
        round.ball_pacer = Pacer::new(1);
        round.tick(&mut rng).unwrap();
        assert_eq!(round.ball().head(), Position::new(76, top + 1));
        assert_eq!(round.ball().velocity(), Velocity::new(1.0, 0.25));

        // Past the left edge
        round.ball = Ball::new(Position::new(1, 10), Velocity::new(-1.0, 0.25), "ICMP", 8);
        round.ball_pacer = Pacer::new(1);
        round.tick(&mut rng).unwrap();
        assert_eq!(round.ball().head().x, 0);

        assert_eq!(round.outcome(), Some(RoundResult::lost()));
        assert_eq!(round.mode(), RoundMode::ResultMessage(147));
        assert_eq!(round.hops(), 64);
    }

    #[test]
    fn test_opponent_moves_only_while_playing() {
        let mut rng = ScriptedRandom::new(&[0, 0]);
        let mut round = new_round(Size::new(80, 24), &mut rng);
        // Heading for the opponent on its half, below its centre
        round.ball = Ball::new(Position::new(10, 20), Velocity::new(-1.0, 0.25), "ICMP", 8);
        let start = round.opponent().y();

        run_ticks(&mut round, &mut rng, 149);
        assert!(round.mode().is_opening());
        assert_eq!(round.opponent().y(), start);

        round.mode = RoundMode::Playing;
        run_ticks(&mut round, &mut rng, 9);
        assert_eq!(round.opponent().y(), start + 1);

        round.finish(RoundResult::lost());
        let held = round.opponent().y();
        run_ticks(&mut round, &mut rng, 27);
        assert!(round.mode().is_result());
        assert_eq!(round.opponent().y(), held);
    }

    #[test]
    fn test_return_past_left_edge_is_received() {
        let (mut round, mut rng) = playing_round(Size::new(80, 24), &[0, 0]);
        round.ball = Ball::new(Position::new(1, 15), Velocity::new(-1.0, 0.25), "ICMP", 8);
        round.ball_pacer = Pacer::new(1);

        assert_eq!(round.tick(&mut rng).unwrap(), Step::Continue);
        assert_eq!(round.ball().head().x, 0);
        assert_eq!(round.mode(), RoundMode::ResultMessage(150));
        let result = round.outcome().unwrap();
        assert!(result.received);
        assert_eq!(result.remaining_hops, 64);
    }

    #[test]
    fn test_hop_exhaustion_fails_same_tick() {
        let (mut round, mut rng) = playing_round(Size::new(80, 24), &[0, 0]);
        round.hops = 1;
        let top = round.opponent().y();
        round.ball = Ball::new(Position::new(5, top + 1), Velocity::new(-1.0, 0.25), "ICMP", 8);
        round.ball_pacer = Pacer::new(1);

        match round.tick(&mut rng).unwrap() {
            Step::Finished(result) => {
                assert!(!result.received);
                assert_eq!(result.remaining_hops, 0);
            }
            other => panic!("Expected immediate failure, got {:?}", other),
        }
        assert!(round.mode().is_playing()); // No result dwell
    }

    #[test]
    fn test_opponent_return_costs_a_hop() {
        let (mut round, mut rng) = playing_round(Size::new(80, 24), &[0, 0]);
        let top = round.opponent().y();
        round.ball = Ball::new(Position::new(5, top + 1), Velocity::new(-1.0, 0.25), "ICMP", 8);
        round.ball_pacer = Pacer::new(1);

        assert_eq!(round.tick(&mut rng).unwrap(), Step::Continue);
        assert_eq!(round.hops(), 63);
        assert_eq!(round.ball().velocity().dx, 1.0);
        assert_eq!(round.ball().head().x, 5);
    }

    #[test]
    fn test_human_return_may_speed_up() {
        let (mut round, mut rng) = playing_round(Size::new(80, 24), &[0, 0, 1]);
        let top = round.human().y();
        round.ball = Ball::new(Position::new(75, top + 1), Velocity::new(1.0, 0.25), "ICMP", 8);
        round.ball_pacer = Pacer::new(1);

        round.tick(&mut rng).unwrap();
        assert_eq!(round.ball().velocity().dx, -1.0);
        assert_eq!(round.ball().head().x, 75);
        assert_eq!(round.ball_interval(), 8);
    }

    #[test]
    fn test_keys_move_human_within_court() {
        let mut rng = ScriptedRandom::new(&[0, 0]);
        let mut round = new_round(Size::new(80, 24), &mut rng);
        let start = round.human().y();

        round.handle(Event::Key(Key::Up), &mut rng).unwrap();
        assert_eq!(round.human().y(), start - 1);

        for _ in 0..30 {
            round.handle(Event::Key(Key::Up), &mut rng).unwrap();
        }
        assert_eq!(round.human().y(), 2);

        for _ in 0..30 {
            round.handle(Event::Key(Key::Down), &mut rng).unwrap();
        }
        assert_eq!(round.human().y(), 18); // 18 + 4 == bottom wall 22
    }

    #[test]
    fn test_abort_key() {
        let mut rng = ScriptedRandom::new(&[0, 0]);
        let mut round = new_round(Size::new(80, 24), &mut rng);
        assert_eq!(round.handle(Event::Key(Key::Abort), &mut rng), Ok(Step::Aborted));
    }

    #[test]
    fn test_resize_keeps_fitting_paddles_and_recenters_others() {
        let mut rng = ScriptedRandom::new(&[0, 0]);
        let mut round = new_round(Size::new(80, 24), &mut rng);
        for _ in 0..7 {
            round.handle(Event::Key(Key::Up), &mut rng).unwrap();
        }
        assert_eq!(round.human().y(), 3);
        assert_eq!(round.opponent().y(), 10);
        round.hops = 5;
        round.mode = RoundMode::Playing;

        round.handle(Event::Resize(Size::new(60, 20)), &mut rng).unwrap();
        assert_eq!(round.human().position, Position::new(56, 3));
        assert_eq!(round.opponent().y(), 10);
        assert_eq!(round.hops(), 64);
        assert_eq!(round.mode(), RoundMode::OpeningMessage(150));

        round.handle(Event::Resize(Size::new(40, 15)), &mut rng).unwrap();
        assert_eq!(round.human().y(), 3);
        assert_eq!(round.opponent().y(), 5); // (15 - 4) / 2
        assert_eq!(round.court().bottom_wall_y(), 13);
    }

    #[test]
    fn test_narrow_terminal_waits_then_fails() {
        let mut rng = ScriptedRandom::new(&[0, 0]);
        let mut round = new_round(Size::new(20, 10), &mut rng);
        assert!(round.is_narrow());

        let steps = run_ticks(&mut round, &mut rng, 149);
        assert!(steps.iter().all(|s| *s == Step::Continue));

        let err = round.tick(&mut rng).unwrap_err();
        assert_eq!(
            err,
            RoundError::TerminalTooSmall {
                width: 20,
                height: 10,
                min_width: 30,
                min_height: 15,
            }
        );
        assert_eq!(
            err.to_string(),
            "This term(20x10) is too narrow. Requires 30x15 area"
        );
    }

    #[test]
    fn test_resize_rescues_narrow_terminal() {
        let mut rng = ScriptedRandom::new(&[0, 0]);
        let mut round = new_round(Size::new(20, 10), &mut rng);
        run_ticks(&mut round, &mut rng, 100);

        round.handle(Event::Resize(Size::new(80, 24)), &mut rng).unwrap();
        let steps = run_ticks(&mut round, &mut rng, 200);
        assert!(steps.iter().all(|s| *s == Step::Continue));
        assert!(!round.mode().is_opening());
    }
}
