//! Core types and constants for the echo Pong engine.

use std::fmt;

/// Payload header used as the ball body when no padding is given
pub const PACKET_HEADER: &str = "ICMP ECHO";

/// Rows reserved above the court for the status line
pub const TOP_HEIGHT: i32 = 1;

/// Discrete terminal cell coordinate
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

/// Rectangle or terminal size in cells
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Size { width, height }
    }
}

/// Sub-cell ball position
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct FloatPosition {
    pub x: f32,
    pub y: f32,
}

impl FloatPosition {
    pub fn new(x: f32, y: f32) -> Self {
        FloatPosition { x, y }
    }

    /// Cell containing this point
    pub fn cell(&self) -> Position {
        Position::new(self.x.floor() as i32, self.y.floor() as i32)
    }
}

impl From<Position> for FloatPosition {
    fn from(p: Position) -> Self {
        FloatPosition::new(p.x as f32, p.y as f32)
    }
}

/// Ball velocity in cells per advance.
///
/// `dx` is always ±1; `dy` is one of ±1, ±0.5, ±0.25. Negative `dy` is upward.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Velocity {
    pub dx: f32,
    pub dy: f32,
}

impl Velocity {
    pub fn new(dx: f32, dy: f32) -> Self {
        Velocity { dx, dy }
    }
}

/// The court: the full terminal area minus the status rows
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Court {
    pub size: Size,
}

impl Court {
    pub fn new(size: Size) -> Self {
        Court { size }
    }

    pub fn width(&self) -> i32 {
        self.size.width
    }

    pub fn height(&self) -> i32 {
        self.size.height
    }

    /// Row of the top wall
    pub fn top_wall_y(&self) -> i32 {
        TOP_HEIGHT
    }

    /// Row of the bottom wall
    pub fn bottom_wall_y(&self) -> i32 {
        self.size.height - 2
    }

    /// Whether the terminal is below the playable minimum
    pub fn is_narrow(&self, config: &Config) -> bool {
        self.size.width < config.min_width || self.size.height < config.min_height
    }

    /// Whether a paddle whose top row is `y` lies strictly between the walls
    pub fn paddle_fits(&self, y: i32, paddle_height: i32) -> bool {
        TOP_HEIGHT < y && y + paddle_height <= self.bottom_wall_y()
    }

    /// Keep a remembered paddle row if it still fits, otherwise centre it
    pub fn correct_paddle_y(&self, remembered: Option<i32>, paddle_height: i32) -> i32 {
        match remembered {
            Some(y) if self.paddle_fits(y, paddle_height) => y,
            _ => (self.size.height - paddle_height) / 2,
        }
    }
}

/// Keys the engine understands
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Abort,
}

/// Events consumed by the engine, one at a time
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    /// Fixed-period clock tick
    Tick,
    /// Key press
    Key(Key),
    /// Terminal resized to the given size
    Resize(Size),
}

/// Outcome of one round. Immutable once produced.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RoundResult {
    /// Whether the echo came back
    pub received: bool,
    /// Hop budget left when the round ended
    pub remaining_hops: i32,
    /// Wall-clock seconds from serve to result
    pub elapsed_seconds: u64,
}

impl RoundResult {
    pub fn received(remaining_hops: i32, elapsed_seconds: u64) -> Self {
        RoundResult {
            received: true,
            remaining_hops,
            elapsed_seconds,
        }
    }

    /// A lost packet reports neither hops nor time
    pub fn lost() -> Self {
        RoundResult {
            received: false,
            remaining_hops: 0,
            elapsed_seconds: 0,
        }
    }
}

/// Source of uniformly distributed integers
pub trait RandomSource {
    /// Uniform integer in `[0, n)`. `n` must be positive.
    fn int_n(&mut self, n: u32) -> u32;

    /// Fair coin
    fn coin(&mut self) -> bool {
        self.int_n(2) == 1
    }
}

impl<R: rand::Rng + ?Sized> RandomSource for R {
    fn int_n(&mut self, n: u32) -> u32 {
        self.gen_range(0..n.max(1))
    }
}

/// Game configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Clock period in milliseconds
    pub tick_ms: u32,
    /// Ticks between ball advances at speed level zero
    pub ball_interval: u32,
    /// Upper bound of the ball speed level
    pub max_speed_level: u32,
    /// Ticks between opponent controller invocations
    pub opponent_interval: u32,
    /// Ticks the opening and result messages stay on screen
    pub message_ticks: u32,
    /// Paddle width in cells
    pub paddle_width: i32,
    /// Paddle height in cells
    pub paddle_height: i32,
    /// Minimum playable terminal width
    pub min_width: i32,
    /// Minimum playable terminal height
    pub min_height: i32,
    /// Rounds in a match
    pub rounds: u32,
    /// Opponent returns allowed per round
    pub hop_budget: i32,
    /// Ball body, one character per trail cell
    pub payload: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tick_ms: 10,
            ball_interval: 9,
            max_speed_level: 8,
            opponent_interval: 9,
            message_ticks: 150,
            paddle_width: 2,
            paddle_height: 4,
            min_width: 30,
            min_height: 15,
            rounds: 4,
            hop_budget: 64,
            payload: PACKET_HEADER.to_string(),
        }
    }
}

impl Config {
    /// Payload with an optional padding pattern appended
    pub fn payload_with_padding(padding: Option<&str>) -> String {
        match padding {
            Some(p) if !p.is_empty() => format!("{PACKET_HEADER}:{p}"),
            _ => PACKET_HEADER.to_string(),
        }
    }

    /// Check the configuration before starting a match
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.payload.chars().next().is_none() {
            return Err(ConfigError::EmptyPayload);
        }
        if self.ball_interval == 0 {
            return Err(ConfigError::ZeroInterval("ball"));
        }
        if self.opponent_interval == 0 {
            return Err(ConfigError::ZeroInterval("opponent"));
        }
        if self.message_ticks == 0 {
            return Err(ConfigError::ZeroInterval("message"));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroInterval("tick"));
        }
        if self.paddle_width <= 0 || self.paddle_height <= 0 {
            return Err(ConfigError::InvalidPaddle {
                width: self.paddle_width,
                height: self.paddle_height,
            });
        }
        Ok(())
    }

    /// Slowest speed level reachable given the base interval
    pub fn speed_level_cap(&self) -> u32 {
        self.max_speed_level
            .min(self.ball_interval.saturating_sub(1))
    }

    /// Throughput label for a ball interval, in bits per second
    pub fn bits_per_second(&self, interval: u32) -> u32 {
        8 * 1000 / (self.tick_ms * interval.max(1))
    }
}

/// Errors raised by [`Config::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The ball body has no characters
    EmptyPayload,
    /// A tick interval was zero
    ZeroInterval(&'static str),
    /// A paddle dimension was not positive
    InvalidPaddle { width: i32, height: i32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPayload => write!(f, "Payload must not be empty"),
            ConfigError::ZeroInterval(which) => {
                write!(f, "The {} interval must be positive", which)
            }
            ConfigError::InvalidPaddle { width, height } => {
                write!(f, "Invalid paddle size {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
