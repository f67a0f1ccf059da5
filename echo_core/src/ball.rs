//! Ball motion, trail and pacing.

use crate::types::{FloatPosition, Position, RandomSource, Size, Velocity};

/// Map an integer offset to a vertical velocity.
///
/// Used both for the random serve and for the impact row relative to a
/// paddle. Fine control near the paddle centre, coarse at the extremes.
/// Negative values point up.
pub fn decide_vertical_velocity(offset: i32) -> f32 {
    match offset {
        n if n <= -1 => -1.0,
        0 => -0.5,
        1 => -0.25,
        2 => 0.25,
        3 => 0.5,
        _ => 1.0,
    }
}

/// One rendered cell of the ball trail
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Shadow {
    pub position: Position,
    pub character: char,
}

/// The ball: sub-cell physics state plus a fixed-length trail.
///
/// Trail positions live in a ring indexed from `head`; logical index 0 is the
/// newest position. Characters stay attached to logical indices, so the
/// payload always reads front to back along the trail.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    position: FloatPosition,
    velocity: Velocity,
    trail: Vec<Position>,
    glyphs: Vec<char>,
    head: usize,
    speed_level: u32,
    max_speed_level: u32,
}

impl Ball {
    /// Create a ball with every shadow stacked on `(x, y)`.
    ///
    /// An empty payload is replaced by a single `*` so the ball always has a
    /// head.
    pub fn new(start: Position, velocity: Velocity, payload: &str, max_speed_level: u32) -> Self {
        let mut glyphs: Vec<char> = payload.chars().collect();
        if glyphs.is_empty() {
            glyphs.push('*');
        }
        Ball {
            position: start.into(),
            velocity,
            trail: vec![start; glyphs.len()],
            glyphs,
            head: 0,
            speed_level: 0,
            max_speed_level,
        }
    }

    /// Serve from the left edge at a random row in the middle third
    pub fn serve(
        size: Size,
        payload: &str,
        max_speed_level: u32,
        rng: &mut impl RandomSource,
    ) -> Self {
        let third = (size.height / 3).max(1);
        let y = rng.int_n(third as u32) as i32 + size.height / 3;
        let dy = decide_vertical_velocity(rng.int_n(4) as i32);
        Ball::new(Position::new(1, y), Velocity::new(1.0, dy), payload, max_speed_level)
    }

    /// Move by one velocity step and push the new head onto the trail
    pub fn advance(&mut self) {
        self.position.x += self.velocity.dx;
        self.position.y += self.velocity.dy;

        let len = self.trail.len();
        self.head = (self.head + len - 1) % len;
        self.trail[self.head] = self.position.cell();
    }

    /// Leading cell, used for every collision test
    pub fn head(&self) -> Position {
        self.trail[self.head]
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn float_position(&self) -> FloatPosition {
        self.position
    }

    /// Reposition the head and replace the velocity; older shadows are kept
    pub fn set_state(&mut self, head: Position, velocity: Velocity) {
        self.position = head.into();
        self.velocity = velocity;
        self.trail[self.head] = head;
    }

    /// Raise the speed level by one, up to the maximum
    pub fn speed_up(&mut self) {
        if self.speed_level < self.max_speed_level {
            self.speed_level += 1;
        }
    }

    pub fn speed_level(&self) -> u32 {
        self.speed_level
    }

    /// Ticks between advances at the current speed, never below one
    pub fn interval(&self, base_interval: u32) -> u32 {
        base_interval.saturating_sub(self.speed_level).max(1)
    }

    /// Trail length, equal to the payload character count
    pub fn len(&self) -> usize {
        self.trail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trail.is_empty()
    }

    /// Shadows from newest (head) to oldest
    pub fn shadows(&self) -> impl DoubleEndedIterator<Item = Shadow> + '_ {
        let len = self.trail.len();
        self.glyphs.iter().enumerate().map(move |(i, &character)| Shadow {
            position: self.trail[(self.head + i) % len],
            character,
        })
    }
}

/// Counts clock ticks down to the next action.
///
/// A shorter period takes effect immediately: a pending wait longer than the
/// new period is cut to it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Pacer {
    remaining: u32,
}

impl Pacer {
    pub fn new(period: u32) -> Self {
        Pacer {
            remaining: period.max(1),
        }
    }

    /// Count one tick; true when the action is due
    pub fn tick(&mut self, period: u32) -> bool {
        let period = period.max(1);
        self.remaining = self.remaining.min(period).saturating_sub(1);
        if self.remaining == 0 {
            self.remaining = period;
            true
        } else {
            false
        }
    }
}
