//! Opponent paddle heuristic.

use crate::physics::Paddle;
use crate::types::{Court, Position, RandomSource, Velocity};

/// What the controller saw and decided on one invocation
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Ball is heading for the opponent on its half: follow it
    Chase(i32),
    /// Sit between the human paddle and the ball
    Cover(i32),
    /// Stay put this time
    Idle,
}

impl Decision {
    pub fn target(&self) -> Option<i32> {
        match self {
            Decision::Chase(y) | Decision::Cover(y) => Some(*y),
            Decision::Idle => None,
        }
    }
}

/// Pick a target row for the opponent paddle
pub fn decide(
    court: &Court,
    head: Position,
    velocity: Velocity,
    human_y: i32,
    paddle_height: i32,
    rng: &mut impl RandomSource,
) -> Decision {
    if velocity.dx < 0.0 && head.x < court.width() / 2 {
        Decision::Chase(head.y)
    } else if rng.coin() {
        let human_center = human_y + paddle_height / 2;
        Decision::Cover((human_center + head.y) / 2)
    } else {
        Decision::Idle
    }
}

/// Run one controller step. The paddle moves at most one row, and only if it
/// stays inside the court. Returns the row delta actually applied.
pub fn step(
    paddle: &mut Paddle,
    court: &Court,
    head: Position,
    velocity: Velocity,
    human_y: i32,
    hops: i32,
    rng: &mut impl RandomSource,
) -> i32 {
    let decision = decide(court, head, velocity, human_y, paddle.size.height, rng);
    let Some(target) = decision.target() else {
        return 0;
    };

    // Parity shift keeps the paddle from settling into lock-step with the ball
    let center = paddle.y() + paddle.size.height / 2 - hops.rem_euclid(2);
    let dy = (target - center).signum();
    if dy != 0 && court.paddle_fits(paddle.y() + dy, paddle.size.height) {
        paddle.move_y(dy);
        dy
    } else {
        0
    }
}
