//! Walls, paddles and the reflections between them and the ball.

use crate::ball::{decide_vertical_velocity, Ball};
use crate::types::{Position, Size, Velocity};

/// Horizontal barrier spanning the court width
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Wall {
    pub y: i32,
    pub width: i32,
}

impl Wall {
    pub fn new(y: i32, width: i32) -> Self {
        Wall { y, width }
    }

    pub fn collides(&self, p: Position) -> bool {
        0 <= p.x && p.x < self.width && p.y == self.y
    }

    /// Bounce the ball back to the inbound side if it sits on this wall
    pub fn reflect(&self, ball: &mut Ball) -> bool {
        let head = ball.head();
        if !self.collides(head) {
            return false;
        }

        let v = ball.velocity();
        let y = if v.dy < 0.0 { self.y + 1 } else { self.y - 1 };
        ball.set_state(Position::new(head.x, y), Velocity::new(v.dx, -v.dy));
        true
    }
}

/// Axis-aligned paddle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paddle {
    pub position: Position,
    pub size: Size,
    pub glyphs: Vec<char>,
}

impl Paddle {
    pub fn new(position: Position, size: Size, glyphs: &str) -> Self {
        Paddle {
            position,
            size,
            glyphs: glyphs.chars().collect(),
        }
    }

    pub fn x(&self) -> i32 {
        self.position.x
    }

    pub fn y(&self) -> i32 {
        self.position.y
    }

    pub fn move_y(&mut self, dy: i32) {
        self.position.y += dy;
    }

    pub fn collides(&self, p: Position) -> bool {
        self.position.x <= p.x
            && p.x < self.position.x + self.size.width
            && self.position.y <= p.y
            && p.y < self.position.y + self.size.height
    }

    /// Send the ball back if its head is inside the paddle.
    ///
    /// The outgoing angle comes from the row the ball occupied one step
    /// before impact, so it does not depend on where the tick boundary fell.
    /// The head is placed one cell outside the paddle on the outgoing side.
    pub fn reflect(&self, ball: &mut Ball) -> bool {
        if !self.collides(ball.head()) {
            return false;
        }

        let v = ball.velocity();
        let impact_row = (ball.float_position().y - v.dy).floor() as i32;
        let dx = -v.dx;
        let dy = decide_vertical_velocity(impact_row - self.position.y);

        let x = if dx < 0.0 {
            self.position.x - 1
        } else {
            self.position.x + self.size.width
        };
        ball.set_state(Position::new(x, impact_row), Velocity::new(dx, dy));
        true
    }

    /// Glyph for the cell at column `col`, row `row` within the paddle
    pub fn glyph_at(&self, col: i32, row: i32) -> char {
        if self.glyphs.is_empty() {
            return '|';
        }
        let index = (row * self.size.width + col) as usize;
        self.glyphs[index % self.glyphs.len()]
    }

    /// Every cell of the paddle with its glyph, row-major
    pub fn cells(&self) -> impl Iterator<Item = (Position, char)> + '_ {
        (0..self.size.height).flat_map(move |row| {
            (0..self.size.width).map(move |col| {
                (
                    Position::new(self.position.x + col, self.position.y + row),
                    self.glyph_at(col, row),
                )
            })
        })
    }
}
