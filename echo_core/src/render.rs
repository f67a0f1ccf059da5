//! Frame composition: the cells to paint for the current round.

use crate::mode::RoundMode;
use crate::round::Round;
use crate::types::Position;

const WALL_GLYPH: char = '=';
const EDGE_GLYPH: &str = "|";
const LOCALHOST_LABEL: &str = " localhost ";
const NARROW_MESSAGE: &str = "This term is too narrow.";

/// One painted terminal cell
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cell {
    pub position: Position,
    pub character: char,
}

/// Cells in painter order; later cells cover earlier ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scene {
    cells: Vec<Cell>,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    pub fn put_char(&mut self, x: i32, y: i32, character: char) {
        self.cells.push(Cell {
            position: Position::new(x, y),
            character,
        });
    }

    /// Left to right from `(x, y)`
    pub fn put_str(&mut self, x: i32, y: i32, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            self.put_char(x + i as i32, y, ch);
        }
    }

    /// Repeat `text` down a column for `height` rows
    pub fn put_column(&mut self, x: i32, y: i32, height: i32, text: &str) {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return;
        }
        for row in 0..height.max(0) {
            self.put_char(x, y + row, chars[row as usize % chars.len()]);
        }
    }

    /// Centre `text` horizontally on row `y` of a `width`-wide area
    pub fn put_centered(&mut self, width: i32, y: i32, text: &str) {
        let len = text.chars().count() as i32;
        self.put_str((width - len) / 2, y, text);
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Last character painted at `(x, y)`, if any
    pub fn char_at(&self, x: i32, y: i32) -> Option<char> {
        let target = Position::new(x, y);
        self.cells
            .iter()
            .rev()
            .find(|c| c.position == target)
            .map(|c| c.character)
    }

    /// Text of row `y` across `width` columns, blanks where nothing is painted
    pub fn row_text(&self, y: i32, width: i32) -> String {
        (0..width).map(|x| self.char_at(x, y).unwrap_or(' ')).collect()
    }
}

/// Opening text for round `seq`
pub fn opening_message(seq: u32) -> String {
    format!("start icmp_seq={}", seq)
}

/// Build the full frame for a round
pub fn compose(round: &Round, seq: u32, destination: &str) -> Scene {
    let mut scene = Scene::new();
    let court = round.court();
    let width = court.width();
    let height = court.height();

    if round.is_narrow() {
        scene.put_centered(width, height / 2, NARROW_MESSAGE);
        return scene;
    }

    for y in [court.top_wall_y(), court.bottom_wall_y()] {
        for x in 0..width {
            scene.put_char(x, y, WALL_GLYPH);
        }
    }

    let edge_top = court.top_wall_y() + 1;
    scene.put_column(0, edge_top, court.bottom_wall_y() - edge_top, EDGE_GLYPH);
    let label_len = LOCALHOST_LABEL.chars().count() as i32;
    scene.put_column(0, (height - label_len) / 2, label_len, LOCALHOST_LABEL);

    for (position, ch) in round.human().cells() {
        scene.put_char(position.x, position.y, ch);
    }

    match round.mode() {
        RoundMode::OpeningMessage(_) => {
            scene.put_centered(width, height / 2, &opening_message(seq));
        }
        RoundMode::Playing => {
            draw_ball_and_opponent(&mut scene, round);
        }
        RoundMode::ResultMessage(_) => {
            draw_ball_and_opponent(&mut scene, round);
            if let Some(result) = round.outcome() {
                let text = if result.received {
                    format!("received. time={}", result.elapsed_seconds)
                } else {
                    "request timed out".to_string()
                };
                scene.put_centered(width, height / 2, &text);
            }
        }
        RoundMode::Ended => {}
    }

    scene.put_str(1, 0, &format!("pong {}", destination));

    let status = format!("  icmp_seq={} ttl={}", seq, round.hops());
    scene.put_str(width - status.chars().count() as i32 - 1, 0, &status);

    let bps = round.config().bits_per_second(round.ball_interval());
    scene.put_str(1, height - 1, &format!("Speed: {}bps", bps));

    scene
}

fn draw_ball_and_opponent(scene: &mut Scene, round: &Round) {
    // Oldest shadow first so the head ends up on top
    for shadow in round.ball().shadows().rev() {
        scene.put_char(shadow.position.x, shadow.position.y, shadow.character);
    }
    for (position, ch) in round.opponent().cells() {
        scene.put_char(position.x, position.y, ch);
    }
}
