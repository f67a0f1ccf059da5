//! Round phases and their timing.

/// Phase of a round. Message phases carry the ticks left on screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RoundMode {
    /// Showing the opening message before the serve
    OpeningMessage(u32),
    /// Ball in play; left only through a boundary or hop-budget check
    Playing,
    /// Showing the result while the ball flies out
    ResultMessage(u32),
    /// Round fully finished
    Ended,
}

impl RoundMode {
    pub fn opening(message_ticks: u32) -> Self {
        RoundMode::OpeningMessage(message_ticks)
    }

    pub fn result(message_ticks: u32) -> Self {
        RoundMode::ResultMessage(message_ticks)
    }

    /// State after one clock tick
    pub fn advance(self) -> Self {
        match self {
            RoundMode::OpeningMessage(n) if n > 1 => RoundMode::OpeningMessage(n - 1),
            RoundMode::OpeningMessage(_) => RoundMode::Playing,
            RoundMode::ResultMessage(n) if n > 1 => RoundMode::ResultMessage(n - 1),
            RoundMode::ResultMessage(_) => RoundMode::Ended,
            other => other,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, RoundMode::Playing)
    }

    pub fn is_opening(&self) -> bool {
        matches!(self, RoundMode::OpeningMessage(_))
    }

    pub fn is_result(&self) -> bool {
        matches!(self, RoundMode::ResultMessage(_))
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, RoundMode::Ended)
    }
}
