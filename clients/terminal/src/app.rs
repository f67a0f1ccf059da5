use crate::event::{Event, EventHandler};
use echo_core::{Event as GameEvent, Flow, Key, MatchOutcome, RandomSource, Session, Size};
use ratatui::{
    backend::Backend,
    crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    Terminal,
};

fn map_key_event(event: KeyEvent) -> Option<Key> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    match event.code {
        KeyCode::Char('c') | KeyCode::Char('C')
            if event.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            Some(Key::Abort)
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(Key::Abort),
        KeyCode::Up | KeyCode::Char('k') => Some(Key::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Key::Down),
        _ => None,
    }
}

/// Main application: the match plus the event stream that drives it
pub struct App<R: RandomSource> {
    /// Match state
    pub session: Session<R>,
    /// Event handler
    pub events: EventHandler,
}

impl<R: RandomSource> App<R> {
    pub fn new(session: Session<R>, events: EventHandler) -> Self {
        Self { session, events }
    }

    /// Run the application's main loop until the match ends
    pub async fn run<B: Backend>(
        mut self,
        terminal: &mut Terminal<B>,
    ) -> color_eyre::Result<MatchOutcome> {
        loop {
            terminal.draw(|frame| frame.render_widget(&self, frame.area()))?;
            if let Some(outcome) = self.handle_events().await? {
                // Leave the last frame up for the report to follow
                terminal.draw(|frame| frame.render_widget(&self, frame.area()))?;
                return Ok(outcome);
            }
        }
    }

    /// Wait for one event and feed it to the session
    pub async fn handle_events(&mut self) -> color_eyre::Result<Option<MatchOutcome>> {
        let event = match self.events.next().await? {
            Event::Tick => GameEvent::Tick,
            Event::Key(key_event) => match map_key_event(key_event) {
                Some(key) => GameEvent::Key(key),
                None => return Ok(None),
            },
            Event::Resize(width, height) => {
                GameEvent::Resize(Size::new(i32::from(width), i32::from(height)))
            }
        };

        match self.session.handle(event)? {
            Flow::Continue => Ok(None),
            Flow::Done(outcome) => Ok(Some(outcome)),
        }
    }
}
