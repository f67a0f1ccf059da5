use color_eyre::eyre::{eyre, WrapErr};
use ratatui::crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::{thread, time::Duration};
use tokio::{
    sync::mpsc,
    time::{self, MissedTickBehavior},
};

/// How long the input reader blocks before checking whether anyone is still listening
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Representation of all possible events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Emitted once per clock period
    Tick,
    /// A key press
    Key(KeyEvent),
    /// The terminal changed size (width, height)
    Resize(u16, u16),
}

/// Single consumer end of the event channel, fed by the tick and input producers
pub struct EventHandler {
    /// Event sender channel
    sender: mpsc::UnboundedSender<Event>,
    /// Event receiver channel
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Start the clock task and the input thread. Must be called inside a
    /// tokio runtime.
    pub fn new(tick: Duration) -> Self {
        let handler = Self::detached();

        spawn_clock(handler.sender.clone(), tick);

        let actor = InputThread::new(handler.sender.clone());
        thread::spawn(move || {
            if let Err(e) = actor.run() {
                tracing::error!("input thread stopped: {e:#}");
            }
        });

        handler
    }

    /// A handler without producers; events arrive only through [`Self::sender`]
    pub fn detached() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    /// Another producer handle for this channel
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }

    /// Waits for the next event
    pub async fn next(&mut self) -> color_eyre::Result<Event> {
        self.receiver
            .recv()
            .await
            .ok_or_else(|| eyre!("event channel closed"))
    }
}

/// Publish a `Tick` every `period` until the channel closes. Late ticks are
/// dropped rather than bunched up.
fn spawn_clock(sender: mpsc::UnboundedSender<Event>, period: Duration) {
    tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if sender.send(Event::Tick).is_err() {
                break;
            }
        }
    });
}

/// Blocking reader that turns crossterm input into events
struct InputThread {
    sender: mpsc::UnboundedSender<Event>,
}

impl InputThread {
    fn new(sender: mpsc::UnboundedSender<Event>) -> Self {
        Self { sender }
    }

    fn run(self) -> color_eyre::Result<()> {
        while !self.sender.is_closed() {
            if !event::poll(INPUT_POLL).wrap_err("failed to poll for crossterm events")? {
                continue;
            }
            let event = event::read().wrap_err("failed to read crossterm event")?;
            let event = match event {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
                CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
                _ => continue,
            };
            if self.sender.send(event).is_err() {
                break;
            }
        }
        Ok(())
    }
}
