use crate::core::clock::Clock;
use crate::core::renderer;
use crate::core::session::{Control, Session};
use anyhow::Result;
use crossterm::event::{self, Event};
use rand::Rng;
use ratatui::DefaultTerminal;
use std::time::Duration;
use tracing::info;

/// Redraw cadence (~30 fps)
const RENDER_EVERY: Duration = Duration::from_millis(33);
/// How often due reveal ticks and cue expiries are checked
const PUMP_EVERY: Duration = Duration::from_millis(50);

pub struct Engine<C, R> {
    session: Session<C, R>,
}

impl<C: Clock, R: Rng> Engine<C, R> {
    pub fn new(session: Session<C, R>) -> Self {
        Self { session }
    }

    /// Drive the session until the player quits. Returns the final score.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<u32> {
        let mut render_timer = tokio::time::interval(RENDER_EVERY);
        let mut pump_timer = tokio::time::interval(PUMP_EVERY);

        loop {
            // INPUT (non-blocking); keys queued between wakeups are all drained
            while event::poll(Duration::ZERO)? {
                if let Event::Key(key) = event::read()? {
                    if self.session.handle_key(key) == Control::Quit {
                        let score = self.session.game().score();
                        info!(score, rounds = self.session.game().rounds_started(), "player quit");
                        return Ok(score);
                    }
                }
            }

            tokio::select! {
                _ = render_timer.tick() => {
                    let view = self.session.view();
                    terminal.draw(|f| renderer::render(f, &view))?;
                }

                _ = pump_timer.tick() => {
                    self.session.pump();
                }
            }
        }
    }
}
