use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use crate::input::KeyInput;
use crate::runtime::SessionEvent;
use crate::scoring::Score;
use crate::session::{EndReason, Phase, SessionState};
use crate::timeout::TimeoutMonitor;

/// Whether the event loop should keep going after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// One typing test: session state plus the timer that can end it.
///
/// All mutation happens through [`TypingTest::on_event`] on the event loop
/// thread. The timeout monitor only posts an event back into that loop, so
/// whichever of completion or timeout is processed first wins.
#[derive(Debug)]
pub struct TypingTest {
    session: SessionState,
    timeout: Duration,
    events: Sender<SessionEvent>,
    monitor: Option<TimeoutMonitor>,
}

impl TypingTest {
    pub fn new(
        reference: impl Into<String>,
        timeout: Duration,
        events: Sender<SessionEvent>,
    ) -> Self {
        Self {
            session: SessionState::new(reference),
            timeout,
            events,
            monitor: None,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn has_started(&self) -> bool {
        self.session.started_at().is_some()
    }

    /// Frozen result once done, live values otherwise.
    pub fn score(&self, now: Instant) -> Score {
        match self.session.result() {
            Some(result) => Score {
                accuracy: result.accuracy,
                wpm: result.wpm,
            },
            None => self.session.score_at(now),
        }
    }

    pub fn seconds_remaining(&self, now: Instant) -> Option<f64> {
        if self.session.phase() != Phase::Typing {
            return None;
        }
        let left = self.timeout.saturating_sub(self.session.elapsed(now));
        Some(left.as_secs_f64())
    }

    pub fn on_event(&mut self, event: SessionEvent, now: Instant) -> Flow {
        match event {
            SessionEvent::Key(key) => self.on_key(KeyInput::from(key), now),
            SessionEvent::Timeout(fired_at) => self.on_timeout(fired_at),
            // the event loop treats a failed source as fatal before it gets here
            SessionEvent::Resize | SessionEvent::Tick | SessionEvent::SourceFailed(_) => {
                self.flow()
            }
        }
    }

    pub fn on_key(&mut self, key: KeyInput, now: Instant) -> Flow {
        if self.session.is_done() {
            return Flow::Exit;
        }

        match key {
            KeyInput::Cancel => {
                self.finish(EndReason::Cancelled, now);
            }
            KeyInput::Char(c) => {
                self.start_if_idle(now);
                self.session.append_char(c);
                if self.session.is_complete() {
                    self.finish(EndReason::Completed, now);
                }
            }
            KeyInput::Backspace => {
                self.start_if_idle(now);
                self.session.delete_last_char();
            }
            KeyInput::Other => {}
        }

        self.flow()
    }

    pub fn on_timeout(&mut self, fired_at: Instant) -> Flow {
        match self.session.phase() {
            Phase::Typing => {
                log::info!("time up");
                self.finish(EndReason::TimedOut, fired_at);
            }
            // no monitor runs before the first keystroke
            Phase::Idle => log::debug!("ignoring timeout before the session started"),
            Phase::Done(_) => {}
        }
        self.flow()
    }

    fn flow(&self) -> Flow {
        if self.session.is_done() {
            Flow::Exit
        } else {
            Flow::Continue
        }
    }

    fn start_if_idle(&mut self, now: Instant) {
        if self.session.start(now) {
            log::info!("session started, timeout in {:?}", self.timeout);
            self.monitor = Some(TimeoutMonitor::spawn(now + self.timeout, self.events.clone()));
        }
    }

    fn finish(&mut self, reason: EndReason, now: Instant) {
        if !self.session.finish(reason, now) {
            return;
        }

        if let Some(monitor) = self.monitor.take() {
            monitor.cancel();
        }

        match self.session.result() {
            Some(result) => log::info!(
                "session {}: {:.2} wpm, {:.2}% accuracy in {:.2}s",
                reason,
                result.wpm,
                result.accuracy,
                result.elapsed.as_secs_f64()
            ),
            None => log::info!("session {}", reason),
        }
    }
}
