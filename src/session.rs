use std::time::{Duration, Instant};

use crate::scoring::{self, Score};

/// Why a session reached its terminal phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum EndReason {
    Completed,
    TimedOut,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Typing,
    Done(EndReason),
}

/// Result frozen at the terminal transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionResult {
    pub reason: EndReason,
    pub elapsed: Duration,
    pub duration_minutes: f64,
    pub wpm: f64,
    pub accuracy: f64,
}

impl SessionResult {
    fn freeze(reason: EndReason, elapsed: Duration, score: Score) -> Self {
        Self {
            reason,
            elapsed,
            duration_minutes: elapsed.as_secs_f64() / 60.0,
            wpm: score.wpm,
            accuracy: score.accuracy,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    reference: String,
    reference_chars: Vec<char>,
    typed: Vec<char>,
    phase: Phase,
    started_at: Option<Instant>,
    result: Option<SessionResult>,
}

impl SessionState {
    pub fn new(reference: impl Into<String>) -> Self {
        let reference = reference.into();
        let reference_chars = reference.chars().collect();
        Self {
            reference,
            reference_chars,
            typed: Vec::new(),
            phase: Phase::Idle,
            started_at: None,
            result: None,
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn reference_chars(&self) -> &[char] {
        &self.reference_chars
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn typed_string(&self) -> String {
        self.typed.iter().collect()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done(_))
    }

    pub fn is_complete(&self) -> bool {
        self.typed.len() == self.reference_chars.len()
    }

    /// Moves `Idle` to `Typing`. Returns false if the session already started.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.started_at = Some(now);
        self.phase = Phase::Typing;
        true
    }

    /// Appends `c` verbatim. No-op once the input is as long as the reference
    /// or the session is over.
    pub fn append_char(&mut self, c: char) -> bool {
        if self.is_done() || self.is_complete() {
            return false;
        }
        self.typed.push(c);
        true
    }

    pub fn delete_last_char(&mut self) -> bool {
        if self.is_done() {
            return false;
        }
        self.typed.pop().is_some()
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }

    /// Score at `now`, recomputed from the current input.
    pub fn score_at(&self, now: Instant) -> Score {
        scoring::score(&self.reference_chars, &self.typed, self.elapsed(now))
    }

    /// The one terminal transition. Returns false if the session was already
    /// done, in which case nothing changes.
    ///
    /// Completed and timed out sessions freeze a result measured up to `now`;
    /// cancelled sessions end without one.
    pub fn finish(&mut self, reason: EndReason, now: Instant) -> bool {
        if self.is_done() {
            return false;
        }

        self.phase = Phase::Done(reason);
        self.result = match reason {
            EndReason::Cancelled => None,
            EndReason::Completed | EndReason::TimedOut => Some(SessionResult::freeze(
                reason,
                self.elapsed(now),
                self.score_at(now),
            )),
        };
        true
    }
}
