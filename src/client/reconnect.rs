//! Reconnection state machine with bounded exponential backoff.

use std::time::Duration;

const BACKOFF_BASE_MILLIS: u64 = 1_000;
const BACKOFF_CAP_MILLIS: u64 = 30_000;

/// Backoff delay after `failures` consecutive failures: min(2^n × 1s, 30s)
pub fn backoff_delay(failures: u32) -> Duration {
    let factor = 2u64.saturating_pow(failures.min(15));
    Duration::from_millis((factor * BACKOFF_BASE_MILLIS).min(BACKOFF_CAP_MILLIS))
}

/// Connection lifecycle state of the viewer client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectState {
    Disconnected,
    Connecting,
    Connected,
    Backoff,
}

/// Drives the reconnection lifecycle for a single logical connection.
///
/// At most one connection attempt is in flight at any time. Every attempt
/// carries a generation token; results reported with a stale token are
/// discarded, so a slow attempt that resolves after a shutdown or a newer
/// attempt cannot corrupt the state machine.
#[derive(Debug)]
pub struct ReconnectController {
    state: ReconnectState,
    failures: u32,
    generation: u64,
}

impl ReconnectController {
    pub fn new() -> Self {
        Self {
            state: ReconnectState::Disconnected,
            failures: 0,
            generation: 0,
        }
    }

    pub fn state(&self) -> ReconnectState {
        self.state
    }

    /// Start a connection attempt.
    ///
    /// Returns the generation token for the attempt, or `None` if an
    /// attempt is already in flight or a connection is live.
    pub fn begin_connect(&mut self) -> Option<u64> {
        match self.state {
            ReconnectState::Disconnected | ReconnectState::Backoff => {
                self.generation += 1;
                self.state = ReconnectState::Connecting;
                Some(self.generation)
            }
            ReconnectState::Connecting | ReconnectState::Connected => None,
        }
    }

    /// Report that the attempt with `generation` established a connection.
    ///
    /// Resets the failure counter so the next disconnect backs off from
    /// the start of the schedule. Returns `false` for stale tokens.
    pub fn on_connected(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.state != ReconnectState::Connecting {
            return false;
        }
        self.state = ReconnectState::Connected;
        self.failures = 0;
        true
    }

    /// Report that the attempt failed to connect, or that an established
    /// connection dropped.
    ///
    /// Returns the delay to wait before the next attempt, or `None` for
    /// stale tokens.
    pub fn on_failure(&mut self, generation: u64) -> Option<Duration> {
        if generation != self.generation {
            return None;
        }
        match self.state {
            ReconnectState::Connecting | ReconnectState::Connected => {
                let delay = backoff_delay(self.failures);
                self.failures += 1;
                self.state = ReconnectState::Backoff;
                Some(delay)
            }
            ReconnectState::Disconnected | ReconnectState::Backoff => None,
        }
    }

    /// Stop reconnecting. Invalidates any in-flight attempt.
    pub fn shutdown(&mut self) {
        self.generation += 1;
        self.state = ReconnectState::Disconnected;
    }
}

impl Default for ReconnectController {
    fn default() -> Self {
        Self::new()
    }
}
