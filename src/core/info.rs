// Author: Dustin Pilgrim
// License: MIT

use std::time::Duration;

use serde::Serialize;

use crate::{core::timer::TimerState, utils::format_duration_readable};

/// Whole milliseconds, saturating at `u64::MAX`.
pub fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Point-in-time view of an [`IdleTimer`](crate::core::timer::IdleTimer).
///
/// - the serialized fields are the stable JSON contract for `status json`.
/// - `pretty_text()` is what the interactive `status` command prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub timeout_ms: u64,
    pub remaining_ms: Option<u64>,
    pub sources: usize,
}

impl TimerSnapshot {
    pub fn new(
        state: TimerState,
        timeout: Duration,
        remaining: Option<Duration>,
        sources: usize,
    ) -> Self {
        Self {
            state,
            timeout_ms: millis(timeout),
            remaining_ms: remaining.map(millis),
            sources,
        }
    }

    pub fn pretty_text(&self) -> String {
        let timeout = format_duration_readable(Duration::from_millis(self.timeout_ms));

        match self.remaining_ms {
            Some(ms) => format!(
                "timer {} ({} left of {}), {} source(s) attached",
                self.state,
                format_duration_readable(Duration::from_millis(ms)),
                timeout,
                self.sources,
            ),
            None => format!(
                "timer {} (timeout {}), {} source(s) attached",
                self.state, timeout, self.sources,
            ),
        }
    }
}
