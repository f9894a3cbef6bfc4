// Author: Dustin Pilgrim
// License: MIT

use std::time::Duration;

use crate::core::visibility::DEFAULT_TRANSITION;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LullConfig {
    /// Idle time before the overlay hides.
    pub timeout: Duration,
    pub auto_hide: bool,
    pub auto_start: bool,
    /// Fade length; zero applies visibility changes instantly.
    pub transition: Duration,
}

impl Default for LullConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            auto_hide: true,
            auto_start: true,
            transition: DEFAULT_TRANSITION,
        }
    }
}

/// Command-line values that win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub timeout: Option<Duration>,
    pub transition: Option<Duration>,
    pub no_auto_hide: bool,
    pub no_auto_start: bool,
}

impl LullConfig {
    pub fn with_overrides(mut self, o: &Overrides) -> Self {
        if let Some(timeout) = o.timeout {
            self.timeout = timeout;
        }
        if let Some(transition) = o.transition {
            self.transition = transition;
        }
        if o.no_auto_hide {
            self.auto_hide = false;
        }
        if o.no_auto_start {
            self.auto_start = false;
        }
        self
    }
}
