// Author: Dustin Pilgrim
// License: MIT

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};

use serde::Serialize;
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{Instant, sleep_until},
};

use crate::{
    core::{
        error::{Error, RuntimeError},
        events::Interaction,
        info::TimerSnapshot,
        source::InteractionSource,
    },
    ldebug,
};

/// Callback run when a countdown elapses.
pub type TimeoutHandler = Arc<dyn Fn() + Send + Sync>;

// Roughly 30 years; stands in for deadlines past what `Instant` can hold.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `start + after`, saturating at a far-future deadline instead of overflowing.
pub(crate) fn deadline_after(start: Instant, after: Duration) -> Instant {
    start
        .checked_add(after)
        .or_else(|| start.checked_add(FAR_FUTURE))
        .unwrap_or(start)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Never resumed.
    Idle,
    Running,
    Paused,
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
        };
        write!(f, "{s}")
    }
}

/// The one scheduled countdown. Its task only fires if `generation` is still
/// the live one when it wakes.
struct Countdown {
    generation: u64,
    deadline: Instant,
    task: JoinHandle<()>,
}

struct Inner {
    timeout: Duration,
    on_timeout: Option<TimeoutHandler>,
    active: Option<Countdown>,
    started: bool,
    generation: u64,
    sources: Vec<Weak<dyn InteractionSource>>,
}

pub(crate) struct Shared {
    inner: Mutex<Inner>,
    runtime: Handle,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Retires the live generation and aborts its task.
    fn cancel(inner: &mut Inner) -> bool {
        inner.generation = inner.generation.wrapping_add(1);

        match inner.active.take() {
            Some(countdown) => {
                countdown.task.abort();
                true
            }
            None => false,
        }
    }

    fn schedule(self: &Arc<Self>, inner: &mut Inner) {
        Self::cancel(inner);

        let generation = inner.generation;
        // Deadline is fixed now, not when the task first gets polled.
        let deadline = deadline_after(Instant::now(), inner.timeout);
        let weak = Arc::downgrade(self);

        let task = self.runtime.spawn(async move {
            sleep_until(deadline).await;

            if let Some(shared) = weak.upgrade() {
                shared.elapse(generation);
            }
        });

        inner.active = Some(Countdown {
            generation,
            deadline,
            task,
        });
        inner.started = true;
    }

    fn pause(&self) {
        let mut inner = self.lock();
        if Self::cancel(&mut inner) {
            ldebug!("IdleTimer", "countdown cancelled");
        }
    }

    fn resume(self: &Arc<Self>) {
        let mut inner = self.lock();
        self.schedule(&mut inner);
        ldebug!("IdleTimer", "countdown scheduled ({:?})", inner.timeout);
    }

    fn elapse(&self, generation: u64) {
        let handler = {
            let mut inner = self.lock();

            match &inner.active {
                Some(countdown) if countdown.generation == generation => {}
                // Cancelled or replaced while we were waking up.
                _ => return,
            }

            // Paused before the handler runs so it may resume() freely.
            // Dropping our own JoinHandle detaches rather than aborts.
            inner.active = None;
            inner.on_timeout.clone()
        };

        ldebug!("IdleTimer", "countdown elapsed");

        if let Some(handler) = handler {
            handler();
        }
    }

    fn report(self: &Arc<Self>, interaction: Interaction) {
        match interaction {
            Interaction::Began => self.pause(),
            // Sources may never report a begin; schedule() cancels first, so
            // this is a pause and resume under one lock.
            Interaction::Ended => self.resume(),
        }
    }
}

/// Single-countdown idle detector.
///
/// Owns exactly one pending countdown at a time. Interaction sources report
/// begin/end through a [`TimerLink`]; any interaction suspends the countdown
/// and the end of one restarts it from the full timeout.
///
/// Dropping the timer cancels the countdown and detaches every source it
/// attached. A countdown task only holds a weak reference back to the timer.
pub struct IdleTimer {
    shared: Arc<Shared>,
}

impl IdleTimer {
    /// Builds a timer on the current tokio runtime.
    pub fn new<I>(sources: I, timeout: Duration) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Arc<dyn InteractionSource>>,
    {
        let runtime = Handle::try_current().map_err(|_| RuntimeError::NoRuntime)?;
        Ok(Self::with_handle(runtime, sources, timeout))
    }

    pub fn with_handle<I>(runtime: Handle, sources: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = Arc<dyn InteractionSource>>,
    {
        let timer = Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    timeout,
                    on_timeout: None,
                    active: None,
                    started: false,
                    generation: 0,
                    sources: Vec::new(),
                }),
                runtime,
            }),
        };

        for source in sources {
            timer.attach_dyn(source);
        }

        timer
    }

    pub fn timeout(&self) -> Duration {
        self.shared.lock().timeout
    }

    /// Changes the countdown length, restarting a running countdown with it.
    pub fn set_timeout(&self, timeout: Duration) {
        let mut inner = self.shared.lock();
        inner.timeout = timeout;

        if inner.active.is_some() {
            Shared::cancel(&mut inner);
            self.shared.schedule(&mut inner);
            ldebug!("IdleTimer", "timeout changed to {:?}, countdown restarted", timeout);
        }
    }

    pub fn set_on_timeout<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.set_timeout_handler(Some(Arc::new(handler)));
    }

    pub fn clear_on_timeout(&self) {
        self.set_timeout_handler(None);
    }

    pub(crate) fn set_timeout_handler(&self, handler: Option<TimeoutHandler>) {
        self.shared.lock().on_timeout = handler;
    }

    /// Schedules a fresh countdown, replacing any pending one.
    pub fn resume(&self) {
        self.shared.resume();
    }

    /// Cancels the pending countdown. No-op when nothing is scheduled.
    pub fn pause(&self) {
        self.shared.pause();
    }

    pub fn interaction_began(&self) {
        self.shared.report(Interaction::Began);
    }

    pub fn interaction_ended(&self) {
        self.shared.report(Interaction::Ended);
    }

    pub fn state(&self) -> TimerState {
        let inner = self.shared.lock();
        if inner.active.is_some() {
            TimerState::Running
        } else if inner.started {
            TimerState::Paused
        } else {
            TimerState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().active.is_some()
    }

    /// Time left on the pending countdown, if any.
    pub fn remaining(&self) -> Option<Duration> {
        let inner = self.shared.lock();
        inner
            .active
            .as_ref()
            .map(|c| c.deadline.saturating_duration_since(Instant::now()))
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::new(
            self.state(),
            self.timeout(),
            self.remaining(),
            self.source_count(),
        )
    }

    /// Non-owning handle for sources and other collaborators.
    pub fn link(&self) -> TimerLink {
        TimerLink {
            shared: Arc::downgrade(&self.shared),
        }
    }

    pub fn attach_source<S>(&self, source: Arc<S>)
    where
        S: InteractionSource + 'static,
    {
        let source: Arc<dyn InteractionSource> = source;
        self.attach_dyn(source);
    }

    /// Replaces the attached sources, detaching the previous ones.
    pub fn set_sources<I>(&self, sources: I)
    where
        I: IntoIterator<Item = Arc<dyn InteractionSource>>,
    {
        self.clear_sources();
        for source in sources {
            self.attach_dyn(source);
        }
    }

    /// Detaches every source this timer attached.
    pub fn clear_sources(&self) {
        let detached = std::mem::take(&mut self.shared.lock().sources);
        let link = self.link();

        for source in detached.iter().filter_map(Weak::upgrade) {
            source.detach_from(&link);
        }
    }

    /// Number of attached sources still alive.
    pub fn source_count(&self) -> usize {
        let mut inner = self.shared.lock();
        inner.sources.retain(|s| s.strong_count() > 0);
        inner.sources.len()
    }

    fn attach_dyn(&self, source: Arc<dyn InteractionSource>) {
        source.attach(self.link());

        let mut inner = self.shared.lock();
        let weak = Arc::downgrade(&source);
        if !inner.sources.iter().any(|s| s.ptr_eq(&weak)) {
            inner.sources.push(weak);
        }
    }
}

impl fmt::Debug for IdleTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdleTimer")
            .field("state", &self.state())
            .field("timeout", &self.timeout())
            .finish()
    }
}

impl Drop for IdleTimer {
    fn drop(&mut self) {
        {
            let mut inner = self.shared.lock();
            Shared::cancel(&mut inner);
            inner.on_timeout = None;
        }
        self.clear_sources();
        ldebug!("IdleTimer", "disposed");
    }
}

/// Weak, cloneable reference to an [`IdleTimer`].
///
/// Every call is a no-op once the timer has been dropped.
#[derive(Clone)]
pub struct TimerLink {
    shared: Weak<Shared>,
}

impl TimerLink {
    pub fn report(&self, interaction: Interaction) {
        if let Some(shared) = self.shared.upgrade() {
            shared.report(interaction);
        }
    }

    pub fn interaction_began(&self) {
        self.report(Interaction::Began);
    }

    pub fn interaction_ended(&self) {
        self.report(Interaction::Ended);
    }

    pub fn is_alive(&self) -> bool {
        self.shared.strong_count() > 0
    }

    /// True if both links refer to the same timer.
    pub fn same_timer(&self, other: &TimerLink) -> bool {
        self.shared.ptr_eq(&other.shared)
    }
}

impl fmt::Debug for TimerLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerLink")
            .field("alive", &self.is_alive())
            .finish()
    }
}
