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
        source::GestureRecognizer,
        timer::{IdleTimer, TimeoutHandler, deadline_after},
    },
    ldebug,
};

pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(200);

/// Fade step; roughly one display frame.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// The overlay a coordinator shows and hides.
///
/// Opacity `0.0` means hidden; anything above is shown.
pub trait OverlayTarget: Send + 'static {
    fn opacity(&self) -> f32;
    fn set_opacity(&mut self, opacity: f32);
}

pub type SharedTarget<T> = Arc<Mutex<T>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Shown,
    Hidden,
}

impl Visibility {
    pub fn from_hidden(hidden: bool) -> Self {
        if hidden { Visibility::Hidden } else { Visibility::Shown }
    }

    pub fn opacity(self) -> f32 {
        match self {
            Visibility::Shown => 1.0,
            Visibility::Hidden => 0.0,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Shown => write!(f, "shown"),
            Visibility::Hidden => write!(f, "hidden"),
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Linear progress of a fade, clamped to `[0, 1]`.
fn fade_progress(start: Instant, duration: Duration, now: Instant) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start).as_secs_f32();
    (elapsed / duration.as_secs_f32()).clamp(0.0, 1.0)
}

struct Fade {
    id: u64,
    to: Visibility,
    task: JoinHandle<()>,
}

struct CoordinatorState<T: OverlayTarget> {
    runtime: Handle,
    target: SharedTarget<T>,
    idle_timer: Option<IdleTimer>,
    auto_start: bool,
    auto_hide: bool,
    transition: Duration,
    fade: Option<Fade>,
    fade_seq: u64,
}

impl<T: OverlayTarget> CoordinatorState<T> {
    /// Where the overlay is, or where it is heading if a fade is in flight.
    fn visibility(&self) -> Visibility {
        match &self.fade {
            Some(fade) if !fade.task.is_finished() => fade.to,
            _ => {
                if lock(&self.target).opacity() <= 0.0 {
                    Visibility::Hidden
                } else {
                    Visibility::Shown
                }
            }
        }
    }

    fn cancel_fade(&mut self) {
        if let Some(fade) = self.fade.take() {
            fade.task.abort();
        }
    }

    fn apply(&mut self, this: Weak<Mutex<Self>>, to: Visibility, animated: bool) {
        self.cancel_fade();

        let end_value = to.opacity();
        let from = lock(&self.target).opacity();

        if !animated || self.transition.is_zero() || from == end_value {
            lock(&self.target).set_opacity(end_value);
            ldebug!("Overlay", "{} (instant)", to);
            return;
        }

        self.fade_seq = self.fade_seq.wrapping_add(1);
        let id = self.fade_seq;
        let duration = self.transition;
        let start = Instant::now();
        let end = deadline_after(start, duration);
        let target = self.target.clone();

        let task = self.runtime.spawn(async move {
            loop {
                let now = Instant::now();
                let progress = fade_progress(start, duration, now);

                // The last frame lands exactly on the endpoint.
                let value = if progress >= 1.0 {
                    end_value
                } else {
                    from + (end_value - from) * progress
                };
                lock(&target).set_opacity(value);

                if progress >= 1.0 {
                    break;
                }
                sleep_until((now + FRAME_INTERVAL).min(end)).await;
            }

            if let Some(state) = this.upgrade() {
                let mut state = lock(&state);
                if state.fade.as_ref().is_some_and(|f| f.id == id) {
                    state.fade = None;
                }
            }
        });

        ldebug!("Overlay", "fading to {} over {:?}", to, duration);
        self.fade = Some(Fade { id, to, task });
    }

    fn on_toggle(&mut self, this: Weak<Mutex<Self>>) {
        match self.visibility() {
            Visibility::Hidden => {
                self.apply(this, Visibility::Shown, true);
                if let Some(timer) = &self.idle_timer {
                    timer.resume();
                }
            }
            Visibility::Shown => {
                self.apply(this, Visibility::Hidden, true);
                if let Some(timer) = &self.idle_timer {
                    timer.pause();
                }
            }
        }
    }

    fn on_timeout(&mut self, this: Weak<Mutex<Self>>) {
        if !self.auto_hide {
            ldebug!("Overlay", "idle timeout ignored (auto-hide disabled)");
            return;
        }
        self.apply(this, Visibility::Hidden, true);
    }
}

/// Binds an overlay's visibility to a toggle gesture and an idle timer.
///
/// A recognized toggle flips the overlay and pauses/resumes the timer; an
/// elapsed timer hides the overlay when auto-hide is on.
pub struct VisibilityCoordinator<T: OverlayTarget> {
    state: Arc<Mutex<CoordinatorState<T>>>,
}

impl<T: OverlayTarget> VisibilityCoordinator<T> {
    pub fn new(
        target: SharedTarget<T>,
        toggle: &GestureRecognizer,
        auto_start: bool,
    ) -> Result<Self, Error> {
        let runtime = Handle::try_current().map_err(|_| RuntimeError::NoRuntime)?;
        Ok(Self::with_handle(runtime, target, toggle, auto_start))
    }

    pub fn with_handle(
        runtime: Handle,
        target: SharedTarget<T>,
        toggle: &GestureRecognizer,
        auto_start: bool,
    ) -> Self {
        let state = Arc::new(Mutex::new(CoordinatorState {
            runtime,
            target,
            idle_timer: None,
            auto_start,
            auto_hide: true,
            transition: DEFAULT_TRANSITION,
            fade: None,
            fade_seq: 0,
        }));

        let weak = Arc::downgrade(&state);
        toggle.add_target(move || {
            if let Some(state) = weak.upgrade() {
                lock(&state).on_toggle(weak.clone());
            }
        });

        Self { state }
    }

    /// Binds `timer`, returning the previously bound one (with its timeout
    /// handler removed). Resumes the new timer when auto-start is on.
    pub fn set_idle_timer(&self, timer: Option<IdleTimer>) -> Option<IdleTimer> {
        let weak = Arc::downgrade(&self.state);
        let mut state = lock(&self.state);

        if let Some(timer) = &timer {
            let this = weak.clone();
            let handler: TimeoutHandler = Arc::new(move || {
                if let Some(state) = this.upgrade() {
                    lock(&state).on_timeout(this.clone());
                }
            });
            timer.set_timeout_handler(Some(handler));

            if state.auto_start {
                timer.resume();
            }
        }

        let previous = std::mem::replace(&mut state.idle_timer, timer);
        if let Some(previous) = &previous {
            previous.clear_on_timeout();
        }
        previous
    }

    /// Runs `f` against the bound timer.
    ///
    /// The coordinator stays locked while `f` runs; `f` must not call back
    /// into this coordinator.
    pub fn with_idle_timer<R>(&self, f: impl FnOnce(&IdleTimer) -> R) -> Option<R> {
        lock(&self.state).idle_timer.as_ref().map(f)
    }

    pub fn auto_start(&self) -> bool {
        lock(&self.state).auto_start
    }

    pub fn auto_hide(&self) -> bool {
        lock(&self.state).auto_hide
    }

    /// When off, elapsed timeouts leave the overlay alone.
    pub fn set_auto_hide(&self, enabled: bool) {
        lock(&self.state).auto_hide = enabled;
    }

    pub fn transition(&self) -> Duration {
        lock(&self.state).transition
    }

    pub fn set_transition(&self, duration: Duration) {
        lock(&self.state).transition = duration;
    }

    pub fn visibility(&self) -> Visibility {
        lock(&self.state).visibility()
    }

    /// Same as a recognized toggle gesture.
    pub fn toggle(&self) {
        let weak = Arc::downgrade(&self.state);
        lock(&self.state).on_toggle(weak);
    }

    pub fn set_visibility(&self, hidden: bool, animated: bool) {
        let weak = Arc::downgrade(&self.state);
        lock(&self.state).apply(weak, Visibility::from_hidden(hidden), animated);
    }
}

impl<T: OverlayTarget> Drop for VisibilityCoordinator<T> {
    fn drop(&mut self) {
        lock(&self.state).cancel_fade();
    }
}
