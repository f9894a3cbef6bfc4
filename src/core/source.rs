// Author: Dustin Pilgrim
// License: MIT

//! Interaction sources.
//!
//! Anything that can tell an [`IdleTimer`](crate::core::timer::IdleTimer)
//! "the user started interacting" and "the user stopped" implements
//! [`InteractionSource`]. The adapters here cover the usual toolkit shapes:
//! raw touch surfaces, gesture recognizers and tracking controls.

use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
};

use crate::core::{
    events::{ControlKind, GestureState, Interaction},
    timer::TimerLink,
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Capability to report interaction begin/end to an attached timer.
pub trait InteractionSource: Send + Sync {
    /// Points this source at a timer, replacing any previous one.
    fn attach(&self, link: TimerLink);

    /// Clears the back-reference, but only if it still points at `link`'s timer.
    fn detach_from(&self, link: &TimerLink);

    fn is_attached(&self) -> bool;
}

/// Back-reference slot embedded in every adapter.
#[derive(Debug, Default)]
pub struct SourceLink {
    timer: Mutex<Option<TimerLink>>,
}

impl SourceLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, link: TimerLink) {
        *lock(&self.timer) = Some(link);
    }

    pub fn clear_if(&self, link: &TimerLink) {
        let mut slot = lock(&self.timer);
        if slot.as_ref().is_some_and(|current| current.same_timer(link)) {
            *slot = None;
        }
    }

    pub fn is_attached(&self) -> bool {
        lock(&self.timer).as_ref().is_some_and(TimerLink::is_alive)
    }

    /// Forwards to the attached timer, if there is one.
    pub fn report(&self, interaction: Interaction) {
        // Never call into the timer while holding our own lock.
        let link = lock(&self.timer).clone();
        if let Some(link) = link {
            link.report(interaction);
        }
    }
}

impl InteractionSource for SourceLink {
    fn attach(&self, link: TimerLink) {
        self.set(link);
    }

    fn detach_from(&self, link: &TimerLink) {
        self.clear_if(link);
    }

    fn is_attached(&self) -> bool {
        SourceLink::is_attached(self)
    }
}

macro_rules! delegate_source {
    ($ty:ty) => {
        impl InteractionSource for $ty {
            fn attach(&self, link: TimerLink) {
                self.link.set(link);
            }

            fn detach_from(&self, link: &TimerLink) {
                self.link.clear_if(link);
            }

            fn is_attached(&self) -> bool {
                self.link.is_attached()
            }
        }
    };
}

// ---------------- touch surface ----------------

/// A plain view receiving raw touches.
#[derive(Debug)]
pub struct TouchSurface {
    name: String,
    link: SourceLink,
}

impl TouchSurface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: SourceLink::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn touches_began(&self) {
        self.link.report(Interaction::Began);
    }

    pub fn touches_ended(&self) {
        self.link.report(Interaction::Ended);
    }

    pub fn touches_cancelled(&self) {
        self.link.report(Interaction::Ended);
    }
}

delegate_source!(TouchSurface);

// ---------------- gesture recognizer ----------------

pub type GestureAction = Arc<dyn Fn() + Send + Sync>;

/// A gesture recognizer that emits every state transition explicitly.
///
/// `Began` suspends the timer, `Changed` is ignored and every other state
/// restarts it. Action targets run when the gesture is recognized, i.e. when
/// it enters `Ended`.
pub struct GestureRecognizer {
    name: String,
    link: SourceLink,
    state: Mutex<GestureState>,
    targets: Mutex<Vec<GestureAction>>,
}

impl GestureRecognizer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: SourceLink::new(),
            state: Mutex::new(GestureState::Possible),
            targets: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> GestureState {
        *lock(&self.state)
    }

    pub fn add_target<F>(&self, action: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        lock(&self.targets).push(Arc::new(action));
    }

    pub fn target_count(&self) -> usize {
        lock(&self.targets).len()
    }

    /// Moves to `state`, notifying the attached timer and, on recognition,
    /// the action targets.
    pub fn set_state(&self, state: GestureState) {
        *lock(&self.state) = state;

        if let Some(interaction) = state.interaction() {
            self.link.report(interaction);
        }

        if state == GestureState::Ended {
            let targets = lock(&self.targets).clone();
            for action in targets {
                action();
            }
        }
    }

    /// Returns to `Possible` without notifying anyone.
    pub fn reset(&self) {
        *lock(&self.state) = GestureState::Possible;
    }

    /// A discrete tap: recognized, then reset.
    pub fn recognize(&self) {
        self.set_state(GestureState::Ended);
        self.reset();
    }
}

impl std::fmt::Debug for GestureRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureRecognizer")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("targets", &self.target_count())
            .finish()
    }
}

delegate_source!(GestureRecognizer);

// ---------------- tracking controls ----------------

/// A button, slider or switch that tracks a touch from press to release.
#[derive(Debug)]
pub struct Control {
    kind: ControlKind,
    name: String,
    link: SourceLink,
    tracking: AtomicBool,
}

impl Control {
    pub fn new(kind: ControlKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            link: SourceLink::new(),
            tracking: AtomicBool::new(false),
        }
    }

    pub fn button(name: impl Into<String>) -> Self {
        Self::new(ControlKind::Button, name)
    }

    pub fn slider(name: impl Into<String>) -> Self {
        Self::new(ControlKind::Slider, name)
    }

    pub fn switch(name: impl Into<String>) -> Self {
        Self::new(ControlKind::Switch, name)
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking.load(Ordering::Relaxed)
    }

    /// Press/drag start. Reported for every control kind.
    pub fn begin_tracking(&self) {
        self.tracking.store(true, Ordering::Relaxed);
        self.link.report(Interaction::Began);
    }

    /// Release, including a release whose press was never seen.
    pub fn end_tracking(&self) {
        self.tracking.store(false, Ordering::Relaxed);
        self.link.report(Interaction::Ended);
    }
}

delegate_source!(Control);
