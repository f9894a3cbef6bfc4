// Author: Dustin Pilgrim
// License: MIT

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::advance;

use crate::core::source::{GestureRecognizer, InteractionSource};
use crate::core::timer::{IdleTimer, TimerState};
use crate::core::visibility::{
    DEFAULT_TRANSITION, OverlayTarget, SharedTarget, Visibility, VisibilityCoordinator,
};

const FIVE: Duration = Duration::from_secs(5);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

async fn wait(d: Duration) {
    advance(d).await;
    settle().await;
}

#[derive(Debug)]
struct TestOverlay {
    opacity: f32,
    writes: Vec<f32>,
}

impl OverlayTarget for TestOverlay {
    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        self.writes.push(opacity);
    }
}

fn overlay(opacity: f32) -> SharedTarget<TestOverlay> {
    Arc::new(Mutex::new(TestOverlay {
        opacity,
        writes: Vec::new(),
    }))
}

fn opacity(target: &SharedTarget<TestOverlay>) -> f32 {
    target.lock().unwrap().opacity
}

struct Rig {
    target: SharedTarget<TestOverlay>,
    tap: GestureRecognizer,
    coordinator: VisibilityCoordinator<TestOverlay>,
}

impl Rig {
    fn new(auto_start: bool) -> Self {
        let target = overlay(1.0);
        let tap = GestureRecognizer::new("tap");
        let coordinator = VisibilityCoordinator::new(target.clone(), &tap, auto_start).unwrap();
        coordinator.set_idle_timer(Some(IdleTimer::new(Vec::new(), FIVE).unwrap()));
        Self {
            target,
            tap,
            coordinator,
        }
    }

    fn timer_state(&self) -> TimerState {
        self.coordinator.with_idle_timer(|t| t.state()).unwrap()
    }

    fn remaining(&self) -> Option<Duration> {
        self.coordinator.with_idle_timer(|t| t.remaining()).unwrap()
    }
}

#[tokio::test(start_paused = true)]
async fn auto_start_resumes_the_bound_timer() {
    let rig = Rig::new(true);
    assert_eq!(rig.timer_state(), TimerState::Running);
    assert_eq!(rig.coordinator.transition(), DEFAULT_TRANSITION);
    assert!(rig.coordinator.auto_hide());

    let manual = Rig::new(false);
    assert_eq!(manual.timer_state(), TimerState::Idle);
    assert!(!manual.coordinator.auto_start());
}

#[tokio::test(start_paused = true)]
async fn toggle_hides_and_pauses_then_shows_with_a_fresh_countdown() {
    let rig = Rig::new(true);

    wait(ms(2000)).await;
    rig.coordinator.toggle();
    assert_eq!(rig.coordinator.visibility(), Visibility::Hidden);
    assert_eq!(rig.timer_state(), TimerState::Paused);

    wait(DEFAULT_TRANSITION).await;
    assert_eq!(opacity(&rig.target), 0.0);

    // Paused timer never hides anything behind our back.
    wait(ms(10_000)).await;
    assert_eq!(rig.timer_state(), TimerState::Paused);

    rig.coordinator.toggle();
    assert_eq!(rig.coordinator.visibility(), Visibility::Shown);
    assert_eq!(rig.timer_state(), TimerState::Running);
    assert_eq!(rig.remaining(), Some(FIVE));

    wait(DEFAULT_TRANSITION).await;
    assert_eq!(opacity(&rig.target), 1.0);
}

#[tokio::test(start_paused = true)]
async fn idle_timeout_hides_the_overlay() {
    let rig = Rig::new(true);

    wait(FIVE - ms(1)).await;
    assert_eq!(rig.coordinator.visibility(), Visibility::Shown);

    wait(ms(1)).await;
    assert_eq!(rig.coordinator.visibility(), Visibility::Hidden);
    assert_eq!(rig.timer_state(), TimerState::Paused);

    wait(DEFAULT_TRANSITION).await;
    assert_eq!(opacity(&rig.target), 0.0);
}

#[tokio::test(start_paused = true)]
async fn disabled_auto_hide_leaves_visibility_alone() {
    let rig = Rig::new(true);
    rig.coordinator.set_auto_hide(false);

    wait(FIVE).await;
    wait(ms(1000)).await;

    assert_eq!(rig.timer_state(), TimerState::Paused);
    assert_eq!(rig.coordinator.visibility(), Visibility::Shown);
    assert_eq!(opacity(&rig.target), 1.0);
}

#[tokio::test(start_paused = true)]
async fn recognized_tap_toggles_through_the_gesture() {
    let rig = Rig::new(true);
    let tap: Arc<GestureRecognizer> = Arc::new(GestureRecognizer::new("tap"));

    // The rig's own recognizer is wired to the coordinator.
    rig.tap.recognize();
    assert_eq!(rig.coordinator.visibility(), Visibility::Hidden);
    assert_eq!(rig.timer_state(), TimerState::Paused);

    rig.tap.recognize();
    assert_eq!(rig.coordinator.visibility(), Visibility::Shown);
    assert_eq!(rig.timer_state(), TimerState::Running);

    // An unrelated recognizer does nothing.
    tap.recognize();
    assert_eq!(rig.coordinator.visibility(), Visibility::Shown);
}

#[tokio::test(start_paused = true)]
async fn tap_that_is_also_a_source_still_ends_paused_when_hiding() {
    let target = overlay(1.0);
    let tap = Arc::new(GestureRecognizer::new("tap"));
    let coordinator = VisibilityCoordinator::new(target.clone(), &tap, true).unwrap();

    let timer =
        IdleTimer::new(vec![tap.clone() as Arc<dyn InteractionSource>], FIVE).unwrap();
    coordinator.set_idle_timer(Some(timer));

    tap.recognize();
    assert_eq!(coordinator.visibility(), Visibility::Hidden);
    assert_eq!(coordinator.with_idle_timer(|t| t.state()), Some(TimerState::Paused));

    tap.recognize();
    assert_eq!(coordinator.visibility(), Visibility::Shown);
    assert_eq!(coordinator.with_idle_timer(|t| t.state()), Some(TimerState::Running));
}

#[tokio::test(start_paused = true)]
async fn animated_fade_converges_exactly_without_overshoot() {
    let rig = Rig::new(false);

    rig.coordinator.set_visibility(true, true);
    settle().await;

    for _ in 0..6 {
        wait(ms(16)).await;
    }
    let midway = opacity(&rig.target);
    assert!(midway > 0.0 && midway < 1.0, "midway opacity was {midway}");

    wait(DEFAULT_TRANSITION).await;
    assert_eq!(opacity(&rig.target), 0.0);

    let writes = rig.target.lock().unwrap().writes.clone();
    assert!(writes.iter().all(|v| (0.0..=1.0).contains(v)));
    assert!(writes.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(writes.last(), Some(&0.0));
}

#[tokio::test(start_paused = true)]
async fn instant_visibility_changes_apply_immediately() {
    let rig = Rig::new(false);

    rig.coordinator.set_visibility(true, false);
    assert_eq!(opacity(&rig.target), 0.0);
    assert_eq!(rig.coordinator.visibility(), Visibility::Hidden);

    rig.coordinator.set_visibility(false, false);
    assert_eq!(opacity(&rig.target), 1.0);
}

#[tokio::test(start_paused = true)]
async fn zero_transition_is_instant() {
    let rig = Rig::new(false);
    rig.coordinator.set_transition(Duration::ZERO);

    rig.coordinator.set_visibility(true, true);
    assert_eq!(opacity(&rig.target), 0.0);
}

#[tokio::test(start_paused = true)]
async fn toggle_mid_fade_acts_on_the_fade_endpoint() {
    let rig = Rig::new(true);

    rig.coordinator.toggle();
    wait(ms(100)).await;
    assert!(opacity(&rig.target) > 0.0);

    // Heading to hidden, so the next toggle shows again.
    rig.coordinator.toggle();
    assert_eq!(rig.coordinator.visibility(), Visibility::Shown);
    assert_eq!(rig.timer_state(), TimerState::Running);

    wait(DEFAULT_TRANSITION).await;
    assert_eq!(opacity(&rig.target), 1.0);
}

#[tokio::test(start_paused = true)]
async fn instant_change_cancels_a_running_fade() {
    let rig = Rig::new(false);

    rig.coordinator.set_visibility(true, true);
    wait(ms(50)).await;
    rig.coordinator.set_visibility(false, false);

    wait(DEFAULT_TRANSITION).await;
    assert_eq!(opacity(&rig.target), 1.0);
}

#[tokio::test(start_paused = true)]
async fn replaced_timer_no_longer_hides_the_overlay() {
    let rig = Rig::new(true);

    let previous = rig.coordinator.set_idle_timer(None).unwrap();
    assert_eq!(previous.state(), TimerState::Running);

    wait(FIVE).await;
    assert_eq!(rig.coordinator.visibility(), Visibility::Shown);
    assert_eq!(previous.state(), TimerState::Paused);
}

#[tokio::test(start_paused = true)]
async fn toggle_without_a_timer_still_flips_visibility() {
    let target = overlay(0.0);
    let tap = GestureRecognizer::new("tap");
    let coordinator = VisibilityCoordinator::new(target.clone(), &tap, true).unwrap();

    assert_eq!(coordinator.visibility(), Visibility::Hidden);
    coordinator.toggle();
    assert_eq!(coordinator.visibility(), Visibility::Shown);
    assert_eq!(coordinator.with_idle_timer(|t| t.state()), None);
}

#[tokio::test(start_paused = true)]
async fn dropped_coordinator_ignores_taps_and_timeouts() {
    let target = overlay(1.0);
    let tap = GestureRecognizer::new("tap");
    let coordinator = VisibilityCoordinator::new(target.clone(), &tap, true).unwrap();
    coordinator.set_idle_timer(Some(IdleTimer::new(Vec::new(), FIVE).unwrap()));

    drop(coordinator);

    tap.recognize();
    wait(FIVE).await;
    assert_eq!(opacity(&target), 1.0);
    assert!(target.lock().unwrap().writes.is_empty());
}

#[tokio::test(start_paused = true)]
async fn unbounded_transition_fades_without_overflow() {
    let rig = Rig::new(false);
    rig.coordinator.set_transition(Duration::from_secs(u64::MAX));

    rig.coordinator.set_visibility(true, true);
    assert_eq!(rig.coordinator.visibility(), Visibility::Hidden);

    wait(ms(500)).await;
    let value = opacity(&rig.target);
    assert!(value > 0.0 && value <= 1.0);

    rig.coordinator.set_visibility(true, false);
    assert_eq!(opacity(&rig.target), 0.0);
}
