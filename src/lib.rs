// Author: Dustin Pilgrim
// License: MIT

//! Idle-timeout detection for interactive overlays.
//!
//! [`IdleTimer`] keeps a single countdown that any registered interaction
//! source can suspend and restart. [`VisibilityCoordinator`] ties one to a
//! toggle gesture and an overlay so the overlay hides itself once the user
//! stops interacting.

pub mod config;
pub mod core;
pub mod log;
pub mod utils;

pub use crate::core::{
    error::Error,
    events::{ControlKind, GestureState, Interaction},
    info::TimerSnapshot,
    source::{Control, GestureRecognizer, InteractionSource, SourceLink, TouchSurface},
    timer::{IdleTimer, TimerLink, TimerState},
    visibility::{OverlayTarget, SharedTarget, Visibility, VisibilityCoordinator},
};
