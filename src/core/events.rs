// Author: Dustin Pilgrim
// License: MIT

/// What a source reports to its attached timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Began,
    Ended,
}

/// Recognizer states a gesture adapter can move through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Possible,
    Began,
    Changed,
    /// Also the "recognized" state for discrete gestures such as taps.
    Ended,
    Cancelled,
    Failed,
}

impl GestureState {
    /// Maps an observed state change onto the begin/end contract.
    ///
    /// `Changed` carries no information about whether the user is still
    /// touching, so it is ignored.
    pub fn interaction(self) -> Option<Interaction> {
        match self {
            GestureState::Began => Some(Interaction::Began),
            GestureState::Changed => None,
            GestureState::Possible
            | GestureState::Ended
            | GestureState::Cancelled
            | GestureState::Failed => Some(Interaction::Ended),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "possible" => Some(GestureState::Possible),
            "began" | "begin" => Some(GestureState::Began),
            "changed" | "change" | "move" => Some(GestureState::Changed),
            "ended" | "end" | "recognized" => Some(GestureState::Ended),
            "cancelled" | "canceled" | "cancel" => Some(GestureState::Cancelled),
            "failed" | "fail" => Some(GestureState::Failed),
            _ => None,
        }
    }
}

/// Kinds of tracking controls that report through [`Control`](crate::core::source::Control).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Button,
    Slider,
    Switch,
}
