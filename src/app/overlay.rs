// Author: Dustin Pilgrim
// License: MIT

use std::sync::Arc;

use lull::{Control, InteractionSource, OverlayTarget, Visibility, ldebug};

/// The player controls panel the session shows and hides.
///
/// Prints a line whenever a fade settles on fully shown or fully hidden.
#[derive(Debug)]
pub struct ControlsOverlay {
    opacity: f32,
    settled: Visibility,
}

impl ControlsOverlay {
    pub fn new(visible: bool) -> Self {
        let settled = Visibility::from_hidden(!visible);
        Self {
            opacity: settled.opacity(),
            settled,
        }
    }
}

impl OverlayTarget for ControlsOverlay {
    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        ldebug!("Overlay", "opacity {:.2}", opacity);

        let settled = if opacity <= 0.0 {
            Visibility::Hidden
        } else if opacity >= 1.0 {
            Visibility::Shown
        } else {
            return;
        };

        if settled != self.settled {
            self.settled = settled;
            println!("overlay {settled}");
        }
    }
}

/// Controls living on the overlay.
pub struct PlayerControls {
    pub play: Arc<Control>,
    pub volume: Arc<Control>,
    pub captions: Arc<Control>,
    playing: bool,
    captions_on: bool,
}

impl PlayerControls {
    pub fn new() -> Self {
        Self {
            play: Arc::new(Control::button("play")),
            volume: Arc::new(Control::slider("volume")),
            captions: Arc::new(Control::switch("captions")),
            playing: false,
            captions_on: false,
        }
    }

    pub fn sources(&self) -> Vec<Arc<dyn InteractionSource>> {
        vec![
            self.play.clone() as Arc<dyn InteractionSource>,
            self.volume.clone() as Arc<dyn InteractionSource>,
            self.captions.clone() as Arc<dyn InteractionSource>,
        ]
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Control>> {
        match name {
            "play" => Some(&self.play),
            "volume" => Some(&self.volume),
            "switch" => Some(&self.captions),
            _ => None,
        }
    }

    /// Applies what releasing `name` does to the player.
    pub fn released(&mut self, name: &str) -> Option<String> {
        match name {
            "play" => {
                self.playing = !self.playing;
                Some(format!("playback {}", if self.playing { "playing" } else { "paused" }))
            }
            "switch" => {
                self.captions_on = !self.captions_on;
                Some(format!("captions {}", if self.captions_on { "on" } else { "off" }))
            }
            _ => None,
        }
    }
}
