// Author: Dustin Pilgrim
// License: MIT

use std::io::BufRead;
use std::sync::{Arc, Mutex};

use eyre::Result;
use serde_json::json;
use tokio::sync::{mpsc, watch};

use lull::{
    GestureRecognizer, GestureState, IdleTimer, InteractionSource, TouchSurface, Visibility,
    VisibilityCoordinator, config::LullConfig, core::info::millis, ldebug, linfo, lwarn,
    utils::format_duration_readable,
};

use super::input::{HELP_MESSAGE, SessionCmd, TouchPhase, parse_command};
use super::overlay::{ControlsOverlay, PlayerControls};

enum Flow {
    Continue,
    Quit,
}

/// A video view with a tap-to-toggle controls overlay.
pub struct Session {
    surface: Arc<TouchSurface>,
    tap: Arc<GestureRecognizer>,
    pan: Arc<GestureRecognizer>,
    controls: PlayerControls,
    coordinator: VisibilityCoordinator<ControlsOverlay>,
}

impl Session {
    pub fn new(cfg: &LullConfig) -> Result<Self> {
        let overlay = Arc::new(Mutex::new(ControlsOverlay::new(true)));

        let surface = Arc::new(TouchSurface::new("video"));
        let tap = Arc::new(GestureRecognizer::new("tap"));
        let pan = Arc::new(GestureRecognizer::new("pan"));
        let controls = PlayerControls::new();

        let mut sources: Vec<Arc<dyn InteractionSource>> = vec![
            surface.clone() as Arc<dyn InteractionSource>,
            tap.clone() as Arc<dyn InteractionSource>,
            pan.clone() as Arc<dyn InteractionSource>,
        ];
        sources.extend(controls.sources());

        let timer = IdleTimer::new(sources, cfg.timeout)?;

        let coordinator = VisibilityCoordinator::new(overlay, &tap, cfg.auto_start)?;
        coordinator.set_auto_hide(cfg.auto_hide);
        coordinator.set_transition(cfg.transition);
        coordinator.set_idle_timer(Some(timer));

        linfo!(
            "Session",
            "overlay up, idle timeout {} (auto-hide {}, auto-start {})",
            format_duration_readable(cfg.timeout),
            cfg.auto_hide,
            cfg.auto_start
        );

        Ok(Self {
            surface,
            tap,
            pan,
            controls,
            coordinator,
        })
    }

    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let (tx, mut rx) = mpsc::channel::<SessionCmd>(64);
        spawn_stdin_reader(tx);

        println!("lull: type 'help' for commands");

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        linfo!("Session", "stopping (shutdown requested)");
                        break;
                    }
                }

                maybe = rx.recv() => {
                    let Some(cmd) = maybe else {
                        linfo!("Session", "stopping (end of input)");
                        break;
                    };

                    if let Flow::Quit = self.handle(cmd) {
                        linfo!("Session", "stopping (quit)");
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    fn handle(&mut self, cmd: SessionCmd) -> Flow {
        ldebug!("Session", "command: {:?}", cmd);

        match cmd {
            SessionCmd::Tap => self.tap.recognize(),

            SessionCmd::Touch(phase) => match phase {
                TouchPhase::Down => self.surface.touches_began(),
                TouchPhase::Up => self.surface.touches_ended(),
                TouchPhase::Cancel => self.surface.touches_cancelled(),
            },

            SessionCmd::Pan(state) => {
                self.pan.set_state(state);
                if matches!(
                    state,
                    GestureState::Ended | GestureState::Cancelled | GestureState::Failed
                ) {
                    self.pan.reset();
                }
            }

            SessionCmd::Control { name, pressed } => self.press(&name, pressed),

            SessionCmd::SetTimeout(timeout) => {
                self.coordinator.with_idle_timer(|t| t.set_timeout(timeout));
                println!("idle timeout set to {}", format_duration_readable(timeout));
            }

            SessionCmd::Pause => {
                self.coordinator.with_idle_timer(IdleTimer::pause);
            }
            SessionCmd::Resume => {
                self.coordinator.with_idle_timer(IdleTimer::resume);
            }

            SessionCmd::Show => self.coordinator.set_visibility(false, true),
            SessionCmd::Hide => self.coordinator.set_visibility(true, true),

            // Consumed by the reader.
            SessionCmd::Wait(_) => {}

            SessionCmd::Status { json } => self.print_status(json),
            SessionCmd::Help => println!("{HELP_MESSAGE}"),
            SessionCmd::Quit => return Flow::Quit,
        }

        Flow::Continue
    }

    fn press(&mut self, name: &str, pressed: bool) {
        let Some(control) = self.controls.get(name).cloned() else {
            lwarn!("Session", "no control named '{}'", name);
            return;
        };

        if pressed {
            // Controls on a hidden overlay cannot be hit.
            if self.coordinator.visibility() == Visibility::Hidden {
                println!("overlay hidden, '{name}' is out of reach");
                return;
            }
            control.begin_tracking();
            return;
        }

        // A touch already being tracked still ends, even once the overlay hid.
        let was_tracking = control.is_tracking();
        if !was_tracking && self.coordinator.visibility() == Visibility::Hidden {
            return;
        }

        control.end_tracking();
        if was_tracking {
            if let Some(msg) = self.controls.released(name) {
                println!("{msg}");
            }
        }
    }

    fn print_status(&self, json: bool) {
        let visibility = self.coordinator.visibility();
        let snapshot = self.coordinator.with_idle_timer(IdleTimer::snapshot);

        if json {
            let out = json!({
                "overlay": visibility,
                "auto_hide": self.coordinator.auto_hide(),
                "transition_ms": millis(self.coordinator.transition()),
                "timer": snapshot,
            });
            println!("{out}");
            return;
        }

        match snapshot {
            Some(s) => println!("overlay {visibility}; {}", s.pretty_text()),
            None => println!("overlay {visibility}; no idle timer"),
        }
    }
}

/// Reads commands on a plain thread so a blocked read never holds up exit.
fn spawn_stdin_reader(tx: mpsc::Sender<SessionCmd>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    lwarn!("Session", "stdin read failed: {}", e);
                    break;
                }
            };

            match parse_command(&line) {
                Ok(Some(SessionCmd::Wait(d))) => std::thread::sleep(d),
                Ok(Some(cmd)) => {
                    if tx.blocking_send(cmd).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => eprintln!("lull: {e}"),
            }
        }
    });
}
