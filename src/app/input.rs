// Author: Dustin Pilgrim
// License: MIT

use std::time::Duration;

use lull::{GestureState, utils::parse_duration};

pub const HELP_MESSAGE: &str = r#"Commands (one per line):
  tap                               Tap the video: toggles the overlay
  touch down|up|cancel              Raw touch on the video surface
  pan began|changed|ended|cancelled|failed
                                    Drive the pan gesture's state
  play|volume|switch down|up        Press or release an overlay control
  timeout <DURATION>                Change the idle timeout (e.g. 3s, 750ms)
  pause | resume                    Pause or resume the idle timer
  show | hide                       Show or hide the overlay
  wait <DURATION>                   Stop reading input for a while (scripts)
  status [json]                     Print overlay and timer state
  help                              Show this message
  quit                              Exit"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Up,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCmd {
    Tap,
    Touch(TouchPhase),
    Pan(GestureState),
    Control { name: String, pressed: bool },
    SetTimeout(Duration),
    Pause,
    Resume,
    Show,
    Hide,
    Wait(Duration),
    Status { json: bool },
    Help,
    Quit,
}

/// Parses one input line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<SessionCmd>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let head = words.next().unwrap_or_default().to_lowercase();
    let rest: Vec<&str> = words.collect();

    let cmd = match head.as_str() {
        "tap" => SessionCmd::Tap,

        "touch" => match rest.first().copied() {
            Some("down") | Some("began") => SessionCmd::Touch(TouchPhase::Down),
            Some("up") | Some("ended") => SessionCmd::Touch(TouchPhase::Up),
            Some("cancel") | Some("cancelled") => SessionCmd::Touch(TouchPhase::Cancel),
            _ => return Err("usage: touch down|up|cancel".to_string()),
        },

        "pan" => {
            let state = rest
                .first()
                .and_then(|s| GestureState::parse(s))
                .ok_or_else(|| "usage: pan began|changed|ended|cancelled|failed".to_string())?;
            SessionCmd::Pan(state)
        }

        "play" | "volume" | "switch" => {
            let pressed = match rest.first().copied() {
                Some("down") | Some("press") => true,
                Some("up") | Some("release") => false,
                _ => return Err(format!("usage: {head} down|up")),
            };
            SessionCmd::Control { name: head.clone(), pressed }
        }

        "timeout" => SessionCmd::SetTimeout(parse_duration(&rest.join(" "))?),
        "wait" | "sleep" => SessionCmd::Wait(parse_duration(&rest.join(" "))?),

        "pause" => SessionCmd::Pause,
        "resume" => SessionCmd::Resume,
        "show" => SessionCmd::Show,
        "hide" => SessionCmd::Hide,

        "status" => SessionCmd::Status {
            json: rest.first().is_some_and(|s| s.eq_ignore_ascii_case("json")),
        },

        "help" | "?" => SessionCmd::Help,
        "quit" | "exit" | "q" => SessionCmd::Quit,

        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };

    Ok(Some(cmd))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("tap").unwrap(), Some(SessionCmd::Tap));
        assert_eq!(
            parse_command("  touch cancel ").unwrap(),
            Some(SessionCmd::Touch(TouchPhase::Cancel))
        );
        assert_eq!(
            parse_command("pan changed").unwrap(),
            Some(SessionCmd::Pan(GestureState::Changed))
        );
        assert_eq!(
            parse_command("volume down").unwrap(),
            Some(SessionCmd::Control { name: "volume".to_string(), pressed: true })
        );
        assert_eq!(
            parse_command("timeout 1m 30s").unwrap(),
            Some(SessionCmd::SetTimeout(Duration::from_secs(90)))
        );
        assert_eq!(
            parse_command("wait 250ms").unwrap(),
            Some(SessionCmd::Wait(Duration::from_millis(250)))
        );
        assert_eq!(
            parse_command("status json").unwrap(),
            Some(SessionCmd::Status { json: true })
        );
        assert_eq!(parse_command("QUIT").unwrap(), Some(SessionCmd::Quit));

        // Nothing to do
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("# comment").unwrap(), None);

        // Errors
        assert!(parse_command("touch sideways").is_err());
        assert!(parse_command("pan wiggle").is_err());
        assert!(parse_command("play").is_err());
        assert!(parse_command("timeout").is_err());
        assert!(parse_command("timeout 0s").is_err());
        assert!(parse_command("dance").is_err());
    }
}
