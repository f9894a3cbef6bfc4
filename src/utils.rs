// Author: Dustin Pilgrim
// License: MIT

use std::time::Duration;

/// Parse a duration string like "200ms", "5s", "1m" or "1m 30s".
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let duration = parse_duration_allow_zero(s)?;
    if duration.is_zero() {
        return Err("Duration must be greater than 0".to_string());
    }
    Ok(duration)
}

/// Like [`parse_duration`], but "0s" or "0ms" is accepted.
pub fn parse_duration_allow_zero(s: &str) -> Result<Duration, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("Duration must not be empty".to_string());
    }

    let mut total_ms = 0u64;

    for part in trimmed.split_whitespace() {
        // Find where the number ends and unit begins
        let split_pos = part
            .chars()
            .position(|c| !c.is_ascii_digit())
            .ok_or_else(|| format!("Invalid duration format: '{}' (missing unit)", part))?;

        let (num_str, unit) = part.split_at(split_pos);
        let num: u64 = num_str
            .parse()
            .map_err(|_| format!("Invalid number: '{}'", num_str))?;

        let multiplier = match unit.to_lowercase().as_str() {
            "ms" | "msec" | "msecs" | "millis" | "milliseconds" => 1,
            "s" | "sec" | "secs" | "second" | "seconds" => 1_000,
            "m" | "min" | "mins" | "minute" | "minutes" => 60_000,
            "h" | "hr" | "hrs" | "hour" | "hours" => 3_600_000,
            _ => return Err(format!("Unknown time unit: '{}' (use ms, s, m, or h)", unit)),
        };

        total_ms = total_ms.saturating_add(num.saturating_mul(multiplier));
    }

    Ok(Duration::from_millis(total_ms))
}

pub fn format_duration_readable(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs == 0 && millis > 0 {
        return format!("{}ms", millis);
    }

    if secs < 60 && millis > 0 {
        let exact = format!("{}.{:03}", secs, millis);
        return format!("{}s", exact.trim_end_matches('0'));
    }

    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let remaining_secs = secs % 60;

    if hours > 0 && mins > 0 && remaining_secs > 0 {
        format!("{}h {}m {}s", hours, mins, remaining_secs)
    } else if hours > 0 && mins > 0 {
        format!("{}h {}m", hours, mins)
    } else if hours > 0 && remaining_secs > 0 {
        format!("{}h {}s", hours, remaining_secs)
    } else if mins > 0 && remaining_secs > 0 {
        format!("{}m {}s", mins, remaining_secs)
    } else if hours > 0 {
        format!("{}h", hours)
    } else if mins > 0 {
        format!("{}m", mins)
    } else {
        format!("{}s", remaining_secs)
    }
}
