//! Human-readable intervals like `30s`, `10m`, `1h`.

use std::time::Duration;

/// Parse interval string like "1h", "30m", "90s", "1d" or raw seconds.
pub fn parse_interval(s: &str) -> Result<Duration, String> {
    let s = s.trim().to_lowercase();

    let (number, unit, multiplier) = if let Some(hours) = s.strip_suffix('h') {
        (hours, "hours", 3600)
    } else if let Some(minutes) = s.strip_suffix('m') {
        (minutes, "minutes", 60)
    } else if let Some(days) = s.strip_suffix('d') {
        (days, "days", 86400)
    } else if let Some(secs) = s.strip_suffix('s') {
        (secs, "seconds", 1)
    } else {
        let secs = s
            .parse::<u64>()
            .map_err(|_| format!("Invalid interval: {}. Use format like '30s', '10m', '1h'", s))?;
        return Ok(Duration::from_secs(secs));
    };

    let secs = number
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(|| format!("Invalid {}: {}", unit, number.trim()))?;

    Ok(Duration::from_secs(secs))
}

/// Format interval for display
pub fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs >= 86400 && secs % 86400 == 0 {
        format!("{}d", secs / 86400)
    } else if secs >= 3600 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}
