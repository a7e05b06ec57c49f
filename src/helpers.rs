/// Rendered for an absent duration. Older highscore files carry this shape, so it
/// stays two-digit even though real durations only show tenths.
pub const EMPTY_TIME: &str = "00:00.00";

/// Renders seconds as `MM:SS.t`, rounding to the nearest tenth (ties to even).
pub fn format_time(seconds: f64) -> String {
    let total_tenths = (seconds * 10.0).round_ties_even().max(0.0) as u64;
    let minutes = total_tenths / 600;
    let secs = (total_tenths / 10) % 60;
    let tenths = total_tenths % 10;
    format!("{:02}:{:02}.{}", minutes, secs, tenths)
}

pub fn format_optional_time(seconds: Option<f64>) -> String {
    match seconds {
        Some(seconds) => format_time(seconds),
        None => EMPTY_TIME.to_string(),
    }
}

/// Parses either plain seconds (`"65.2"`) or `M:SS(.f)` (`"1:05.2"`).
pub fn parse_time_seconds(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let seconds = match text.split_once(':') {
        Some((minutes, rest)) => {
            let minutes: i64 = minutes.trim().parse().ok()?;
            // anything after a second colon ("1:05:30") is ignored
            let seconds: f64 = rest.split(':').next()?.trim().parse().ok()?;
            minutes as f64 * 60.0 + seconds
        }
        None => text.parse().ok()?,
    };

    if seconds.is_finite() && seconds >= 0.0 {
        Some(seconds)
    } else {
        None
    }
}
