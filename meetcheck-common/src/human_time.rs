//! Human-readable swim time formatting
//!
//! Meet databases store every time as a number of seconds. Results sheets show
//! them as `M:SS.ss` once a swim passes a minute, and as `SS.ss` below that.

/// Display used for a recorded time of exactly zero (entered but did not swim)
pub const NO_SHOW: &str = "NS";

/// Display used when no time was recorded at all
pub const NO_TIME: &str = "NT";

/// Format seconds as a results-sheet swim time.
///
/// Rounds to hundredths before splitting into minutes so `59.999` becomes
/// `1:00.00` rather than `60.00`.
///
/// # Examples
///
/// ```
/// use meetcheck_common::human_time::format_swim_time;
///
/// assert_eq!(format_swim_time(28.7), "28.70");
/// assert_eq!(format_swim_time(65.43), "1:05.43");
/// assert_eq!(format_swim_time(0.0), "NS");
/// ```
pub fn format_swim_time(seconds: f64) -> String {
    if seconds == 0.0 {
        return NO_SHOW.to_string();
    }
    if !seconds.is_finite() {
        return NO_TIME.to_string();
    }

    let is_negative = seconds < 0.0;
    let hundredths = (seconds.abs() * 100.0).round() as i64;
    let minutes = hundredths / 6000;
    let rem = hundredths % 6000;
    let secs = rem / 100;
    let frac = rem % 100;

    let formatted = if minutes > 0 {
        format!("{}:{:02}.{:02}", minutes, secs, frac)
    } else {
        format!("{}.{:02}", secs, frac)
    };

    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Format an optional time; `None` renders as [`NO_TIME`].
///
/// ```
/// use meetcheck_common::human_time::format_swim_time_opt;
///
/// assert_eq!(format_swim_time_opt(Some(31.05)), "31.05");
/// assert_eq!(format_swim_time_opt(None), "NT");
/// ```
pub fn format_swim_time_opt(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) => format_swim_time(s),
        None => NO_TIME.to_string(),
    }
}
