use chrono::{DateTime, Utc};

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 60.0 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: f64 = 24.0 * SECONDS_PER_HOUR;
const SECONDS_PER_MONTH: f64 = 31.0 * SECONDS_PER_DAY;
const SECONDS_PER_YEAR: f64 = 365.0 * SECONDS_PER_MONTH;

/// Smallest unit first.
const UNITS: [(&str, f64); 6] = [
    ("seconds", 1.0),
    ("minutes", SECONDS_PER_MINUTE),
    ("hours", SECONDS_PER_HOUR),
    ("days", SECONDS_PER_DAY),
    ("months", SECONDS_PER_MONTH),
    ("years", SECONDS_PER_YEAR),
];

/// Formats the time between `initial` and `now` as e.g. "2 hours ago".
///
/// Uses the largest unit that fits at least once. Counts are rounded to the
/// nearest integer with halves going down, and the unit is singular when
/// the count is 1.
pub fn elapsed_between(initial: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let millis = (now - initial).num_milliseconds();
    let seconds = millis as f64 / 1000.0;
    if seconds < 1.0 {
        return "1 second ago".to_string();
    }

    let (unit, ratio) = UNITS
        .iter()
        .map(|&(unit, unit_seconds)| (unit, seconds / unit_seconds))
        .take_while(|&(_, ratio)| ratio >= 1.0)
        .last()
        .unwrap_or(("seconds", seconds));

    let count = (ratio - 0.5).ceil().max(1.0) as u64;
    let unit = if count == 1 {
        unit.trim_end_matches('s')
    } else {
        unit
    };
    format!("{count} {unit} ago")
}

pub fn elapsed_since(initial: DateTime<Utc>) -> String {
    elapsed_between(initial, Utc::now())
}
