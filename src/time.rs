use once_cell::sync::Lazy;
use regex::Regex;

// Quantities are captured with an optional sign and fraction so that
// "-5 min" or "1.5 hours" can be rejected instead of half-matched. A number
// must start a token, so the hyphen in a range like "1-2 hours" is a
// separator and not a sign.
static HOUR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\d.])(-?\d+(?:\.\d+)?)\s*(?:hour|hr|h)").expect("Invalid hour regex")
});
static MINUTE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\d.])(-?\d+(?:\.\d+)?)\s*(?:minute|min|m)")
        .expect("Invalid minute regex")
});
static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\d.])(-?\d+(?:\.\d+)?)").expect("Invalid number regex")
});

/// Convert a free-text duration to seconds.
///
/// Handles "15 minutes", "1 hour", "30 mins", "2 hrs 15 min". A bare number
/// is taken as minutes. Returns `None` when no usable quantity is found or
/// the total is zero.
pub fn parse_time_to_seconds(input: &str) -> Option<u64> {
    let normalized = input.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    let hours = capture_quantity(&HOUR_PATTERN, &normalized);
    let minutes = capture_quantity(&MINUTE_PATTERN, &normalized);

    let total = if hours.is_some() || minutes.is_some() {
        hours
            .unwrap_or(0)
            .checked_mul(3600)?
            .checked_add(minutes.unwrap_or(0).checked_mul(60)?)?
    } else {
        0
    };

    let total = if total == 0 {
        NUMBER_PATTERN
            .captures(&normalized)
            .and_then(|caps| caps.get(1))
            .and_then(|m| whole_number(m.as_str()))
            .and_then(|n| n.checked_mul(60))
            .unwrap_or(0)
    } else {
        total
    };

    (total > 0).then_some(total)
}

/// Like [`parse_time_to_seconds`] but tolerates a missing value
pub fn parse_optional_time(input: Option<&str>) -> Option<u64> {
    input.and_then(parse_time_to_seconds)
}

// First quantity in the text that is a whole number
fn capture_quantity(pattern: &Regex, text: &str) -> Option<u64> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| whole_number(m.as_str()))
}

// Only unsigned integers count; signs and fractions are treated as unmatched
fn whole_number(text: &str) -> Option<u64> {
    if text.bytes().all(|b| b.is_ascii_digit()) {
        text.parse().ok()
    } else {
        None
    }
}
