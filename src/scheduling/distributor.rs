use std::collections::BTreeSet;

use crate::types::time_of_day::{MINUTES_PER_DAY, TimeOfDay};

/// Absolute cap on notifications for ranges longer than twelve hours.
pub const HARD_CAP: u32 = 10;

const HARD_CAP_SPAN_MINUTES: u32 = 720;

/// Spreads `count` notification times across the range, first and last
/// pinned to the boundaries and the rest evenly between them.
///
/// A range whose end is numerically earlier than its start wraps past
/// midnight. A zero-width or inverted-to-zero range yields the start time
/// alone. The result is deduplicated and sorted in wrapped chronological
/// order, so 23:30 precedes 00:10 for a cross-midnight range.
pub fn distribute(start: TimeOfDay, end: TimeOfDay, count: u32) -> Vec<TimeOfDay> {
    let start_minute = start.minute_of_day();
    let mut end_minute = end.minute_of_day();
    if end_minute < start_minute {
        end_minute += MINUTES_PER_DAY;
    }

    let span = end_minute - start_minute;
    if span < 1 {
        return vec![start];
    }

    let effective = count.clamp(1, max_allowed(start, end));

    let mut minutes: BTreeSet<u32> = BTreeSet::new();
    if effective == 1 {
        let midpoint = (start_minute as f64 + span as f64 / 2.0).round() as u32;
        minutes.insert(midpoint);
    } else {
        let interval = span as f64 / (effective - 1) as f64;
        for step in 0..effective {
            let point = (start_minute as f64 + step as f64 * interval).round() as u32;
            minutes.insert(point.min(end_minute));
        }
    }

    // Sorting happens in the unwrapped domain, then folds onto the clock.
    minutes
        .into_iter()
        .map(TimeOfDay::from_minute_of_day)
        .collect()
}

/// The most notifications a range can hold: one per whole minute boundary,
/// hard-capped at 10 past twelve hours.
pub fn max_allowed(start: TimeOfDay, end: TimeOfDay) -> u32 {
    let start_minute = start.minute_of_day();
    let mut end_minute = end.minute_of_day();
    if end_minute < start_minute {
        end_minute += MINUTES_PER_DAY;
    }

    let span = end_minute - start_minute;
    if span > HARD_CAP_SPAN_MINUTES {
        HARD_CAP
    } else {
        span + 1
    }
}
