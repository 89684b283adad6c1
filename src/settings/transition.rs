use crate::scheduling::{distributor, planner};
use crate::settings::notification_settings::{NotificationMode, NotificationSettings};
use crate::types::time_of_day::TimeOfDay;

/// Work the caller must perform after a settings change. Nothing happens
/// inside a setter; effects come back as data.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    Reschedule(Vec<TimeOfDay>),
    Persist,
}

/// Validates the incoming settings against the old state and reports which
/// side effects the change requires.
pub fn apply_settings_change(
    old: &NotificationSettings,
    new: NotificationSettings,
) -> (NotificationSettings, Vec<SideEffect>) {
    let normalized = normalize(old, new);

    let mut effects = Vec::new();

    let times_changed = normalized.mode != old.mode
        || normalized.start != old.start
        || normalized.end != old.end
        || normalized.count != old.count;
    if times_changed {
        effects.push(SideEffect::Reschedule(planner::plan(&normalized)));
    }

    if normalized != *old {
        effects.push(SideEffect::Persist);
    }

    (normalized, effects)
}

fn normalize(old: &NotificationSettings, mut new: NotificationSettings) -> NotificationSettings {
    if !new.frequency_multiplier.is_finite() || new.frequency_multiplier < 0.0 {
        new.frequency_multiplier = old.frequency_multiplier;
    }

    if new.mode == NotificationMode::Range {
        // The range picker requires positive span; the end chases the start
        // one minute ahead, wrapping 23:59 to 00:00.
        if new.start >= new.end {
            new.end = new.start.next_minute();
        }

        let max = distributor::max_allowed(new.start, new.end);
        if new.count > max {
            new.count = max;
        }
    }

    if new.count < 1 {
        new.count = 1;
    }

    new
}
