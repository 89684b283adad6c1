use crate::scheduling::distributor;
use crate::settings::notification_settings::{NotificationMode, NotificationSettings};
use crate::types::time_of_day::TimeOfDay;

/// The concrete clock times a settings value asks for.
pub fn plan(settings: &NotificationSettings) -> Vec<TimeOfDay> {
    match settings.mode {
        NotificationMode::Single => vec![settings.start],
        NotificationMode::Range => {
            distributor::distribute(settings.start, settings.end, settings.count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_mode_schedules_the_start_time() {
        let settings = NotificationSettings::default();
        assert_eq!(plan(&settings), vec![TimeOfDay::new(9, 0)]);
    }

    #[test]
    fn range_mode_distributes_across_the_window() {
        let settings = NotificationSettings {
            mode: NotificationMode::Range,
            start: TimeOfDay::new(9, 0),
            end: TimeOfDay::new(11, 0),
            count: 3,
            frequency_multiplier: 1.0,
        };

        assert_eq!(
            plan(&settings),
            vec![
                TimeOfDay::new(9, 0),
                TimeOfDay::new(10, 0),
                TimeOfDay::new(11, 0)
            ]
        );
    }
}
