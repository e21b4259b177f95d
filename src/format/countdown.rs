use chrono::{DateTime, Utc};

/// Time left until the event, split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    /// Set once the target instant has been reached.
    pub over: bool,
}

impl Countdown {
    /// All units are zero and `over` is set once `target` is reached.
    pub fn until(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let remaining_ms = target.signed_duration_since(now).num_milliseconds();
        if remaining_ms <= 0 {
            return Self {
                over: true,
                ..Self::default()
            };
        }

        let total_seconds = remaining_ms / 1000;
        Self {
            days: total_seconds / 86_400,
            hours: (total_seconds / 3_600) % 24,
            minutes: (total_seconds / 60) % 60,
            seconds: total_seconds % 60,
            over: false,
        }
    }

    pub fn is_over(&self) -> bool {
        self.over
    }
}
