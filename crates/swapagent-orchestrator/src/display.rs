use std::fmt::{Display, Formatter};

const HOUR: u64 = 3_600_000;
const MINUTE: u64 = 60_000;
const SECOND: u64 = 1_000;

/// Recurrence interval expressed in its largest unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalDisplay {
    pub value: f64,
    pub unit: &'static str,
}

impl Display for IntervalDisplay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} {}", self.value, self.unit)
    }
}

/// Format `interval` (milliseconds) in hours, minutes or seconds, picking the
/// largest unit in which the value is at least 1
pub fn format_interval(interval: u64) -> IntervalDisplay {
    let (value, singular, plural) = if interval >= HOUR {
        (interval as f64 / HOUR as f64, "hour", "hours")
    } else if interval >= MINUTE {
        (interval as f64 / MINUTE as f64, "minute", "minutes")
    } else {
        (interval as f64 / SECOND as f64, "second", "seconds")
    };

    IntervalDisplay {
        value,
        unit: if value == 1.0 { singular } else { plural },
    }
}

/// Destination amounts are display only and shown with 4 fractional digits
pub fn format_destination_amount(amount: f64) -> String {
    format!("{:.4}", amount)
}
