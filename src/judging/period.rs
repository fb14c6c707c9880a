use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

/// The active submission window. Bounds are stored and compared in UTC;
/// Pacific time is a display concern only.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SubmissionWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SubmissionWindow {
    /// Inclusive on both bounds.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now <= self.end
    }

    pub fn display_start(&self) -> String {
        format_pacific(self.start)
    }

    pub fn display_end(&self) -> String {
        format_pacific(self.end)
    }
}

// Fixed UTC-8 year-round: deadlines render in Pacific standard time even
// during daylight saving.
fn pacific() -> FixedOffset {
    FixedOffset::west_opt(8 * 3600).expect("UTC-8 is a valid offset")
}

fn format_pacific(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&pacific())
        .format("%B %d, %Y at %I:%M %p PST")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> SubmissionWindow {
        SubmissionWindow {
            start: Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 2, 28, 23, 59, 59).unwrap(),
        }
    }

    #[test]
    fn open_inside_the_window() {
        let now = Utc.with_ymd_and_hms(2025, 2, 15, 12, 0, 0).unwrap();
        assert!(window().is_open(now));
    }

    #[test]
    fn closed_after_the_window() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        assert!(!window().is_open(now));
    }

    #[test]
    fn bounds_are_inclusive() {
        let w = window();
        assert!(w.is_open(w.start));
        assert!(w.is_open(w.end));
        assert!(!w.is_open(w.start - chrono::Duration::seconds(1)));
    }

    #[test]
    fn display_converts_to_pacific() {
        // midnight UTC is 4pm the previous day in PST
        let shown = window().display_start();
        assert!(shown.contains("January 31, 2025"), "got {shown}");
        assert!(shown.contains("04:00 PM"), "got {shown}");
    }
}
