use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// A calendar day expressed as the half-open interval `[start, end)` of UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// `None` when the end of `day` cannot be represented.
    pub fn for_day(day: NaiveDate) -> Option<DayWindow> {
        let start = Utc.from_utc_datetime(&day.and_time(NaiveTime::default()));
        let end = start.checked_add_signed(Duration::days(1))?;

        Some(DayWindow { start, end })
    }

    /// The window covering the day after `today`, `None` past the last representable date.
    pub fn tomorrow(today: NaiveDate) -> Option<DayWindow> {
        today.succ_opt().and_then(DayWindow::for_day)
    }

    pub fn day(&self) -> NaiveDate {
        self.start.date_naive()
    }
}
