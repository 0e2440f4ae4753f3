use chrono::{Duration, NaiveDateTime};

/// Admits transactions at or after a cutoff instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    cutoff: NaiveDateTime,
}

impl TimeWindow {
    /// Window covering `now - last_n_days` up to (and past) `now`.
    /// Saturates to the earliest representable instant on underflow.
    pub fn last_n_days(now: NaiveDateTime, last_n_days: u32) -> Self {
        let cutoff = now
            .checked_sub_signed(Duration::days(i64::from(last_n_days)))
            .unwrap_or(NaiveDateTime::MIN);
        Self { cutoff }
    }

    /// Same as `last_n_days` with the current local time as `now`
    pub fn last_n_days_from_now(last_n_days: u32) -> Self {
        Self::last_n_days(chrono::Local::now().naive_local(), last_n_days)
    }

    pub fn cutoff(&self) -> NaiveDateTime {
        self.cutoff
    }

    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        *timestamp >= self.cutoff
    }
}
