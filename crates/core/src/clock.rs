//! Injectable wall clock.
//!
//! Every "today" comparison in the session lifecycle and the reconciler goes
//! through [`Clock`], so tests can pin the calendar date.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Days, NaiveDate, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current UTC calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// The most recently closed UTC calendar date.
    fn yesterday(&self) -> NaiveDate {
        let today = self.today();
        today.checked_sub_days(Days::new(1)).unwrap_or(today)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a settable instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(now)) }
    }

    /// Clock at midday UTC of `date`.
    #[must_use]
    pub fn on_date(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc();
        Self::new(noon)
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance_days(&self, days: u64) {
        let mut guard = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(next) = guard.checked_add_days(Days::new(days)) {
            *guard = next;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> crate::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| crate::CoreError::InvalidDate(s.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yesterday_crosses_month_boundary() {
        let clock = FixedClock::on_date(parse_date("2024-03-01").unwrap());
        assert_eq!(clock.today(), parse_date("2024-03-01").unwrap());
        assert_eq!(clock.yesterday(), parse_date("2024-02-29").unwrap());
    }

    #[test]
    fn advance_moves_the_calendar() {
        let clock = FixedClock::on_date(parse_date("2024-01-01").unwrap());
        clock.advance_days(4);
        assert_eq!(clock.today(), parse_date("2024-01-05").unwrap());
        assert_eq!(clock.yesterday(), parse_date("2024-01-04").unwrap());
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("yesterday").is_err());
    }
}
