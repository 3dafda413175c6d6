//! Time source for "today" and completion timestamps.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Supplies the current instant and the local calendar date.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date the dashboard treats as "today".
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time; "today" follows the machine's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen at one instant.
///
/// "Today" follows the same rule as [`SystemClock`]: the local calendar date
/// of the instant, unless pinned with [`FixedClock::with_today`].
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            today: instant.with_timezone(&Local).date_naive(),
        }
    }

    /// Pins the calendar date independently of the machine timezone.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
