//! Transaction time stamping.

use chrono::{Local, NaiveDateTime, Timelike};

/// `YYYYMMDD-HHMMSS.sss`
pub const TRANSACT_TIME_FORMAT: &str = "%Y%m%d-%H%M%S%.3f";

/// Local wall clock at millisecond precision that never runs backwards.
#[derive(Debug, Default)]
pub struct TransactClock {
    last: Option<NaiveDateTime>,
}

impl TransactClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the current local time.
    pub fn now(&mut self) -> NaiveDateTime {
        self.observe(Local::now().naive_local())
    }

    /// Stamp and format the current local time.
    pub fn now_string(&mut self) -> String {
        format_transact_time(&self.now())
    }

    /// Feed a wall-clock reading; returns it truncated to milliseconds,
    /// or the previous stamp if the reading went backwards.
    pub fn observe(&mut self, reading: NaiveDateTime) -> NaiveDateTime {
        let millis = reading.nanosecond() / 1_000_000 * 1_000_000;
        let reading = reading.with_nanosecond(millis).unwrap_or(reading);
        let stamp = match self.last {
            Some(last) if last > reading => last,
            _ => reading,
        };
        self.last = Some(stamp);
        stamp
    }

    /// Last issued stamp.
    #[inline]
    pub fn last(&self) -> Option<NaiveDateTime> {
        self.last
    }
}

/// Render a stamp in the report format.
pub fn format_transact_time(stamp: &NaiveDateTime) -> String {
    stamp.format(TRANSACT_TIME_FORMAT).to_string()
}
