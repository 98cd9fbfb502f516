use chrono::{DateTime, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// `YYYY-MM-DD_HH:MM:SS` in UTC.
pub fn format_now<C: Clock + ?Sized>(clock: &C) -> String {
    clock.now().format("%Y-%m-%d_%H:%M:%S").to_string()
}

pub fn cur_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Unix seconds of midnight UTC on the day of `t`.
pub fn utc_day_ts(t: DateTime<Utc>) -> i64 {
    t.date_naive()
        .and_hms_opt(0, 0, 0)
        .map_or(0, |midnight| midnight.and_utc().timestamp())
}
