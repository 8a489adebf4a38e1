#[cfg(test)]
use std::cell::Cell;
#[cfg(test)]
use std::rc::Rc;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Timelike};

/// Local wall-clock snapshot taken once per clock tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Moment {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub date: NaiveDate,
}

impl Moment {
    pub fn from_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Self {
        Self {
            hour: datetime.hour(),
            minute: datetime.minute(),
            second: datetime.second(),
            date: datetime.date_naive(),
        }
    }
}

pub trait TimeProvider {
    fn now(&self) -> Result<Moment>;
    fn label(&self) -> &'static str;
}

/// Reads the host's local time through `chrono::Local`.
pub struct LocalTimeProvider;

impl TimeProvider for LocalTimeProvider {
    fn now(&self) -> Result<Moment> {
        Ok(Moment::from_datetime(&Local::now()))
    }

    fn label(&self) -> &'static str {
        "LOCAL_WALL_CLOCK"
    }
}

/// Provider pinned to a moment that the owner of the handle can move.
#[cfg(test)]
#[derive(Clone)]
pub struct ManualTimeProvider {
    current: Rc<Cell<Moment>>,
}

#[cfg(test)]
impl ManualTimeProvider {
    pub fn new(moment: Moment) -> Self {
        Self {
            current: Rc::new(Cell::new(moment)),
        }
    }

    pub fn set(&self, moment: Moment) {
        self.current.set(moment);
    }
}

#[cfg(test)]
impl TimeProvider for ManualTimeProvider {
    fn now(&self) -> Result<Moment> {
        Ok(self.current.get())
    }

    fn label(&self) -> &'static str {
        "MANUAL"
    }
}

#[cfg(test)]
pub(crate) fn test_moment(hour: u32, minute: u32, second: u32) -> Moment {
    Moment {
        hour,
        minute,
        second,
        date: NaiveDate::from_ymd_opt(2026, 1, 5).expect("valid date"),
    }
}
