//! Datetime values: an optional date, an optional time and an optional UTC offset.
//!
//! The scanner produces these from RFC 3339-like literals. Calendar validity is
//! checked with `chrono` at scan time, so every `Datetime` converts cleanly into the
//! matching chrono type.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// A calendar date, `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// A wall-clock time, `HH:MM:SS[.fraction]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
}

/// A UTC offset: `Z` or `±HH:MM` (stored in minutes east of UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Offset {
    Z,
    Custom { minutes: i16 },
}

/// Offset date-time, local date-time, local date, or local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Datetime {
    pub date: Option<Date>,
    pub time: Option<Time>,
    pub offset: Option<Offset>,
}

impl Date {
    pub(crate) fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year.into(), self.month.into(), self.day.into())
    }
}

impl Time {
    pub(crate) fn to_naive(self) -> Option<NaiveTime> {
        // Leap seconds are expressed by chrono as nanosecond >= 1e9 on second 59.
        let (second, nano) = if self.second == 60 {
            (59, self.nanosecond + 1_000_000_000)
        } else {
            (self.second, self.nanosecond)
        };
        NaiveTime::from_hms_nano_opt(self.hour.into(), self.minute.into(), second.into(), nano)
    }
}

impl Offset {
    fn to_fixed(self) -> Option<FixedOffset> {
        match self {
            Offset::Z => FixedOffset::east_opt(0),
            Offset::Custom { minutes } => FixedOffset::east_opt(i32::from(minutes) * 60),
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.nanosecond != 0 {
            let frac = format!("{:09}", self.nanosecond);
            write!(f, ".{}", frac.trim_end_matches('0'))?;
        }
        Ok(())
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Offset::Z => f.write_str("Z"),
            Offset::Custom { minutes } => {
                let sign = if minutes < 0 { '-' } else { '+' };
                let abs = minutes.unsigned_abs();
                write!(f, "{}{:02}:{:02}", sign, abs / 60, abs % 60)
            }
        }
    }
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(date) = &self.date {
            write!(f, "{date}")?;
        }
        if let Some(time) = &self.time {
            if self.date.is_some() {
                f.write_str("T")?;
            }
            write!(f, "{time}")?;
        }
        if let Some(offset) = &self.offset {
            write!(f, "{offset}")?;
        }
        Ok(())
    }
}

/// Returned when a `Datetime` lacks the components a chrono type needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatetimeConversionError {
    pub wanted: &'static str,
    pub value: Datetime,
}

impl fmt::Display for DatetimeConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "datetime `{}` cannot be converted to {}", self.value, self.wanted)
    }
}

impl std::error::Error for DatetimeConversionError {}

impl TryFrom<&Datetime> for NaiveDate {
    type Error = DatetimeConversionError;

    fn try_from(dt: &Datetime) -> Result<Self, Self::Error> {
        dt.date
            .and_then(Date::to_naive)
            .ok_or(DatetimeConversionError {
                wanted: "NaiveDate",
                value: *dt,
            })
    }
}

impl TryFrom<&Datetime> for NaiveTime {
    type Error = DatetimeConversionError;

    fn try_from(dt: &Datetime) -> Result<Self, Self::Error> {
        dt.time
            .and_then(Time::to_naive)
            .ok_or(DatetimeConversionError {
                wanted: "NaiveTime",
                value: *dt,
            })
    }
}

impl TryFrom<&Datetime> for NaiveDateTime {
    type Error = DatetimeConversionError;

    fn try_from(dt: &Datetime) -> Result<Self, Self::Error> {
        let err = DatetimeConversionError {
            wanted: "NaiveDateTime",
            value: *dt,
        };
        let date = NaiveDate::try_from(dt).map_err(|_| err.clone())?;
        let time = NaiveTime::try_from(dt).map_err(|_| err)?;
        Ok(NaiveDateTime::new(date, time))
    }
}

impl TryFrom<&Datetime> for DateTime<FixedOffset> {
    type Error = DatetimeConversionError;

    fn try_from(dt: &Datetime) -> Result<Self, Self::Error> {
        let err = DatetimeConversionError {
            wanted: "DateTime<FixedOffset>",
            value: *dt,
        };
        let naive = NaiveDateTime::try_from(dt).map_err(|_| err.clone())?;
        let offset = dt.offset.and_then(Offset::to_fixed).ok_or(err.clone())?;
        naive.and_local_timezone(offset).single().ok_or(err)
    }
}
