//! Time slot grid
//!
//! The operating day is divided into 30-minute slots from 09:00 to 19:00, where 19:00 is the
//! final session start. A session lasts one hour and therefore spans two consecutive slots.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Hour of the first slot of the day
pub const OPENING_HOUR: u32 = 9;

/// Hour of the last slot a session may start in
pub const LAST_START_HOUR: u32 = 19;

/// Length of one slot in minutes
pub const SLOT_MINUTES: u32 = 30;

/// Day of the week a class runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for DayOfWeek {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monday" | "mon" => Ok(DayOfWeek::Monday),
            "tuesday" | "tue" => Ok(DayOfWeek::Tuesday),
            "wednesday" | "wed" => Ok(DayOfWeek::Wednesday),
            "thursday" | "thu" => Ok(DayOfWeek::Thursday),
            "friday" | "fri" => Ok(DayOfWeek::Friday),
            "saturday" | "sat" => Ok(DayOfWeek::Saturday),
            "sunday" | "sun" => Ok(DayOfWeek::Sunday),
            _ => Err(format!("Unknown day of week: {}", s)),
        }
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => DayOfWeek::Monday,
            chrono::Weekday::Tue => DayOfWeek::Tuesday,
            chrono::Weekday::Wed => DayOfWeek::Wednesday,
            chrono::Weekday::Thu => DayOfWeek::Thursday,
            chrono::Weekday::Fri => DayOfWeek::Friday,
            chrono::Weekday::Sat => DayOfWeek::Saturday,
            chrono::Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

/// Start time of a slot on the grid
///
/// Always on a :00 or :30 boundary between the opening slot and the last start.
/// Serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotTime {
    minutes: u32,
}

impl SlotTime {
    const FIRST: u32 = OPENING_HOUR * 60;
    const LAST: u32 = LAST_START_HOUR * 60;

    /// Create a slot time, rejecting anything off the grid
    pub fn new(hour: u32, minute: u32) -> Result<Self, DomainError> {
        if minute >= 60 || minute % SLOT_MINUTES != 0 {
            return Err(DomainError::Validation(format!(
                "{:02}:{:02} is not on the {}-minute grid",
                hour, minute, SLOT_MINUTES
            )));
        }
        let outside_hours = || {
            DomainError::Validation(format!(
                "{:02}:{:02} is outside operating hours ({:02}:00-{:02}:00)",
                hour, minute, OPENING_HOUR, LAST_START_HOUR
            ))
        };
        // hour is bounded first so the minute arithmetic cannot overflow
        if hour > LAST_START_HOUR {
            return Err(outside_hours());
        }
        let minutes = hour * 60 + minute;
        if !(Self::FIRST..=Self::LAST).contains(&minutes) {
            return Err(outside_hours());
        }
        Ok(Self { minutes })
    }

    pub fn hour(&self) -> u32 {
        self.minutes / 60
    }

    pub fn minute(&self) -> u32 {
        self.minutes % 60
    }

    /// The slot immediately before this one, or `None` at the opening slot
    pub fn previous(&self) -> Option<SlotTime> {
        if self.minutes <= Self::FIRST {
            return None;
        }
        Some(Self {
            minutes: self.minutes - SLOT_MINUTES,
        })
    }

    /// The slot immediately after this one, or `None` at the last start
    pub fn next(&self) -> Option<SlotTime> {
        if self.minutes >= Self::LAST {
            return None;
        }
        Some(Self {
            minutes: self.minutes + SLOT_MINUTES,
        })
    }

    /// Every slot of the operating day in order
    pub fn all() -> Vec<SlotTime> {
        (Self::FIRST..=Self::LAST)
            .step_by(SLOT_MINUTES as usize)
            .map(|minutes| Self { minutes })
            .collect()
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }
}

impl TryFrom<NaiveTime> for SlotTime {
    type Error = DomainError;

    fn try_from(time: NaiveTime) -> Result<Self, Self::Error> {
        if time.second() != 0 {
            return Err(DomainError::Validation(format!(
                "{} is not on the {}-minute grid",
                time, SLOT_MINUTES
            )));
        }
        Self::new(time.hour(), time.minute())
    }
}

impl std::fmt::Display for SlotTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl std::str::FromStr for SlotTime {
    type Err = DomainError;

    /// Accepts `HH:MM` and `HH:MM:SS` (as stored by the database)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::Validation(format!("Invalid time: {}", s));
        let mut parts = s.trim().split(':');
        let hour: u32 = parts
            .next()
            .and_then(|h| h.parse().ok())
            .ok_or_else(invalid)?;
        let minute: u32 = parts
            .next()
            .and_then(|m| m.parse().ok())
            .ok_or_else(invalid)?;
        match parts.next() {
            None | Some("00") => {}
            Some(_) => return Err(invalid()),
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for SlotTime {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SlotTime> for String {
    fn from(time: SlotTime) -> Self {
        time.to_string()
    }
}

/// A (day, start) cell of the weekly grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeSlot {
    pub day: DayOfWeek,
    pub start: SlotTime,
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.day, self.start)
    }
}
