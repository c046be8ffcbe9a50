use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error;

/// Day of the week numbered from Sunday, so 1 is Sunday and 7 is Saturday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeekDay(Weekday);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("week day must be between 1 (Sunday) and 7 (Saturday), got {0}")]
pub struct InvalidWeekDay(pub u8);

impl WeekDay {
    pub const SUNDAY: Self = WeekDay(Weekday::Sun);
    pub const MONDAY: Self = WeekDay(Weekday::Mon);
    pub const TUESDAY: Self = WeekDay(Weekday::Tue);
    pub const WEDNESDAY: Self = WeekDay(Weekday::Wed);
    pub const THURSDAY: Self = WeekDay(Weekday::Thu);
    pub const FRIDAY: Self = WeekDay(Weekday::Fri);
    pub const SATURDAY: Self = WeekDay(Weekday::Sat);

    /// Number from 1 (Sunday) to 7 (Saturday)
    pub fn number(self) -> u8 {
        self.0.number_from_sunday() as u8
    }
}

impl From<Weekday> for WeekDay {
    fn from(weekday: Weekday) -> Self {
        WeekDay(weekday)
    }
}

impl TryFrom<u8> for WeekDay {
    type Error = InvalidWeekDay;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        let weekday = match number {
            1 => Weekday::Sun,
            2 => Weekday::Mon,
            3 => Weekday::Tue,
            4 => Weekday::Wed,
            5 => Weekday::Thu,
            6 => Weekday::Fri,
            7 => Weekday::Sat,
            _ => return Err(InvalidWeekDay(number)),
        };

        Ok(WeekDay(weekday))
    }
}

impl From<WeekDay> for u8 {
    fn from(day: WeekDay) -> Self {
        day.number()
    }
}

impl Display for WeekDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}
