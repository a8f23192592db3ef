use std::{fmt, str::FromStr};

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

pub const MINUTES_PER_DAY: u32 = 1440;

/// Wall-clock time in the shop's timezone, stored as minutes since midnight.
///
/// `24:00` is representable so that a timeframe can close at end of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY);

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        hour.checked_mul(60)
            .and_then(|minutes| minutes.checked_add(minute))
            .and_then(Self::from_minutes)
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    /// Time of day of a local timestamp, truncated to the minute.
    pub fn of(time: NaiveTime) -> Self {
        Self(time.hour() * 60 + time.minute())
    }

    /// Offset from local midnight, usable with `NaiveDate::and_hms_opt(0, 0, 0)`.
    pub fn as_duration(self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = s
            .split_once(':')
            .ok_or_else(|| format!("expected HH:MM, got {s:?}"))?;
        let hour: u32 = hour
            .trim()
            .parse()
            .map_err(|_| format!("invalid hour in {s:?}"))?;
        let minute: u32 = minute
            .trim()
            .parse()
            .map_err(|_| format!("invalid minute in {s:?}"))?;
        Self::from_hm(hour, minute).ok_or_else(|| format!("time out of range: {s:?}"))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeframe {
    pub from: TimeOfDay,
    pub to: TimeOfDay,
}

impl Timeframe {
    pub fn new(from: TimeOfDay, to: TimeOfDay) -> Self {
        Self { from, to }
    }

    /// Misconfigured timeframes (`to <= from`) are ignored by the engine.
    pub fn is_valid(&self) -> bool {
        self.to > self.from
    }

    pub fn length_minutes(&self) -> u32 {
        self.to.minutes().saturating_sub(self.from.minutes())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub is_open: bool,
    #[serde(default)]
    pub timeframes: Vec<Timeframe>,
}

impl DaySchedule {
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn open(timeframes: Vec<Timeframe>) -> Self {
        Self {
            is_open: true,
            timeframes,
        }
    }

    /// Valid timeframes of an open day, ordered by start.
    pub fn bookable_timeframes(&self) -> Vec<Timeframe> {
        if !self.is_open {
            return Vec::new();
        }
        let mut frames: Vec<Timeframe> = self
            .timeframes
            .iter()
            .copied()
            .filter(Timeframe::is_valid)
            .collect();
        frames.sort_by_key(|frame| frame.from);
        frames
    }
}

/// Opening hours for each weekday, indexed Monday first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WeekdayMap", into = "WeekdayMap")]
pub struct WeeklySchedule {
    days: [DaySchedule; 7],
}

impl WeeklySchedule {
    /// A schedule with every day closed.
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn day(&self, weekday: Weekday) -> &DaySchedule {
        &self.days[weekday.num_days_from_monday() as usize]
    }

    pub fn set_day(&mut self, weekday: Weekday, day: DaySchedule) {
        self.days[weekday.num_days_from_monday() as usize] = day;
    }

    pub fn with_day(mut self, weekday: Weekday, day: DaySchedule) -> Self {
        self.set_day(weekday, day);
        self
    }

    pub fn is_always_closed(&self) -> bool {
        self.days
            .iter()
            .all(|day| day.bookable_timeframes().is_empty())
    }
}

#[derive(Serialize, Deserialize)]
struct WeekdayMap {
    #[serde(default)]
    monday: DaySchedule,
    #[serde(default)]
    tuesday: DaySchedule,
    #[serde(default)]
    wednesday: DaySchedule,
    #[serde(default)]
    thursday: DaySchedule,
    #[serde(default)]
    friday: DaySchedule,
    #[serde(default)]
    saturday: DaySchedule,
    #[serde(default)]
    sunday: DaySchedule,
}

impl From<WeekdayMap> for WeeklySchedule {
    fn from(map: WeekdayMap) -> Self {
        Self {
            days: [
                map.monday,
                map.tuesday,
                map.wednesday,
                map.thursday,
                map.friday,
                map.saturday,
                map.sunday,
            ],
        }
    }
}

impl From<WeeklySchedule> for WeekdayMap {
    fn from(schedule: WeeklySchedule) -> Self {
        let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] = schedule.days;
        Self {
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            sunday,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRules {
    pub min_notice_minutes: u32,
    pub max_horizon_days: u32,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            min_notice_minutes: 0,
            max_horizon_days: 30,
        }
    }
}

impl BookingRules {
    /// Earliest and latest admissible slot start, both inclusive.
    ///
    /// Bounds past the calendar's range saturate at `NaiveDateTime::MAX`.
    pub fn window(&self, now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let horizon_minutes = i64::from(self.max_horizon_days) * i64::from(MINUTES_PER_DAY);
        (
            saturating_add_minutes(now, i64::from(self.min_notice_minutes)),
            saturating_add_minutes(now, horizon_minutes),
        )
    }
}

fn saturating_add_minutes(start: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    Duration::try_minutes(minutes)
        .and_then(|offset| start.checked_add_signed(offset))
        .unwrap_or(NaiveDateTime::MAX)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub duration_minutes: u32,
    pub granularity_minutes: u32,
    pub slots: Vec<NaiveDateTime>,
}
