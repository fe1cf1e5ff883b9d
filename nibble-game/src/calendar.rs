//! Civil-day resolution shared by every date comparison in the engine.
//!
//! All "today" values come from [`CivilCalendar::civil_day`]. Stored dates
//! are civil dates in the same offset, so comparing them never mixes a UTC
//! day with a localized one.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_UTC_OFFSET_MINUTES;

/// How a stored civil date relates to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayRelation {
    First,
    SameDay,
    Consecutive,
    Gap,
}

/// Fixed-offset civil calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilCalendar {
    offset: FixedOffset,
}

impl CivilCalendar {
    #[must_use]
    pub const fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Calendar for an offset expressed in minutes east of UTC.
    /// Returns `None` when the offset is outside ±18h.
    #[must_use]
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&minutes) {
            return None;
        }
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
    }

    #[must_use]
    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The civil date `instant` falls on.
    #[must_use]
    pub fn civil_day(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// The instant at which the wall clock reads `time` on civil `date`.
    /// `None` when the shift to UTC leaves chrono's representable range.
    #[must_use]
    pub fn instant_at(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        let shift = TimeDelta::seconds(i64::from(self.offset.local_minus_utc()));
        date.and_time(time)
            .checked_sub_signed(shift)
            .map(|local| local.and_utc())
    }

    /// Classify `stored` against `today`. Anything that is neither today nor
    /// exactly yesterday is a gap, including dates after today.
    #[must_use]
    pub fn classify(stored: Option<NaiveDate>, today: NaiveDate) -> DayRelation {
        let Some(stored) = stored else {
            return DayRelation::First;
        };
        if stored == today {
            DayRelation::SameDay
        } else if today.pred_opt() == Some(stored) {
            DayRelation::Consecutive
        } else {
            DayRelation::Gap
        }
    }
}

impl Default for CivilCalendar {
    fn default() -> Self {
        Self::utc()
    }
}
