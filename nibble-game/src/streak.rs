//! Daily streak continuity, shield consumption, and XP multiplier tiers.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calendar::{CivilCalendar, DayRelation};
use crate::numbers::{percent_to_ratio, scale_floor};

/// Reward multiplier stored as an integer percentage (`110` = 1.10×).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Multiplier(u32);

impl Multiplier {
    pub const IDENTITY: Self = Self(100);

    #[must_use]
    pub const fn from_percent(percent: u32) -> Self {
        Self(percent)
    }

    #[must_use]
    pub const fn percent(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn ratio(self) -> f64 {
        percent_to_ratio(self.0)
    }

    /// `floor(value × self)`.
    #[must_use]
    pub fn apply_floor(self, value: u32) -> u32 {
        scale_floor(value, self.0)
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}x", self.0 / 100, self.0 % 100)
    }
}

/// One step of the streak multiplier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakTier {
    pub min_days: u32,
    pub multiplier: Multiplier,
}

impl StreakTier {
    #[must_use]
    pub const fn new(min_days: u32, percent: u32) -> Self {
        Self {
            min_days,
            multiplier: Multiplier::from_percent(percent),
        }
    }
}

/// Result of advancing the streak for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakOutcome {
    pub streak_days: u32,
    pub shield_consumed: bool,
    /// Shield state to persist.
    pub shield_active: bool,
    pub relation: DayRelation,
}

impl StreakOutcome {
    /// Whether the streak moved forward on this action.
    #[must_use]
    pub const fn advanced(&self) -> bool {
        matches!(self.relation, DayRelation::First | DayRelation::Consecutive)
    }
}

/// Advance the streak for an action taken on `today`.
#[must_use]
pub fn advance_streak(
    streak_days: u32,
    last_action_date: Option<NaiveDate>,
    shield_active: bool,
    today: NaiveDate,
) -> StreakOutcome {
    let relation = CivilCalendar::classify(last_action_date, today);
    let (next, shield_consumed) = match relation {
        DayRelation::First => (1, false),
        DayRelation::SameDay => (streak_days, false),
        DayRelation::Consecutive => (streak_days.saturating_add(1), false),
        DayRelation::Gap if shield_active => (streak_days, true),
        DayRelation::Gap => (1, false),
    };
    StreakOutcome {
        streak_days: next,
        shield_consumed,
        shield_active: shield_active && !shield_consumed,
        relation,
    }
}

/// Multiplier for the resulting streak. `tiers` need not be sorted; the
/// highest threshold the streak reaches wins.
#[must_use]
pub fn streak_multiplier(tiers: &[StreakTier], streak_days: u32) -> Multiplier {
    tiers
        .iter()
        .filter(|tier| streak_days >= tier.min_days)
        .max_by_key(|tier| tier.min_days)
        .map_or(Multiplier::IDENTITY, |tier| tier.multiplier)
}

/// Milestones land on positive multiples of `every` days.
#[must_use]
pub const fn is_milestone(streak_days: u32, every: u32) -> bool {
    every > 0 && streak_days > 0 && streak_days % every == 0
}
