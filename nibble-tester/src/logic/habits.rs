use chrono::{Datelike, NaiveDate, Weekday};
use nibble_game::ActionCategory;
use rand::Rng;
use std::fmt;

/// Built-in cooking habits for automated players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerHabit {
    /// One or two meals every day.
    Daily,
    /// Nothing on weekdays, a pile of meals on Saturday and Sunday.
    WeekendWarrior,
    /// A long cooking session every third day.
    Binge,
    /// Roughly every other day, one to three meals.
    Sporadic,
    /// Daily, except one missed day in every ten.
    ShieldSaver,
}

impl PlayerHabit {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::WeekendWarrior => "Weekend Warrior",
            Self::Binge => "Binge",
            Self::Sporadic => "Sporadic",
            Self::ShieldSaver => "Shield Saver",
        }
    }

    /// Meals logged on `date`, the `day_index`-th day of the run.
    pub fn actions_on<R: Rng + ?Sized>(self, day_index: u32, date: NaiveDate, rng: &mut R) -> u32 {
        match self {
            Self::Daily => rng.gen_range(1..=2),
            Self::WeekendWarrior => match date.weekday() {
                Weekday::Sat | Weekday::Sun => rng.gen_range(6..=9),
                _ => 0,
            },
            Self::Binge => {
                if day_index % 3 == 0 {
                    rng.gen_range(7..=9)
                } else {
                    0
                }
            }
            Self::Sporadic => {
                if rng.gen_bool(0.5) {
                    rng.gen_range(1..=3)
                } else {
                    0
                }
            }
            Self::ShieldSaver => {
                if day_index % 10 == 9 {
                    0
                } else {
                    rng.gen_range(1..=2)
                }
            }
        }
    }

    /// Whether the player rebuys a streak shield whenever theirs is spent.
    #[must_use]
    pub const fn buys_shields(self) -> bool {
        matches!(self, Self::ShieldSaver)
    }

    /// Recipe difficulty mix. Binge cooks reach for harder recipes.
    pub fn pick_category<R: Rng + ?Sized>(self, rng: &mut R) -> ActionCategory {
        let roll = rng.gen_range(0..100);
        let (easy, medium) = match self {
            Self::Binge => (20, 60),
            _ => (50, 85),
        };
        if roll < easy {
            ActionCategory::Tier1
        } else if roll < medium {
            ActionCategory::Tier2
        } else {
            ActionCategory::Tier3
        }
    }
}

impl fmt::Display for PlayerHabit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
