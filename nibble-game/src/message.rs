//! Headline message selection for a reward receipt.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    MSG_DAILY_LIMIT, MSG_LEVEL_UP, MSG_RECOVERING, MSG_REVIVED, MSG_STREAK_MILESTONE, MSG_SUCCESS,
};

/// The single user-facing headline for a transition. Lower-priority
/// conditions remain visible through the receipt's structured fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewardMessage {
    Revived { health: i32 },
    Recovering { recovery_count: u32, threshold: u32 },
    DailyLimitReached { limit: u32 },
    LeveledUp { level: u32 },
    StreakMilestone { streak_days: u32 },
    Success { gold: u32, xp: u32 },
}

impl RewardMessage {
    /// Stable translation key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Revived { .. } => MSG_REVIVED,
            Self::Recovering { .. } => MSG_RECOVERING,
            Self::DailyLimitReached { .. } => MSG_DAILY_LIMIT,
            Self::LeveledUp { .. } => MSG_LEVEL_UP,
            Self::StreakMilestone { .. } => MSG_STREAK_MILESTONE,
            Self::Success { .. } => MSG_SUCCESS,
        }
    }
}

impl fmt::Display for RewardMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Revived { health } => {
                write!(f, "Your pet is back on its feet with {health} HP!")
            }
            Self::Recovering {
                recovery_count,
                threshold,
            } => write!(
                f,
                "Your pet is recovering ({recovery_count}/{threshold}). Keep cooking to revive it."
            ),
            Self::DailyLimitReached { limit } => write!(
                f,
                "Daily reward limit reached ({limit}/{limit}). Come back tomorrow!"
            ),
            Self::LeveledUp { level } => write!(f, "Level up! You reached level {level}."),
            Self::StreakMilestone { streak_days } => {
                write!(f, "{streak_days}-day streak! Keep it going.")
            }
            Self::Success { gold, xp } => write!(f, "Nice work! +{gold} gold, +{xp} XP."),
        }
    }
}

/// Flags feeding message selection, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageInputs {
    pub revived: bool,
    pub still_fainted: bool,
    pub hit_daily_limit: bool,
    pub leveled_up: bool,
    pub streak_milestone: bool,
    pub health: i32,
    pub recovery_count: u32,
    pub recovery_threshold: u32,
    pub daily_limit: u32,
    pub level: u32,
    pub streak_days: u32,
    pub gold: u32,
    pub xp: u32,
}

/// Pick the highest-priority applicable message.
#[must_use]
pub const fn select_message(inputs: &MessageInputs) -> RewardMessage {
    if inputs.revived {
        RewardMessage::Revived {
            health: inputs.health,
        }
    } else if inputs.still_fainted {
        RewardMessage::Recovering {
            recovery_count: inputs.recovery_count,
            threshold: inputs.recovery_threshold,
        }
    } else if inputs.hit_daily_limit {
        RewardMessage::DailyLimitReached {
            limit: inputs.daily_limit,
        }
    } else if inputs.leveled_up {
        RewardMessage::LeveledUp {
            level: inputs.level,
        }
    } else if inputs.streak_milestone {
        RewardMessage::StreakMilestone {
            streak_days: inputs.streak_days,
        }
    } else {
        RewardMessage::Success {
            gold: inputs.gold,
            xp: inputs.xp,
        }
    }
}
