//! Reward calculation: base lookup, XP multipliers, and zeroing.
use serde::{Deserialize, Serialize};

use crate::streak::Multiplier;

/// Base gold/XP row for one action category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseReward {
    pub gold: u32,
    pub xp: u32,
}

impl BaseReward {
    #[must_use]
    pub const fn new(gold: u32, xp: u32) -> Self {
        Self { gold, xp }
    }
}

/// Everything the calculator consumes besides the base row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardInputs {
    pub streak_multiplier: Multiplier,
    /// Health when the action arrived.
    pub health_points: i32,
    pub sick_threshold: i32,
    pub sick_multiplier: Multiplier,
    pub can_earn_rewards: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewardGrant {
    pub gold: u32,
    pub xp: u32,
}

impl RewardGrant {
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.gold == 0 && self.xp == 0
    }
}

/// Compute the grant. Order matters once flooring is involved: the streak
/// bonus is applied first, then the sick penalty, each floored.
#[must_use]
pub fn compute_reward(base: BaseReward, inputs: &RewardInputs) -> RewardGrant {
    if !inputs.can_earn_rewards {
        return RewardGrant::default();
    }
    let mut xp = inputs.streak_multiplier.apply_floor(base.xp);
    if inputs.health_points > 0 && inputs.health_points <= inputs.sick_threshold {
        xp = inputs.sick_multiplier.apply_floor(xp);
    }
    RewardGrant {
        gold: base.gold,
        xp,
    }
}
