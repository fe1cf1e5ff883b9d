use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::MAX_HEALTH;

/// Pet mood shown alongside the companion.
///
/// Always derived from health and faint status; persisted only so the UI
/// can render it without re-running the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Happy,
    Neutral,
    Sick,
}

impl Mood {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Neutral => "neutral",
            Self::Sick => "sick",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "happy" => Ok(Self::Happy),
            "neutral" => Ok(Self::Neutral),
            "sick" => Ok(Self::Sick),
            _ => Err(()),
        }
    }
}

/// Reward row selector for a reward-granting action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    Tier1,
    Tier2,
    Tier3,
}

impl ActionCategory {
    pub const ALL: [Self; 3] = [Self::Tier1, Self::Tier2, Self::Tier3];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tier1 => "tier1",
            Self::Tier2 => "tier2",
            Self::Tier3 => "tier3",
        }
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tier1" => Ok(Self::Tier1),
            "tier2" => Ok(Self::Tier2),
            "tier3" => Ok(Self::Tier3),
            _ => Err(()),
        }
    }
}

/// Difficulty label attached to generated recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeDifficulty {
    Easy,
    Medium,
    Hard,
}

impl From<RecipeDifficulty> for ActionCategory {
    fn from(value: RecipeDifficulty) -> Self {
        match value {
            RecipeDifficulty::Easy => Self::Tier1,
            RecipeDifficulty::Medium => Self::Tier2,
            RecipeDifficulty::Hard => Self::Tier3,
        }
    }
}

/// Opaque caller-side identifier of whatever produced the action
/// (a cooked recipe, a logged meal, a scan).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(String);

impl SourceRef {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single reward-granting action submitted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub category: ActionCategory,
    pub occurred_at: DateTime<Utc>,
    pub source_ref: SourceRef,
    /// Estimated money saved by the action, in cents.
    #[serde(default)]
    pub savings_cents: u64,
}

impl ActionEvent {
    #[must_use]
    pub fn new(
        category: ActionCategory,
        occurred_at: DateTime<Utc>,
        source_ref: impl Into<String>,
    ) -> Self {
        Self {
            category,
            occurred_at,
            source_ref: SourceRef::new(source_ref),
            savings_cents: 0,
        }
    }

    /// Event for cooking a generated recipe.
    #[must_use]
    pub fn cooked_recipe(
        difficulty: RecipeDifficulty,
        occurred_at: DateTime<Utc>,
        recipe_id: impl Into<String>,
    ) -> Self {
        Self::new(difficulty.into(), occurred_at, recipe_id)
    }

    #[must_use]
    pub fn with_savings(mut self, savings_cents: u64) -> Self {
        self.savings_cents = savings_cents;
        self
    }
}

/// Persisted progression snapshot for one player.
///
/// The engine never mutates a snapshot in place; it returns a successor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub level: u32,
    pub current_xp: u32,
    pub health_points: i32,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default)]
    pub wallet_balance: u64,
    #[serde(default)]
    pub total_savings_accrued: u64,
    #[serde(default)]
    pub streak_days: u32,
    #[serde(default)]
    pub last_action_date: Option<NaiveDate>,
    #[serde(default)]
    pub streak_shield_active: bool,
    #[serde(default)]
    pub is_fainted: bool,
    #[serde(default)]
    pub faint_recovery_count: u32,
    #[serde(default)]
    pub daily_action_count: u32,
    pub last_quota_reset_date: NaiveDate,
}

impl PlayerState {
    /// Account-creation defaults.
    #[must_use]
    pub const fn new(created_on: NaiveDate) -> Self {
        Self {
            level: 1,
            current_xp: 0,
            health_points: MAX_HEALTH,
            mood: Mood::Happy,
            wallet_balance: 0,
            total_savings_accrued: 0,
            streak_days: 0,
            last_action_date: None,
            streak_shield_active: false,
            is_fainted: false,
            faint_recovery_count: 0,
            daily_action_count: 0,
            last_quota_reset_date: created_on,
        }
    }

    /// Knock the pet out. Health reaching zero is decided outside the
    /// progression engine (neglect decay, missed meals); the engine only
    /// consumes the resulting flag.
    #[must_use]
    pub fn fainted(mut self) -> Self {
        self.health_points = 0;
        self.is_fainted = true;
        self.faint_recovery_count = 0;
        self.mood = Mood::Sick;
        self
    }

    /// Arm the streak shield bought from the shop.
    #[must_use]
    pub const fn with_shield(mut self) -> Self {
        self.streak_shield_active = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_player_defaults() {
        let state = PlayerState::new(day(2026, 3, 1));
        assert_eq!(state.level, 1);
        assert_eq!(state.current_xp, 0);
        assert_eq!(state.health_points, 100);
        assert_eq!(state.mood, Mood::Happy);
        assert_eq!(state.streak_days, 0);
        assert_eq!(state.daily_action_count, 0);
        assert_eq!(state.last_action_date, None);
        assert_eq!(state.last_quota_reset_date, day(2026, 3, 1));
    }

    #[test]
    fn fainted_zeroes_health() {
        let state = PlayerState::new(day(2026, 3, 1)).fainted();
        assert!(state.is_fainted);
        assert_eq!(state.health_points, 0);
        assert_eq!(state.mood, Mood::Sick);
    }

    #[test]
    fn recipe_difficulty_maps_to_tiers() {
        assert_eq!(
            ActionCategory::from(RecipeDifficulty::Easy),
            ActionCategory::Tier1
        );
        assert_eq!(
            ActionCategory::from(RecipeDifficulty::Hard),
            ActionCategory::Tier3
        );
    }

    #[test]
    fn category_and_mood_parse_round_trip() {
        for category in ActionCategory::ALL {
            assert_eq!(category.as_str().parse::<ActionCategory>(), Ok(category));
        }
        assert_eq!("sick".parse::<Mood>(), Ok(Mood::Sick));
        assert!("grumpy".parse::<Mood>().is_err());
    }

    #[test]
    fn player_state_deserializes_with_sparse_fields() {
        let json = r#"{
            "level": 3,
            "current_xp": 12,
            "health_points": 55,
            "last_quota_reset_date": "2026-03-01"
        }"#;
        let state: PlayerState = serde_json::from_str(json).unwrap();
        assert_eq!(state.level, 3);
        assert_eq!(state.mood, Mood::Happy);
        assert!(!state.streak_shield_active);
        assert_eq!(state.last_action_date, None);
    }
}
