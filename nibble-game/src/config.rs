//! Tunable progression rules.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::calendar::CivilCalendar;
use crate::constants::{
    DAILY_LIMIT, DEFAULT_UTC_OFFSET_MINUTES, FAINT_RECOVERY_THRESHOLD, FAINT_REVIVE_HEALTH,
    HAPPY_THRESHOLD, HEALTH_RECOVERY, MAX_HEALTH, MAX_UTC_OFFSET_MINUTES, SICK_MULTIPLIER_PCT,
    SICK_THRESHOLD, STREAK_MILESTONE_DAYS, STREAK_TIER_BRONZE_DAYS, STREAK_TIER_BRONZE_PCT,
    STREAK_TIER_GOLD_DAYS, STREAK_TIER_GOLD_PCT, STREAK_TIER_SILVER_DAYS, STREAK_TIER_SILVER_PCT,
    TIER1_GOLD, TIER1_XP, TIER2_GOLD, TIER2_XP, TIER3_GOLD, TIER3_XP, XP_CURVE_VALIDATION_LEVELS,
};
use crate::health::HealthRules;
use crate::leveling::{LevelCurve, XpCurve};
use crate::rewards::BaseReward;
use crate::state::ActionCategory;
use crate::streak::{Multiplier, StreakTier};

const DEFAULT_PROGRESSION_DATA: &str = include_str!("../data/progression.json");

/// Errors raised when progression configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ProgressionConfigError {
    #[error("daily limit must be at least 1")]
    ZeroDailyLimit,
    #[error("faint recovery threshold must be at least 1")]
    ZeroFaintThreshold,
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("streak tier at {min_days} days is listed more than once")]
    DuplicateStreakTier { min_days: u32 },
    #[error("streak tier at {min_days} days has multiplier {percent}% below its lower tier")]
    StreakTierRegression { min_days: u32, percent: u32 },
    #[error("xp curve must be positive at level 1 (got {value})")]
    CurveNotPositive { value: u32 },
    #[error("xp curve must strictly increase (level {level}: {current}, next level: {following})")]
    CurveNotIncreasing {
        level: u32,
        current: u32,
        following: u32,
    },
    #[error("invalid progression config JSON: {0}")]
    Parse(String),
}

/// Complete rule table handed to the engine at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionConfig {
    #[serde(default = "ProgressionConfig::default_daily_limit")]
    pub daily_limit: u32,
    #[serde(default = "ProgressionConfig::default_sick_threshold")]
    pub sick_threshold: i32,
    #[serde(default = "ProgressionConfig::default_sick_multiplier")]
    pub sick_multiplier: Multiplier,
    #[serde(default = "ProgressionConfig::default_happy_threshold")]
    pub happy_threshold: i32,
    #[serde(default = "ProgressionConfig::default_max_health")]
    pub max_health: i32,
    #[serde(default = "ProgressionConfig::default_health_recovery")]
    pub health_recovery: i32,
    #[serde(default = "ProgressionConfig::default_faint_recovery_threshold")]
    pub faint_recovery_threshold: u32,
    #[serde(default = "ProgressionConfig::default_faint_revive_health")]
    pub faint_revive_health: i32,
    #[serde(default = "ProgressionConfig::default_streak_milestone_days")]
    pub streak_milestone_days: u32,
    #[serde(default = "ProgressionConfig::default_streak_tiers")]
    pub streak_tiers: Vec<StreakTier>,
    #[serde(default = "ProgressionConfig::default_base_rewards")]
    pub base_rewards: BTreeMap<ActionCategory, BaseReward>,
    #[serde(default)]
    pub xp_curve: XpCurve,
    #[serde(default = "ProgressionConfig::default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

impl ProgressionConfig {
    const fn default_daily_limit() -> u32 {
        DAILY_LIMIT
    }

    const fn default_sick_threshold() -> i32 {
        SICK_THRESHOLD
    }

    const fn default_sick_multiplier() -> Multiplier {
        Multiplier::from_percent(SICK_MULTIPLIER_PCT)
    }

    const fn default_happy_threshold() -> i32 {
        HAPPY_THRESHOLD
    }

    const fn default_max_health() -> i32 {
        MAX_HEALTH
    }

    const fn default_health_recovery() -> i32 {
        HEALTH_RECOVERY
    }

    const fn default_faint_recovery_threshold() -> u32 {
        FAINT_RECOVERY_THRESHOLD
    }

    const fn default_faint_revive_health() -> i32 {
        FAINT_REVIVE_HEALTH
    }

    const fn default_streak_milestone_days() -> u32 {
        STREAK_MILESTONE_DAYS
    }

    fn default_streak_tiers() -> Vec<StreakTier> {
        vec![
            StreakTier::new(STREAK_TIER_GOLD_DAYS, STREAK_TIER_GOLD_PCT),
            StreakTier::new(STREAK_TIER_SILVER_DAYS, STREAK_TIER_SILVER_PCT),
            StreakTier::new(STREAK_TIER_BRONZE_DAYS, STREAK_TIER_BRONZE_PCT),
        ]
    }

    fn default_base_rewards() -> BTreeMap<ActionCategory, BaseReward> {
        BTreeMap::from([
            (ActionCategory::Tier1, BaseReward::new(TIER1_GOLD, TIER1_XP)),
            (ActionCategory::Tier2, BaseReward::new(TIER2_GOLD, TIER2_XP)),
            (ActionCategory::Tier3, BaseReward::new(TIER3_GOLD, TIER3_XP)),
        ])
    }

    const fn default_utc_offset_minutes() -> i32 {
        DEFAULT_UTC_OFFSET_MINUTES
    }

    /// Parse the config bundled with the crate, falling back to the
    /// compiled-in defaults if the asset is malformed.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_PROGRESSION_DATA).unwrap_or_default()
    }

    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any rule is out of range.
    pub fn from_json(json: &str) -> Result<Self, ProgressionConfigError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| ProgressionConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every rule invariant, including the built-in XP curve.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ProgressionConfigError> {
        if self.daily_limit == 0 {
            return Err(ProgressionConfigError::ZeroDailyLimit);
        }
        if self.faint_recovery_threshold == 0 {
            return Err(ProgressionConfigError::ZeroFaintThreshold);
        }
        check_range("max_health", self.max_health, 1, i32::MAX)?;
        check_range("sick_threshold", self.sick_threshold, 0, self.max_health)?;
        check_range(
            "happy_threshold",
            self.happy_threshold,
            self.sick_threshold,
            self.max_health,
        )?;
        check_range("health_recovery", self.health_recovery, 0, self.max_health)?;
        check_range(
            "faint_revive_health",
            self.faint_revive_health,
            1,
            self.max_health,
        )?;
        check_range(
            "sick_multiplier",
            i64::from(self.sick_multiplier.percent()),
            0,
            100,
        )?;
        check_range(
            "utc_offset_minutes",
            self.utc_offset_minutes,
            -MAX_UTC_OFFSET_MINUTES,
            MAX_UTC_OFFSET_MINUTES,
        )?;
        self.validate_streak_tiers()?;
        validate_curve(&self.xp_curve)
    }

    fn validate_streak_tiers(&self) -> Result<(), ProgressionConfigError> {
        let mut tiers = self.streak_tiers.clone();
        tiers.sort_by_key(|tier| tier.min_days);
        let mut floor = Multiplier::IDENTITY;
        let mut previous_days = None;
        for tier in tiers {
            if previous_days == Some(tier.min_days) {
                return Err(ProgressionConfigError::DuplicateStreakTier {
                    min_days: tier.min_days,
                });
            }
            if tier.multiplier < floor {
                return Err(ProgressionConfigError::StreakTierRegression {
                    min_days: tier.min_days,
                    percent: tier.multiplier.percent(),
                });
            }
            floor = tier.multiplier;
            previous_days = Some(tier.min_days);
        }
        Ok(())
    }

    #[must_use]
    pub fn base_reward(&self, category: ActionCategory) -> Option<BaseReward> {
        self.base_rewards.get(&category).copied()
    }

    #[must_use]
    pub const fn health_rules(&self) -> HealthRules {
        HealthRules {
            max_health: self.max_health,
            recovery: self.health_recovery,
            revive_health: self.faint_revive_health,
            sick_threshold: self.sick_threshold,
            happy_threshold: self.happy_threshold,
        }
    }

    /// Calendar for the configured offset. Out-of-range offsets are caught by
    /// [`Self::validate`]; unvalidated configs fall back to UTC.
    #[must_use]
    pub fn calendar(&self) -> CivilCalendar {
        CivilCalendar::from_offset_minutes(self.utc_offset_minutes).unwrap_or_default()
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            daily_limit: Self::default_daily_limit(),
            sick_threshold: Self::default_sick_threshold(),
            sick_multiplier: Self::default_sick_multiplier(),
            happy_threshold: Self::default_happy_threshold(),
            max_health: Self::default_max_health(),
            health_recovery: Self::default_health_recovery(),
            faint_recovery_threshold: Self::default_faint_recovery_threshold(),
            faint_revive_health: Self::default_faint_revive_health(),
            streak_milestone_days: Self::default_streak_milestone_days(),
            streak_tiers: Self::default_streak_tiers(),
            base_rewards: Self::default_base_rewards(),
            xp_curve: XpCurve::default(),
            utc_offset_minutes: Self::default_utc_offset_minutes(),
        }
    }
}

/// Check that an injected curve is positive at level 1 and strictly
/// increasing over the sampled level range.
///
/// # Errors
///
/// Returns the first level at which the curve fails.
pub fn validate_curve<C: LevelCurve + ?Sized>(curve: &C) -> Result<(), ProgressionConfigError> {
    let first = curve.max_xp(1);
    if first == 0 {
        return Err(ProgressionConfigError::CurveNotPositive { value: first });
    }
    let mut current = first;
    for level in 1..XP_CURVE_VALIDATION_LEVELS {
        let following = curve.max_xp(level + 1);
        if following <= current {
            return Err(ProgressionConfigError::CurveNotIncreasing {
                level,
                current,
                following,
            });
        }
        current = following;
    }
    Ok(())
}

fn check_range<T>(field: &'static str, value: T, min: T, max: T) -> Result<(), ProgressionConfigError>
where
    T: Into<i64> + Copy,
{
    let (value, min, max) = (value.into(), min.into(), max.into());
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ProgressionConfigError::RangeViolation {
            field,
            min,
            max,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_config_matches_defaults() {
        let bundled = ProgressionConfig::from_json(DEFAULT_PROGRESSION_DATA).unwrap();
        assert_eq!(bundled, ProgressionConfig::default());
        assert_eq!(ProgressionConfig::load_from_static(), bundled);
    }

    #[test]
    fn defaults_validate() {
        ProgressionConfig::default().validate().unwrap();
    }

    #[test]
    fn sparse_json_fills_defaults() {
        let config = ProgressionConfig::from_json(r#"{"daily_limit": 3}"#).unwrap();
        assert_eq!(config.daily_limit, 3);
        assert_eq!(config.faint_recovery_threshold, 3);
        assert_eq!(
            config.base_reward(ActionCategory::Tier1),
            Some(BaseReward::new(10, 25))
        );
    }

    #[test]
    fn rejects_zero_limits() {
        let err = ProgressionConfig::from_json(r#"{"daily_limit": 0}"#).unwrap_err();
        assert_eq!(err, ProgressionConfigError::ZeroDailyLimit);
        let err = ProgressionConfig::from_json(r#"{"faint_recovery_threshold": 0}"#).unwrap_err();
        assert_eq!(err, ProgressionConfigError::ZeroFaintThreshold);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = ProgressionConfig::from_json(r#"{"sick_multiplier": 140}"#).unwrap_err();
        assert!(matches!(
            err,
            ProgressionConfigError::RangeViolation {
                field: "sick_multiplier",
                ..
            }
        ));
        let err = ProgressionConfig::from_json(r#"{"faint_revive_health": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            ProgressionConfigError::RangeViolation {
                field: "faint_revive_health",
                ..
            }
        ));
        let err = ProgressionConfig::from_json(r#"{"utc_offset_minutes": 1200}"#).unwrap_err();
        assert!(matches!(
            err,
            ProgressionConfigError::RangeViolation {
                field: "utc_offset_minutes",
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_streak_tiers() {
        let dup = r#"{"streak_tiers": [
            {"min_days": 7, "multiplier": 110},
            {"min_days": 7, "multiplier": 120}
        ]}"#;
        assert_eq!(
            ProgressionConfig::from_json(dup).unwrap_err(),
            ProgressionConfigError::DuplicateStreakTier { min_days: 7 }
        );
        let regress = r#"{"streak_tiers": [
            {"min_days": 7, "multiplier": 130},
            {"min_days": 14, "multiplier": 110}
        ]}"#;
        assert_eq!(
            ProgressionConfig::from_json(regress).unwrap_err(),
            ProgressionConfigError::StreakTierRegression {
                min_days: 14,
                percent: 110
            }
        );
    }

    #[test]
    fn rejects_flat_curves() {
        let flat = r#"{"xp_curve": {"kind": "linear", "base": 100, "per_level": 0}}"#;
        assert_eq!(
            ProgressionConfig::from_json(flat).unwrap_err(),
            ProgressionConfigError::CurveNotIncreasing {
                level: 1,
                current: 100,
                following: 100
            }
        );
        let table = r#"{"xp_curve": {"kind": "table", "thresholds": [0, 10], "overflow_step": 5}}"#;
        assert_eq!(
            ProgressionConfig::from_json(table).unwrap_err(),
            ProgressionConfigError::CurveNotPositive { value: 0 }
        );
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ProgressionConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ProgressionConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid progression config JSON"));
    }

    #[test]
    fn calendar_follows_offset() {
        let config = ProgressionConfig {
            utc_offset_minutes: -480,
            ..ProgressionConfig::default()
        };
        assert_eq!(config.calendar().offset().local_minus_utc(), -480 * 60);
    }
}
