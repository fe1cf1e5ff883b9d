//! Centralized balance and tuning constants for Nibble progression.
//!
//! These are the product defaults behind `ProgressionConfig::default()`.
//! Deployments may override them through the bundled JSON config, but the
//! values here are what the shipped game runs with.

// Message keys -------------------------------------------------------------
pub(crate) const MSG_REVIVED: &str = "reward.revived";
pub(crate) const MSG_RECOVERING: &str = "reward.recovering";
pub(crate) const MSG_DAILY_LIMIT: &str = "reward.daily-limit";
pub(crate) const MSG_LEVEL_UP: &str = "reward.level-up";
pub(crate) const MSG_STREAK_MILESTONE: &str = "reward.streak-milestone";
pub(crate) const MSG_SUCCESS: &str = "reward.success";

// Quota --------------------------------------------------------------------
pub(crate) const DAILY_LIMIT: u32 = 5;

// Health and mood ----------------------------------------------------------
pub(crate) const MAX_HEALTH: i32 = 100;
pub(crate) const SICK_THRESHOLD: i32 = 20;
pub(crate) const HAPPY_THRESHOLD: i32 = 60;
pub(crate) const HEALTH_RECOVERY: i32 = 8;
pub(crate) const SICK_MULTIPLIER_PCT: u32 = 75;

// Faint / revival ----------------------------------------------------------
pub(crate) const FAINT_RECOVERY_THRESHOLD: u32 = 3;
pub(crate) const FAINT_REVIVE_HEALTH: i32 = 20;

// Streaks ------------------------------------------------------------------
pub(crate) const STREAK_MILESTONE_DAYS: u32 = 7;
pub(crate) const STREAK_TIER_GOLD_DAYS: u32 = 30;
pub(crate) const STREAK_TIER_GOLD_PCT: u32 = 150;
pub(crate) const STREAK_TIER_SILVER_DAYS: u32 = 14;
pub(crate) const STREAK_TIER_SILVER_PCT: u32 = 120;
pub(crate) const STREAK_TIER_BRONZE_DAYS: u32 = 7;
pub(crate) const STREAK_TIER_BRONZE_PCT: u32 = 110;

// Base rewards (gold, xp) --------------------------------------------------
pub(crate) const TIER1_GOLD: u32 = 10;
pub(crate) const TIER1_XP: u32 = 25;
pub(crate) const TIER2_GOLD: u32 = 20;
pub(crate) const TIER2_XP: u32 = 50;
pub(crate) const TIER3_GOLD: u32 = 35;
pub(crate) const TIER3_XP: u32 = 80;

// Experience curve ---------------------------------------------------------
pub(crate) const XP_CURVE_BASE: f64 = 100.0;
pub(crate) const XP_CURVE_EXPONENT: f64 = 1.5;
/// Levels sampled when validating that a configured curve strictly increases.
pub(crate) const XP_CURVE_VALIDATION_LEVELS: u32 = 200;

// Calendar -----------------------------------------------------------------
pub(crate) const DEFAULT_UTC_OFFSET_MINUTES: i32 = 0;
pub(crate) const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;
