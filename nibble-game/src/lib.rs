//! Nibble Progression Engine
//!
//! Deterministic reward rules for the Nibble nutrition game: streaks and
//! streak shields, pet faint and revival, the daily reward quota, gold and
//! XP rewards, strict-reset leveling, and pet health and mood.
//! This crate performs no I/O; persistence is reached through [`PlayerStore`].

pub mod calendar;
pub mod config;
pub mod constants;
pub mod engine;
pub mod faint;
pub mod health;
pub mod ledger;
pub mod leveling;
pub mod message;
pub mod numbers;
pub mod quota;
pub mod rewards;
pub mod state;
pub mod store;
pub mod streak;

// Re-export commonly used types
pub use calendar::{CivilCalendar, DayRelation};
pub use config::{ProgressionConfig, ProgressionConfigError, validate_curve};
pub use engine::{InvalidInput, ProgressionEngine, ProgressionError, RewardReceipt, Transition};
pub use faint::{FaintOutcome, FaintState, step_faint};
pub use health::{HealthRules, Vitals, derive_mood, next_health, resolve_vitals};
pub use ledger::{LedgerEntry, LedgerSummary};
pub use leveling::{LevelCurve, LevelOutcome, XpCurve, apply_xp};
pub use message::{MessageInputs, RewardMessage, select_message};
pub use quota::{QuotaWindow, can_earn_rewards, reset_quota};
pub use rewards::{BaseReward, RewardGrant, RewardInputs, compute_reward};
pub use state::{
    ActionCategory, ActionEvent, Mood, PlayerState, RecipeDifficulty, SourceRef,
};
pub use store::{MemoryStore, PlayerId, PlayerStore, ProgressionService, ServiceError};
pub use streak::{
    Multiplier, StreakOutcome, StreakTier, advance_streak, is_milestone, streak_multiplier,
};
