//! Progression orchestrator.
//!
//! Threads one action through the faint machine, streak tracker, quota,
//! reward calculator, level curve, and health/mood engine, in that order,
//! and assembles the receipt. Every step is a pure function of its inputs;
//! this module is the only place state moves between them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::CivilCalendar;
use crate::config::{ProgressionConfig, ProgressionConfigError, validate_curve};
use crate::faint::{FaintState, step_faint};
use crate::health::resolve_vitals;
use crate::ledger::LedgerEntry;
use crate::leveling::{LevelCurve, XpCurve, apply_xp};
use crate::message::{MessageInputs, RewardMessage, select_message};
use crate::quota::{can_earn_rewards, reset_quota};
use crate::rewards::{RewardInputs, compute_reward};
use crate::state::{ActionCategory, ActionEvent, Mood, PlayerState};
use crate::streak::{Multiplier, advance_streak, is_milestone, streak_multiplier};

/// Structurally invalid input. Callers treat this as a programming error:
/// log it and reject the request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("no base reward configured for category {0}")]
    UnknownCategory(ActionCategory),
    #[error("player level must be at least 1")]
    LevelZero,
    #[error("current xp {current_xp} must be below {max_xp} at level {level}")]
    XpOutOfRange {
        level: u32,
        current_xp: u32,
        max_xp: u32,
    },
    #[error("health {value} outside 0..={max}")]
    HealthOutOfRange { value: i32, max: i32 },
    #[error("faint recovery count {value} must be below {threshold}")]
    RecoveryCountOutOfRange { value: u32, threshold: u32 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
}

/// Outcome of one action, built once and handed to the caller for
/// persistence, ledger rows, and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardReceipt {
    /// Civil day the action was attributed to.
    pub civil_day: NaiveDate,
    pub gold_earned: u32,
    pub xp_earned: u32,
    pub new_xp: u32,
    pub new_level: u32,
    pub new_max_xp: u32,
    pub leveled_up: bool,
    pub new_health: i32,
    pub new_mood: Mood,
    pub streak_days: u32,
    pub streak_multiplier: Multiplier,
    pub streak_shield_consumed: bool,
    pub streak_milestone: bool,
    pub is_fainted: bool,
    pub faint_recovery_count: u32,
    pub revived_from_faint: bool,
    pub daily_action_count: u32,
    pub hit_daily_limit: bool,
    pub message: RewardMessage,
}

impl RewardReceipt {
    #[must_use]
    pub const fn granted_rewards(&self) -> bool {
        self.gold_earned > 0 || self.xp_earned > 0
    }
}

/// The only legal successor of a `PlayerState` plus its receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: PlayerState,
    pub receipt: RewardReceipt,
}

impl Transition {
    /// Immutable ledger row for this transition.
    #[must_use]
    pub fn ledger_entry(&self, event: &ActionEvent) -> LedgerEntry {
        LedgerEntry::record(event, &self.receipt)
    }
}

/// Deterministic rule engine. Holds no per-player state, so one instance
/// can serve every player concurrently.
#[derive(Debug, Clone)]
pub struct ProgressionEngine<C = XpCurve> {
    config: ProgressionConfig,
    curve: C,
    calendar: CivilCalendar,
}

impl ProgressionEngine<XpCurve> {
    /// Engine driven by the config's own XP curve.
    ///
    /// # Errors
    ///
    /// Returns an error if the config fails validation.
    pub fn new(config: ProgressionConfig) -> Result<Self, ProgressionConfigError> {
        let curve = config.xp_curve.clone();
        Self::with_curve(config, curve)
    }

    /// Engine using the bundled product config.
    #[must_use]
    pub fn standard() -> Self {
        let config = ProgressionConfig::load_from_static();
        let calendar = config.calendar();
        Self {
            curve: config.xp_curve.clone(),
            config,
            calendar,
        }
    }
}

impl<C: LevelCurve> ProgressionEngine<C> {
    /// Engine with an injected XP curve in place of the config's built-in one.
    ///
    /// # Errors
    ///
    /// Returns an error if the config or the curve fails validation.
    pub fn with_curve(config: ProgressionConfig, curve: C) -> Result<Self, ProgressionConfigError> {
        config.validate()?;
        validate_curve(&curve)?;
        let calendar = config.calendar();
        Ok(Self {
            config,
            curve,
            calendar,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    #[must_use]
    pub const fn curve(&self) -> &C {
        &self.curve
    }

    #[must_use]
    pub const fn calendar(&self) -> &CivilCalendar {
        &self.calendar
    }

    /// The civil day used for every comparison in a transition.
    #[must_use]
    pub fn today(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.calendar.civil_day(instant)
    }

    #[must_use]
    pub fn max_xp(&self, level: u32) -> u32 {
        self.curve.max_xp(level)
    }

    /// Check a snapshot against its invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate_state(&self, state: &PlayerState) -> Result<(), InvalidInput> {
        if state.level == 0 {
            return Err(InvalidInput::LevelZero);
        }
        let max_xp = self.max_xp(state.level);
        if state.current_xp >= max_xp {
            return Err(InvalidInput::XpOutOfRange {
                level: state.level,
                current_xp: state.current_xp,
                max_xp,
            });
        }
        if !(0..=self.config.max_health).contains(&state.health_points) {
            return Err(InvalidInput::HealthOutOfRange {
                value: state.health_points,
                max: self.config.max_health,
            });
        }
        if state.faint_recovery_count >= self.config.faint_recovery_threshold {
            return Err(InvalidInput::RecoveryCountOutOfRange {
                value: state.faint_recovery_count,
                threshold: self.config.faint_recovery_threshold,
            });
        }
        Ok(())
    }

    /// Apply one reward-granting action.
    ///
    /// Business outcomes (daily cap, fainted pet, broken streak) are data in
    /// the receipt. Calling this twice with the same event grants twice.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::InvalidInput`] for an unknown category or
    /// a snapshot that violates its invariants.
    pub fn apply(
        &self,
        state: &PlayerState,
        event: &ActionEvent,
    ) -> Result<Transition, ProgressionError> {
        self.validate_state(state).inspect_err(|err| {
            log::warn!("rejecting action {}: {err}", event.source_ref);
        })?;
        let base = self
            .config
            .base_reward(event.category)
            .ok_or(InvalidInput::UnknownCategory(event.category))
            .inspect_err(|err| {
                log::warn!("rejecting action {}: {err}", event.source_ref);
            })?;

        let cfg = &self.config;
        let today = self.today(event.occurred_at);

        let faint = step_faint(
            FaintState::from_flags(state.is_fainted, state.faint_recovery_count),
            cfg.faint_recovery_threshold,
        );
        let streak = advance_streak(
            state.streak_days,
            state.last_action_date,
            state.streak_shield_active,
            today,
        );
        let quota = reset_quota(state.daily_action_count, state.last_quota_reset_date, today);
        let can_earn = can_earn_rewards(&quota, cfg.daily_limit, faint.was_fainted);
        let hit_daily_limit = !quota.has_room(cfg.daily_limit);

        let multiplier = streak_multiplier(&cfg.streak_tiers, streak.streak_days);
        let grant = compute_reward(
            base,
            &RewardInputs {
                streak_multiplier: multiplier,
                health_points: state.health_points,
                sick_threshold: cfg.sick_threshold,
                sick_multiplier: cfg.sick_multiplier,
                can_earn_rewards: can_earn,
            },
        );

        let level = apply_xp(&self.curve, state.current_xp, state.level, grant.xp);
        let vitals = resolve_vitals(&cfg.health_rules(), state.health_points, &faint);
        let daily_action_count = quota.settle(can_earn);
        let streak_milestone = is_milestone(streak.streak_days, cfg.streak_milestone_days);

        let message = select_message(&MessageInputs {
            revived: faint.revived,
            still_fainted: faint.still_fainted(),
            hit_daily_limit,
            leveled_up: level.leveled_up,
            streak_milestone,
            health: vitals.health,
            recovery_count: faint.next.recovery_count(),
            recovery_threshold: cfg.faint_recovery_threshold,
            daily_limit: cfg.daily_limit,
            level: level.new_level,
            streak_days: streak.streak_days,
            gold: grant.gold,
            xp: grant.xp,
        });

        let receipt = RewardReceipt {
            civil_day: today,
            gold_earned: grant.gold,
            xp_earned: grant.xp,
            new_xp: level.new_xp,
            new_level: level.new_level,
            new_max_xp: level.new_max_xp,
            leveled_up: level.leveled_up,
            new_health: vitals.health,
            new_mood: vitals.mood,
            streak_days: streak.streak_days,
            streak_multiplier: multiplier,
            streak_shield_consumed: streak.shield_consumed,
            streak_milestone,
            is_fainted: faint.next.is_fainted(),
            faint_recovery_count: faint.next.recovery_count(),
            revived_from_faint: faint.revived,
            daily_action_count,
            hit_daily_limit,
            message,
        };

        let next = PlayerState {
            level: level.new_level,
            current_xp: level.new_xp,
            health_points: vitals.health,
            mood: vitals.mood,
            wallet_balance: state
                .wallet_balance
                .saturating_add(u64::from(grant.gold)),
            total_savings_accrued: state
                .total_savings_accrued
                .saturating_add(event.savings_cents),
            streak_days: streak.streak_days,
            last_action_date: Some(today),
            streak_shield_active: streak.shield_active,
            is_fainted: faint.next.is_fainted(),
            faint_recovery_count: faint.next.recovery_count(),
            daily_action_count,
            last_quota_reset_date: quota.reset_date,
        };

        log::debug!(
            "action {} on {today}: +{}g +{}xp level {} ({}/{}) hp {} streak {} ({}) quota {}/{} [{}]",
            event.source_ref,
            receipt.gold_earned,
            receipt.xp_earned,
            receipt.new_level,
            receipt.new_xp,
            receipt.new_max_xp,
            receipt.new_health,
            receipt.streak_days,
            receipt.streak_multiplier,
            receipt.daily_action_count,
            cfg.daily_limit,
            receipt.message.key()
        );

        Ok(Transition {
            state: next,
            receipt,
        })
    }
}
