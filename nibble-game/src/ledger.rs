//! Append-only reward ledger rows.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::RewardReceipt;
use crate::state::{ActionCategory, ActionEvent, Mood, SourceRef};
use crate::streak::Multiplier;

/// One row per applied action, zero-reward actions included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub source_ref: SourceRef,
    pub category: ActionCategory,
    pub occurred_at: DateTime<Utc>,
    pub civil_day: NaiveDate,
    pub gold_earned: u32,
    pub xp_earned: u32,
    pub xp_after: u32,
    pub max_xp_after: u32,
    pub level_after: u32,
    pub leveled_up: bool,
    pub health_after: i32,
    pub mood_after: Mood,
    pub streak_days: u32,
    pub streak_multiplier: Multiplier,
    pub streak_shield_consumed: bool,
    pub is_fainted: bool,
    pub faint_recovery_count: u32,
    pub revived_from_faint: bool,
    pub daily_action_count: u32,
    pub hit_daily_limit: bool,
    pub message_key: String,
}

impl LedgerEntry {
    #[must_use]
    pub fn record(event: &ActionEvent, receipt: &RewardReceipt) -> Self {
        Self {
            source_ref: event.source_ref.clone(),
            category: event.category,
            occurred_at: event.occurred_at,
            civil_day: receipt.civil_day,
            gold_earned: receipt.gold_earned,
            xp_earned: receipt.xp_earned,
            xp_after: receipt.new_xp,
            max_xp_after: receipt.new_max_xp,
            level_after: receipt.new_level,
            leveled_up: receipt.leveled_up,
            health_after: receipt.new_health,
            mood_after: receipt.new_mood,
            streak_days: receipt.streak_days,
            streak_multiplier: receipt.streak_multiplier,
            streak_shield_consumed: receipt.streak_shield_consumed,
            is_fainted: receipt.is_fainted,
            faint_recovery_count: receipt.faint_recovery_count,
            revived_from_faint: receipt.revived_from_faint,
            daily_action_count: receipt.daily_action_count,
            hit_daily_limit: receipt.hit_daily_limit,
            message_key: receipt.message.key().to_string(),
        }
    }
}

/// Totals over a run of ledger rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub actions: u32,
    pub rewarded_actions: u32,
    pub gold: u64,
    pub xp: u64,
    pub level_ups: u32,
    pub shields_consumed: u32,
    pub revivals: u32,
    pub capped_actions: u32,
}

impl LedgerSummary {
    #[must_use]
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> Self {
        entries.into_iter().fold(Self::default(), |mut acc, entry| {
            acc.actions += 1;
            if entry.gold_earned > 0 || entry.xp_earned > 0 {
                acc.rewarded_actions += 1;
            }
            acc.gold += u64::from(entry.gold_earned);
            acc.xp += u64::from(entry.xp_earned);
            acc.level_ups += u32::from(entry.leveled_up);
            acc.shields_consumed += u32::from(entry.streak_shield_consumed);
            acc.revivals += u32::from(entry.revived_from_faint);
            acc.capped_actions += u32::from(entry.hit_daily_limit);
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProgressionConfig;
    use crate::engine::ProgressionEngine;
    use crate::state::PlayerState;
    use chrono::TimeZone;

    #[test]
    fn rows_capture_capped_actions() {
        let engine = ProgressionEngine::new(ProgressionConfig::default()).unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let mut state = PlayerState::new(start);
        let mut rows = Vec::new();
        for n in 0..7 {
            let event = ActionEvent::new(
                ActionCategory::Tier2,
                Utc.with_ymd_and_hms(2026, 3, 2, 8 + n, 0, 0).unwrap(),
                format!("meal-{n}"),
            );
            let transition = engine.apply(&state, &event).unwrap();
            rows.push(transition.ledger_entry(&event));
            state = transition.state;
        }

        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].source_ref.as_str(), "meal-0");
        assert_eq!(rows[0].civil_day, start);
        assert_eq!(rows[6].gold_earned, 0);
        assert_eq!(rows[6].message_key, "reward.daily-limit");

        let summary = LedgerSummary::from_entries(&rows);
        assert_eq!(summary.actions, 7);
        assert_eq!(summary.rewarded_actions, 5);
        assert_eq!(summary.gold, 100);
        assert_eq!(summary.capped_actions, 2);
        assert_eq!(summary.level_ups, 1);
    }

    #[test]
    fn rows_carry_vitals_for_history_charts() {
        let engine = ProgressionEngine::standard();
        let mut state = PlayerState::new(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()).fainted();
        let mut rows = Vec::new();
        for n in 0..4 {
            let event = ActionEvent::new(
                ActionCategory::Tier1,
                Utc.with_ymd_and_hms(2026, 3, 2, 9 + n, 0, 0).unwrap(),
                format!("salad-{n}"),
            );
            let transition = engine.apply(&state, &event).unwrap();
            rows.push(transition.ledger_entry(&event));
            state = transition.state;
        }

        assert_eq!(rows[0].health_after, 0);
        assert_eq!(rows[0].mood_after, Mood::Sick);
        assert_eq!(rows[1].faint_recovery_count, 2);
        assert!(rows[2].revived_from_faint);
        assert_eq!(rows[2].faint_recovery_count, 0);
        assert_eq!(rows[2].health_after, 20);
        assert_eq!(rows[2].mood_after, Mood::Neutral);
        assert_eq!(rows[3].health_after, 28);
        assert_eq!(rows[3].xp_after, rows[3].xp_earned);
        assert_eq!(rows[3].max_xp_after, engine.max_xp(1));
        assert_eq!(rows[3].xp_after, state.current_xp);
    }

    #[test]
    fn rows_serialize_flat() {
        let engine = ProgressionEngine::standard();
        let event = ActionEvent::new(
            ActionCategory::Tier3,
            Utc.with_ymd_and_hms(2026, 3, 2, 18, 30, 0).unwrap(),
            "roast",
        );
        let state = PlayerState::new(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        let row = engine.apply(&state, &event).unwrap().ledger_entry(&event);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["source_ref"], "roast");
        assert_eq!(json["category"], "tier3");
        assert_eq!(json["xp_earned"], 80);
        assert_eq!(json["message_key"], "reward.success");
        assert_eq!(json["health_after"], 100);
    }
}
