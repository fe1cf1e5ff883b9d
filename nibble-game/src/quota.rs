//! Daily reward quota with civil-day reset.
use chrono::NaiveDate;

/// Quota counters after applying the day-boundary reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaWindow {
    /// Rewarded actions already taken today.
    pub effective_count: u32,
    pub was_reset: bool,
    /// Reset date to persist with the successor state.
    pub reset_date: NaiveDate,
}

impl QuotaWindow {
    /// Whether the cap still leaves room for a rewarded action.
    #[must_use]
    pub const fn has_room(&self, daily_limit: u32) -> bool {
        self.effective_count < daily_limit
    }

    /// Count to persist once the action resolves. Only rewarded actions
    /// advance the counter, so it freezes at the cap.
    #[must_use]
    pub const fn settle(&self, rewarded: bool) -> u32 {
        if rewarded {
            self.effective_count.saturating_add(1)
        } else {
            self.effective_count
        }
    }
}

/// Roll the stored counter over when `today` is past the last reset date.
#[must_use]
pub fn reset_quota(daily_action_count: u32, last_reset: NaiveDate, today: NaiveDate) -> QuotaWindow {
    if last_reset < today {
        QuotaWindow {
            effective_count: 0,
            was_reset: true,
            reset_date: today,
        }
    } else {
        QuotaWindow {
            effective_count: daily_action_count,
            was_reset: false,
            reset_date: last_reset,
        }
    }
}

/// Rewards are available while the cap has room and the pet was conscious
/// when the action started.
#[must_use]
pub const fn can_earn_rewards(window: &QuotaWindow, daily_limit: u32, was_fainted: bool) -> bool {
    window.has_room(daily_limit) && !was_fainted
}
