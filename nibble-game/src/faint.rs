//! Faint / revival state machine.
//!
//! Fainting is entered elsewhere (health hitting zero); here an action taken
//! while fainted only counts toward recovery.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FaintState {
    Healthy,
    Fainted { recovery_count: u32 },
}

impl FaintState {
    #[must_use]
    pub const fn from_flags(is_fainted: bool, recovery_count: u32) -> Self {
        if is_fainted {
            Self::Fainted { recovery_count }
        } else {
            Self::Healthy
        }
    }

    #[must_use]
    pub const fn is_fainted(self) -> bool {
        matches!(self, Self::Fainted { .. })
    }

    #[must_use]
    pub const fn recovery_count(self) -> u32 {
        match self {
            Self::Healthy => 0,
            Self::Fainted { recovery_count } => recovery_count,
        }
    }
}

/// Result of feeding one action through the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaintOutcome {
    /// Status when the action arrived.
    pub was_fainted: bool,
    pub next: FaintState,
    pub revived: bool,
}

impl FaintOutcome {
    /// Fainted before and after this action.
    #[must_use]
    pub const fn still_fainted(&self) -> bool {
        self.next.is_fainted()
    }
}

/// Advance the machine for one action.
#[must_use]
pub const fn step_faint(state: FaintState, threshold: u32) -> FaintOutcome {
    match state {
        FaintState::Healthy => FaintOutcome {
            was_fainted: false,
            next: FaintState::Healthy,
            revived: false,
        },
        FaintState::Fainted { recovery_count } => {
            let count = recovery_count.saturating_add(1);
            if count >= threshold {
                FaintOutcome {
                    was_fainted: true,
                    next: FaintState::Healthy,
                    revived: true,
                }
            } else {
                FaintOutcome {
                    was_fainted: true,
                    next: FaintState::Fainted {
                        recovery_count: count,
                    },
                    revived: false,
                }
            }
        }
    }
}
