//! Experience curves and strict-reset leveling.
use serde::{Deserialize, Serialize};

use crate::constants::{XP_CURVE_BASE, XP_CURVE_EXPONENT};
use crate::numbers::{floor_f64_to_u32, u32_to_f64};

/// XP needed to clear a level. Implementations must be strictly
/// increasing in `level` and positive from level 1.
pub trait LevelCurve {
    fn max_xp(&self, level: u32) -> u32;
}

impl<F> LevelCurve for F
where
    F: Fn(u32) -> u32,
{
    fn max_xp(&self, level: u32) -> u32 {
        self(level)
    }
}

/// Built-in curve shapes that can live in a JSON config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum XpCurve {
    /// `base + per_level × (level - 1)`
    Linear { base: u32, per_level: u32 },
    /// `floor(base × level^exponent)`
    Power { base: f64, exponent: f64 },
    /// Explicit thresholds for the first levels, then a fixed step per level
    /// past the end of the table.
    Table {
        thresholds: Vec<u32>,
        overflow_step: u32,
    },
}

impl Default for XpCurve {
    fn default() -> Self {
        Self::Power {
            base: XP_CURVE_BASE,
            exponent: XP_CURVE_EXPONENT,
        }
    }
}

impl LevelCurve for XpCurve {
    fn max_xp(&self, level: u32) -> u32 {
        let level = level.max(1);
        match self {
            Self::Linear { base, per_level } => {
                base.saturating_add(per_level.saturating_mul(level - 1))
            }
            Self::Power { base, exponent } => {
                floor_f64_to_u32(base * u32_to_f64(level).powf(*exponent))
            }
            Self::Table {
                thresholds,
                overflow_step,
            } => {
                let index = usize::try_from(level - 1).unwrap_or(usize::MAX);
                if let Some(value) = thresholds.get(index) {
                    return *value;
                }
                let last = thresholds.last().copied().unwrap_or(0);
                let extra = u32::try_from(index + 1 - thresholds.len()).unwrap_or(u32::MAX);
                last.saturating_add(overflow_step.saturating_mul(extra))
            }
        }
    }
}

/// Level state after applying one action's XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelOutcome {
    pub new_xp: u32,
    pub new_level: u32,
    pub new_max_xp: u32,
    pub leveled_up: bool,
}

/// Accumulate `xp_earned` against the curve.
///
/// Reaching the threshold advances exactly one level and discards every
/// point of overflow. Even if one grant would span several levels the
/// player moves up once; the excess is dropped.
#[must_use]
pub fn apply_xp<C: LevelCurve + ?Sized>(
    curve: &C,
    current_xp: u32,
    level: u32,
    xp_earned: u32,
) -> LevelOutcome {
    let threshold = curve.max_xp(level);
    let accumulated = current_xp.saturating_add(xp_earned);
    if accumulated >= threshold {
        let new_level = level.saturating_add(1);
        LevelOutcome {
            new_xp: 0,
            new_level,
            new_max_xp: curve.max_xp(new_level),
            leveled_up: true,
        }
    } else {
        LevelOutcome {
            new_xp: accumulated,
            new_level: level,
            new_max_xp: threshold,
            leveled_up: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_power_curve_matches_balance_sheet() {
        let curve = XpCurve::default();
        assert_eq!(curve.max_xp(1), 100);
        assert_eq!(curve.max_xp(2), 282);
        assert_eq!(curve.max_xp(10), 3162);
    }

    #[test]
    fn linear_and_table_curves() {
        let linear = XpCurve::Linear {
            base: 100,
            per_level: 50,
        };
        assert_eq!(linear.max_xp(1), 100);
        assert_eq!(linear.max_xp(3), 200);

        let table = XpCurve::Table {
            thresholds: vec![50, 120, 300],
            overflow_step: 200,
        };
        assert_eq!(table.max_xp(1), 50);
        assert_eq!(table.max_xp(3), 300);
        assert_eq!(table.max_xp(4), 500);
        assert_eq!(table.max_xp(6), 900);
    }

    #[test]
    fn overflow_is_discarded_on_level_up() {
        let curve = |_level: u32| -> u32 { 100 };
        let outcome = apply_xp(&curve, 90, 1, 35);
        assert!(outcome.leveled_up);
        assert_eq!(outcome.new_level, 2);
        assert_eq!(outcome.new_xp, 0);
    }

    #[test]
    fn exact_threshold_levels_up() {
        let curve = XpCurve::default();
        let outcome = apply_xp(&curve, 75, 1, 25);
        assert!(outcome.leveled_up);
        assert_eq!(outcome.new_xp, 0);
        assert_eq!(outcome.new_max_xp, 282);
    }

    #[test]
    fn below_threshold_accumulates() {
        let curve = XpCurve::default();
        let outcome = apply_xp(&curve, 10, 1, 25);
        assert!(!outcome.leveled_up);
        assert_eq!(outcome.new_xp, 35);
        assert_eq!(outcome.new_level, 1);
        assert_eq!(outcome.new_max_xp, 100);
    }

    #[test]
    fn oversized_grant_still_moves_one_level() {
        let curve = XpCurve::Linear {
            base: 10,
            per_level: 10,
        };
        let outcome = apply_xp(&curve, 0, 1, 1_000);
        assert_eq!(outcome.new_level, 2);
        assert_eq!(outcome.new_xp, 0);
    }

    #[test]
    fn curve_round_trips_through_json() {
        let json = r#"{"kind":"linear","base":120,"per_level":30}"#;
        let curve: XpCurve = serde_json::from_str(json).unwrap();
        assert_eq!(
            curve,
            XpCurve::Linear {
                base: 120,
                per_level: 30
            }
        );
    }
}
