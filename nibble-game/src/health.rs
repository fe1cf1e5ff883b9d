//! Pet health regeneration and mood derivation.
use crate::faint::FaintOutcome;
use crate::state::Mood;

/// Health and mood thresholds in effect for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthRules {
    pub max_health: i32,
    pub recovery: i32,
    pub revive_health: i32,
    pub sick_threshold: i32,
    pub happy_threshold: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vitals {
    pub health: i32,
    pub mood: Mood,
}

/// Health after one action.
#[must_use]
pub fn next_health(rules: &HealthRules, health_points: i32, faint: &FaintOutcome) -> i32 {
    if faint.revived {
        rules.revive_health
    } else if faint.still_fainted() {
        health_points
    } else {
        health_points
            .saturating_add(rules.recovery)
            .min(rules.max_health)
    }
}

/// Mood is never stored independently; it always follows from these inputs.
#[must_use]
pub const fn derive_mood(rules: &HealthRules, health: i32, still_fainted: bool) -> Mood {
    if still_fainted || health < rules.sick_threshold {
        Mood::Sick
    } else if health >= rules.happy_threshold {
        Mood::Happy
    } else {
        Mood::Neutral
    }
}

#[must_use]
pub fn resolve_vitals(rules: &HealthRules, health_points: i32, faint: &FaintOutcome) -> Vitals {
    let health = next_health(rules, health_points, faint);
    Vitals {
        health,
        mood: derive_mood(rules, health, faint.still_fainted()),
    }
}
