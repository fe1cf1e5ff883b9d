use chrono::{Duration, NaiveDate, TimeZone, Utc};
use nibble_game::{
    ActionCategory, ActionEvent, CivilCalendar, DayRelation, LevelCurve, Mood, PlayerState,
    ProgressionConfig, ProgressionEngine, XpCurve,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const STEPS: usize = 2_000;
const SEEDS: [u64; 4] = [0x5EED, 0xC0FFEE, 7, 0xDEAD_BEEF];

fn start_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
}

/// Drive a seeded random history and check every transition against the
/// progression invariants.
fn run_history<C: LevelCurve>(engine: &ProgressionEngine<C>, seed: u64) {
    let config = engine.config().clone();
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut state = PlayerState::new(start_day());
    let mut day = start_day();

    for step in 0..STEPS {
        match rng.gen_range(0..10) {
            0..=5 => {}
            6..=8 => day += Duration::days(1),
            _ => day += Duration::days(rng.gen_range(2..6)),
        }
        if !state.streak_shield_active && rng.gen_bool(0.05) {
            state = state.with_shield();
        }
        if !state.is_fainted && rng.gen_bool(0.03) {
            state = state.fainted();
        }

        let category = ActionCategory::ALL[rng.gen_range(0..ActionCategory::ALL.len())];
        let hour = rng.gen_range(0..24);
        let instant = Utc.from_utc_datetime(&day.and_hms_opt(hour, 0, 0).unwrap());
        let event = ActionEvent::new(category, instant, format!("seed-{seed}-step-{step}"));

        let before = state.clone();
        let transition = engine.apply(&before, &event).unwrap();
        let receipt = &transition.receipt;
        let after = &transition.state;
        let context = format!("seed {seed} step {step}");

        // XP stays inside the current level and leveling is strict-reset.
        assert!(after.current_xp < engine.max_xp(after.level), "{context}");
        assert!(after.level - before.level <= 1, "{context}");
        if receipt.leveled_up {
            assert_eq!(after.current_xp, 0, "{context}");
            assert_eq!(after.level, before.level + 1, "{context}");
        }
        assert_eq!(receipt.new_max_xp, engine.max_xp(after.level), "{context}");

        // Quota never exceeds the cap.
        assert!(after.daily_action_count <= config.daily_limit, "{context}");
        if receipt.gold_earned > 0 {
            assert!(!receipt.hit_daily_limit, "{context}");
        }

        // Streak follows the day relation.
        let relation = CivilCalendar::classify(before.last_action_date, receipt.civil_day);
        match relation {
            DayRelation::First => assert_eq!(after.streak_days, 1, "{context}"),
            DayRelation::SameDay => {
                assert_eq!(after.streak_days, before.streak_days, "{context}");
            }
            DayRelation::Consecutive => {
                assert_eq!(after.streak_days, before.streak_days + 1, "{context}");
            }
            DayRelation::Gap if before.streak_shield_active => {
                assert_eq!(after.streak_days, before.streak_days, "{context}");
                assert!(receipt.streak_shield_consumed, "{context}");
            }
            DayRelation::Gap => assert_eq!(after.streak_days, 1, "{context}"),
        }

        // A shield is consumed at most once.
        if receipt.streak_shield_consumed {
            assert!(before.streak_shield_active, "{context}");
            assert!(!after.streak_shield_active, "{context}");
        }

        // Nothing is earned on a turn that started fainted.
        if before.is_fainted {
            assert_eq!(receipt.gold_earned, 0, "{context}");
            assert_eq!(receipt.xp_earned, 0, "{context}");
            let carried = if receipt.civil_day > before.last_quota_reset_date {
                0
            } else {
                before.daily_action_count
            };
            assert_eq!(after.daily_action_count, carried, "{context}");
        }

        // Revival happens exactly on the threshold-th fainted action.
        let expect_revival =
            before.is_fainted && before.faint_recovery_count + 1 >= config.faint_recovery_threshold;
        assert_eq!(receipt.revived_from_faint, expect_revival, "{context}");
        if receipt.revived_from_faint {
            assert_eq!(after.health_points, config.faint_revive_health, "{context}");
            assert!(!after.is_fainted, "{context}");
            assert_eq!(after.faint_recovery_count, 0, "{context}");
        } else if before.is_fainted {
            assert!(after.is_fainted, "{context}");
            assert_eq!(
                after.faint_recovery_count,
                before.faint_recovery_count + 1,
                "{context}"
            );
            assert_eq!(after.health_points, before.health_points, "{context}");
            assert_eq!(after.mood, Mood::Sick, "{context}");
        }

        assert!((0..=config.max_health).contains(&after.health_points), "{context}");
        assert_eq!(
            after.wallet_balance,
            before.wallet_balance + u64::from(receipt.gold_earned),
            "{context}"
        );
        assert_eq!(after.last_action_date, Some(receipt.civil_day), "{context}");

        state = transition.state;
    }
}

#[test]
fn default_power_curve_holds_invariants() {
    let engine = ProgressionEngine::new(ProgressionConfig::default()).unwrap();
    for seed in SEEDS {
        run_history(&engine, seed);
    }
}

#[test]
fn linear_curve_holds_invariants() {
    let config = ProgressionConfig {
        xp_curve: XpCurve::Linear {
            base: 40,
            per_level: 15,
        },
        ..ProgressionConfig::default()
    };
    let engine = ProgressionEngine::new(config).unwrap();
    for seed in SEEDS {
        run_history(&engine, seed);
    }
}

#[test]
fn table_curve_holds_invariants() {
    let config = ProgressionConfig {
        xp_curve: XpCurve::Table {
            thresholds: vec![30, 75, 140, 220],
            overflow_step: 90,
        },
        daily_limit: 3,
        ..ProgressionConfig::default()
    };
    let engine = ProgressionEngine::new(config).unwrap();
    for seed in SEEDS {
        run_history(&engine, seed);
    }
}

#[test]
fn injected_closure_curve_holds_invariants() {
    let engine =
        ProgressionEngine::with_curve(ProgressionConfig::default(), |level: u32| -> u32 {
            60 * level
        })
        .unwrap();
    for seed in SEEDS {
        run_history(&engine, seed);
    }
}

#[test]
fn shifted_calendar_holds_invariants() {
    let config = ProgressionConfig {
        utc_offset_minutes: 9 * 60 + 30,
        faint_recovery_threshold: 1,
        ..ProgressionConfig::default()
    };
    let engine = ProgressionEngine::new(config).unwrap();
    for seed in SEEDS {
        run_history(&engine, seed);
    }
}

#[test]
fn histories_are_deterministic() {
    let engine = ProgressionEngine::standard();
    let replay = |seed: u64| {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut state = PlayerState::new(start_day());
        let mut day = start_day();
        for step in 0..200 {
            day += Duration::days(rng.gen_range(0..2));
            let instant = Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap());
            let event = ActionEvent::new(ActionCategory::Tier2, instant, format!("r{step}"));
            state = engine.apply(&state, &event).unwrap().state;
        }
        state
    };
    assert_eq!(replay(42), replay(42));
}
