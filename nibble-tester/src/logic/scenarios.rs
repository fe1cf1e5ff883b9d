use anyhow::{Result, ensure};
use nibble_game::PlayerState;

use super::habits::PlayerHabit;
use super::simulation::{SimulationPlan, SimulationSummary};

/// Named simulation plan.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

struct CatalogEntry {
    key: &'static str,
    description: &'static str,
    build: fn() -> TestScenario,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        key: "smoke",
        description: "One week of daily cooking with no surprises",
        build: smoke,
    },
    CatalogEntry {
        key: "daily-streak",
        description: "Four weeks of daily meals; streak must never break",
        build: daily_streak,
    },
    CatalogEntry {
        key: "weekend-warrior",
        description: "Weekend-only cooking that slams into the daily cap",
        build: weekend_warrior,
    },
    CatalogEntry {
        key: "binge-cook",
        description: "Long sessions every third day; rewards stay capped",
        build: binge_cook,
    },
    CatalogEntry {
        key: "shield-saver",
        description: "Missed days bridged by rebought streak shields",
        build: shield_saver,
    },
    CatalogEntry {
        key: "faint-recovery",
        description: "Pet starts fainted and faints again from neglect",
        build: faint_recovery,
    },
    CatalogEntry {
        key: "sick-pet",
        description: "Pet starts sick; early rewards carry the sick penalty",
        build: sick_pet,
    },
    CatalogEntry {
        key: "sporadic",
        description: "Irregular cooking with occasional neglect",
        build: sporadic,
    },
];

/// Every scenario key with its one-line description.
#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG
        .iter()
        .map(|entry| (entry.key, entry.description))
        .collect()
}

/// Every scenario key, in catalog order.
#[must_use]
pub fn scenario_keys() -> Vec<&'static str> {
    CATALOG.iter().map(|entry| entry.key).collect()
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<TestScenario> {
    let key = key.trim().to_ascii_lowercase();
    CATALOG
        .iter()
        .find(|entry| entry.key == key)
        .map(|entry| (entry.build)())
}

fn no_violations(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.violations.is_empty(),
        "{} invariant breaches, first: {}",
        summary.violations.len(),
        summary.violations.first().map_or("", String::as_str)
    );
    Ok(())
}

fn rewards_within_quota(summary: &SimulationSummary) -> Result<()> {
    let ledger = &summary.metrics.ledger;
    let cap = summary.metrics.active_days * summary.metrics.daily_limit;
    ensure!(
        ledger.rewarded_actions <= cap,
        "{} rewarded actions over {} active days exceeds the daily cap",
        ledger.rewarded_actions,
        summary.metrics.active_days
    );
    Ok(())
}

fn smoke() -> TestScenario {
    TestScenario::simulation(
        "Smoke",
        SimulationPlan::new(PlayerHabit::Daily)
            .with_days(7)
            .with_expectation(no_violations)
            .with_expectation(|summary: &SimulationSummary| {
                ensure!(summary.metrics.ledger.gold > 0, "no gold earned in a week");
                ensure!(
                    summary.metrics.ledger.level_ups >= 1,
                    "a week of cooking should clear level 1"
                );
                Ok(())
            }),
    )
}

fn daily_streak() -> TestScenario {
    TestScenario::simulation(
        "Daily Streak",
        SimulationPlan::new(PlayerHabit::Daily)
            .with_expectation(no_violations)
            .with_expectation(|summary: &SimulationSummary| {
                let days = summary.metrics.days_simulated;
                ensure!(
                    summary.final_state.streak_days == days,
                    "streak {} after {days} daily days",
                    summary.final_state.streak_days
                );
                Ok(())
            }),
    )
}

fn weekend_warrior() -> TestScenario {
    TestScenario::simulation(
        "Weekend Warrior",
        SimulationPlan::new(PlayerHabit::WeekendWarrior)
            .with_expectation(no_violations)
            .with_expectation(rewards_within_quota)
            .with_expectation(|summary: &SimulationSummary| {
                ensure!(
                    summary.metrics.ledger.capped_actions > 0,
                    "weekend sessions never reached the cap"
                );
                ensure!(
                    summary.metrics.max_streak <= 2,
                    "weekend-only play built a {}-day streak",
                    summary.metrics.max_streak
                );
                Ok(())
            }),
    )
}

fn binge_cook() -> TestScenario {
    TestScenario::simulation(
        "Binge Cook",
        SimulationPlan::new(PlayerHabit::Binge)
            .with_expectation(no_violations)
            .with_expectation(rewards_within_quota)
            .with_expectation(|summary: &SimulationSummary| {
                let ledger = &summary.metrics.ledger;
                ensure!(
                    ledger.rewarded_actions
                        == summary.metrics.active_days * summary.metrics.daily_limit,
                    "binge days should each fill the cap exactly"
                );
                Ok(())
            }),
    )
}

fn shield_saver() -> TestScenario {
    TestScenario::simulation(
        "Shield Saver",
        SimulationPlan::new(PlayerHabit::ShieldSaver)
            .with_days(30)
            .with_expectation(no_violations)
            .with_expectation(|summary: &SimulationSummary| {
                ensure!(
                    summary.metrics.ledger.shields_consumed == 2,
                    "expected two bridged gaps, saw {}",
                    summary.metrics.ledger.shields_consumed
                );
                // A bridged day holds the streak without adding to it.
                ensure!(
                    summary.final_state.streak_days + summary.metrics.ledger.shields_consumed
                        == summary.metrics.active_days,
                    "shielded streak should count every unbridged cooking day"
                );
                Ok(())
            }),
    )
}

fn start_fainted(state: &mut PlayerState) {
    *state = state.clone().fainted();
}

fn faint_recovery() -> TestScenario {
    TestScenario::simulation(
        "Faint Recovery",
        SimulationPlan::new(PlayerHabit::Daily)
            .with_faint_chance(0.1)
            .with_setup(start_fainted)
            .with_expectation(no_violations)
            .with_expectation(|summary: &SimulationSummary| {
                ensure!(
                    summary.metrics.ledger.revivals >= 1,
                    "pet never revived"
                );
                Ok(())
            }),
    )
}

fn start_sick(state: &mut PlayerState) {
    state.health_points = 10;
}

fn sick_pet() -> TestScenario {
    TestScenario::simulation(
        "Sick Pet",
        SimulationPlan::new(PlayerHabit::Daily)
            .with_days(5)
            .with_setup(start_sick)
            .with_expectation(no_violations)
            .with_expectation(|summary: &SimulationSummary| {
                ensure!(
                    summary.metrics.sick_actions >= 1,
                    "sick penalty never applied"
                );
                ensure!(
                    summary.final_state.health_points > 10,
                    "health did not regenerate"
                );
                Ok(())
            }),
    )
}

fn sporadic() -> TestScenario {
    TestScenario::simulation(
        "Sporadic",
        SimulationPlan::new(PlayerHabit::Sporadic)
            .with_days(60)
            .with_faint_chance(0.05)
            .with_expectation(no_violations)
            .with_expectation(rewards_within_quota),
    )
}
