use anyhow::{Context, Result, bail};
use chrono::{Duration, NaiveDate, NaiveTime};
use colored::Colorize;
use nibble_game::{
    ActionEvent, CivilCalendar, DayRelation, LedgerSummary, LevelCurve, MemoryStore, PlayerId,
    PlayerState, PlayerStore, ProgressionEngine, ProgressionService, Transition,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use std::sync::Arc;

use super::habits::PlayerHabit;

pub const DEFAULT_SIM_DAYS: u32 = 28;
const FIRST_MEAL_HOUR: u32 = 7;

/// Every run starts on a Monday so weekday habits line up.
fn sim_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 5).unwrap_or_default()
}

/// Declarative plan for one simulated player history.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub habit: PlayerHabit,
    pub days: u32,
    /// Chance per day that neglect knocks the pet out before the first meal.
    pub faint_chance: f64,
    pub setup: Option<fn(&mut PlayerState)>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(habit: PlayerHabit) -> Self {
        Self {
            habit,
            days: DEFAULT_SIM_DAYS,
            faint_chance: 0.0,
            setup: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    #[must_use]
    pub const fn with_faint_chance(mut self, chance: f64) -> Self {
        self.faint_chance = chance;
        self
    }

    #[must_use]
    pub fn with_setup(mut self, setup: fn(&mut PlayerState)) -> Self {
        self.setup = Some(setup);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationMetrics {
    pub days_simulated: u32,
    pub daily_limit: u32,
    pub active_days: u32,
    pub max_streak: u32,
    pub faints: u32,
    pub shields_bought: u32,
    /// Actions taken while the sick penalty applied.
    pub sick_actions: u32,
    pub ledger: LedgerSummary,
}

/// Complete record of a simulated history.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub habit: PlayerHabit,
    pub final_state: PlayerState,
    pub metrics: SimulationMetrics,
    /// Invariant breaches seen along the way. Empty on a healthy engine.
    pub violations: Vec<String>,
}

/// Headless deterministic driver for the progression service.
#[derive(Debug, Clone)]
pub struct Simulator {
    engine: ProgressionEngine,
    verbose: bool,
}

impl Simulator {
    #[must_use]
    pub const fn new(engine: ProgressionEngine, verbose: bool) -> Self {
        Self { engine, verbose }
    }

    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let player = PlayerId::new(format!("sim-{seed}"));
        let store = MemoryStore::new();
        let mut initial = PlayerState::new(sim_start());
        if let Some(setup) = plan.setup {
            setup(&mut initial);
        }
        store.insert_player(player.clone(), initial);

        let service = ProgressionService::new(self.engine.clone(), store.clone());
        let calendar = *self.engine.calendar();
        let sick_threshold = self.engine.config().sick_threshold;
        let faint_chance = plan.faint_chance.clamp(0.0, 1.0);
        let mut metrics = SimulationMetrics {
            days_simulated: plan.days,
            daily_limit: self.engine.config().daily_limit,
            ..SimulationMetrics::default()
        };
        let mut violations = Vec::new();

        for day_index in 0..plan.days {
            let date = sim_start() + Duration::days(i64::from(day_index));

            if faint_chance > 0.0 && rng.gen_bool(faint_chance) {
                let mut knocked_out = false;
                store.update_player(&player, |state| {
                    if !state.is_fainted {
                        *state = state.clone().fainted();
                        knocked_out = true;
                    }
                });
                metrics.faints += u32::from(knocked_out);
            }

            if plan.habit.buys_shields() {
                let mut bought = false;
                store.update_player(&player, |state| {
                    if !state.streak_shield_active {
                        state.streak_shield_active = true;
                        bought = true;
                    }
                });
                metrics.shields_bought += u32::from(bought);
            }

            let actions = plan.habit.actions_on(day_index, date, &mut rng);
            if actions > 0 {
                metrics.active_days += 1;
            }

            for meal in 0..actions {
                let hour = (FIRST_MEAL_HOUR + meal * 2).min(23);
                let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default();
                let occurred_at = calendar
                    .instant_at(date, time)
                    .with_context(|| format!("{date} {time} has no UTC instant"))?;
                let event = ActionEvent::new(
                    plan.habit.pick_category(&mut rng),
                    occurred_at,
                    format!("{player}-d{day_index}-m{meal}"),
                );

                let Ok(Some(before)) = service.store().load_player(&player) else {
                    bail!("simulated player {player} vanished from the store");
                };
                if !before.is_fainted
                    && before.health_points > 0
                    && before.health_points <= sick_threshold
                {
                    metrics.sick_actions += 1;
                }

                let transition = service
                    .record_action(&player, &event)
                    .with_context(|| format!("applying {}", event.source_ref))?;
                violations.extend(check_transition(&self.engine, &before, &transition));
                metrics.max_streak = metrics.max_streak.max(transition.state.streak_days);

                if self.verbose {
                    log_action(day_index, &event, &transition);
                }
            }
        }

        metrics.ledger = LedgerSummary::from_entries(&store.ledger(&player));
        let Ok(Some(final_state)) = service.store().load_player(&player) else {
            bail!("simulated player {player} vanished from the store");
        };

        Ok(SimulationSummary {
            seed,
            habit: plan.habit,
            final_state,
            metrics,
            violations,
        })
    }
}

fn log_action(day_index: u32, event: &ActionEvent, transition: &Transition) {
    let receipt = &transition.receipt;
    let line = format!(
        "     day {day_index:>3} {:<6} +{}g +{}xp lvl {} hp {} streak {} [{}]",
        event.category,
        receipt.gold_earned,
        receipt.xp_earned,
        receipt.new_level,
        receipt.new_health,
        receipt.streak_days,
        receipt.message.key()
    );
    if receipt.granted_rewards() {
        println!("{}", line.green());
    } else {
        println!("{}", line.dimmed());
    }
}

/// Check one transition against the progression invariants. Returns a
/// description of every breach.
pub fn check_transition<C: LevelCurve>(
    engine: &ProgressionEngine<C>,
    before: &PlayerState,
    transition: &Transition,
) -> Vec<String> {
    let config = engine.config();
    let receipt = &transition.receipt;
    let after = &transition.state;
    let mut breaches = Vec::new();
    let mut expect = |ok: bool, what: &str| {
        if !ok {
            breaches.push(format!("{} on {}: {what}", receipt.message.key(), receipt.civil_day));
        }
    };

    expect(
        after.current_xp < engine.max_xp(after.level),
        "xp at or above level threshold",
    );
    expect(
        after.level == before.level || (receipt.leveled_up && after.level == before.level + 1),
        "level moved by more than one",
    );
    expect(
        !receipt.leveled_up || after.current_xp == 0,
        "overflow xp carried past a level-up",
    );
    expect(
        after.daily_action_count <= config.daily_limit,
        "daily count above the cap",
    );

    let relation = CivilCalendar::classify(before.last_action_date, receipt.civil_day);
    let expected_streak = match relation {
        DayRelation::First => 1,
        DayRelation::SameDay => before.streak_days,
        DayRelation::Consecutive => before.streak_days + 1,
        DayRelation::Gap if before.streak_shield_active => before.streak_days,
        DayRelation::Gap => 1,
    };
    expect(after.streak_days == expected_streak, "streak off the day relation");
    expect(
        !receipt.streak_shield_consumed
            || (before.streak_shield_active && !after.streak_shield_active),
        "shield consumed without being armed",
    );

    if before.is_fainted {
        expect(
            !receipt.granted_rewards(),
            "rewards granted on a fainted turn",
        );
        let revives = before.faint_recovery_count + 1 >= config.faint_recovery_threshold;
        expect(receipt.revived_from_faint == revives, "revival off threshold");
        if revives {
            expect(
                after.health_points == config.faint_revive_health && !after.is_fainted,
                "revival left wrong health",
            );
        }
    } else {
        expect(!receipt.revived_from_faint, "revived a conscious pet");
    }

    expect(
        (0..=config.max_health).contains(&after.health_points),
        "health out of range",
    );
    breaches
}
