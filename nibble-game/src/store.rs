//! Persistence seam and the thin service shell around the engine.
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

use crate::engine::{ProgressionEngine, ProgressionError, Transition};
use crate::ledger::LedgerEntry;
use crate::leveling::{LevelCurve, XpCurve};
use crate::state::{ActionEvent, PlayerState, SourceRef};

/// Opaque player identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage for player snapshots and their ledgers.
/// Platform-specific implementations should provide this.
pub trait PlayerStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the current snapshot for a player.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read.
    fn load_player(&self, player: &PlayerId) -> Result<Option<PlayerState>, Self::Error>;

    /// Persist the successor snapshot and its ledger row together. Either
    /// both land or neither does.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn commit_transition(
        &self,
        player: &PlayerId,
        state: &PlayerState,
        entry: &LedgerEntry,
    ) -> Result<(), Self::Error>;

    /// Whether the player's ledger already holds a row for `source_ref`.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    fn contains_action(&self, player: &PlayerId, source_ref: &SourceRef)
    -> Result<bool, Self::Error>;
}

#[derive(Debug, Error)]
pub enum ServiceError<E>
where
    E: std::error::Error + 'static,
{
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("action {0} was already recorded")]
    DuplicateAction(SourceRef),
    #[error(transparent)]
    Progression(#[from] ProgressionError),
    #[error("player store failed: {0}")]
    Store(#[source] E),
}

/// Load, apply, commit. Callers serialize calls per player; the service
/// adds no locking of its own.
#[derive(Debug, Clone)]
pub struct ProgressionService<S, C = XpCurve> {
    engine: ProgressionEngine<C>,
    store: S,
    reject_duplicates: bool,
}

impl<S, C> ProgressionService<S, C>
where
    S: PlayerStore,
    C: LevelCurve,
{
    pub const fn new(engine: ProgressionEngine<C>, store: S) -> Self {
        Self {
            engine,
            store,
            reject_duplicates: false,
        }
    }

    /// Refuse events whose `source_ref` is already in the player's ledger.
    #[must_use]
    pub const fn with_duplicate_check(mut self, enabled: bool) -> Self {
        self.reject_duplicates = enabled;
        self
    }

    pub const fn engine(&self) -> &ProgressionEngine<C> {
        &self.engine
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Apply one action for `player` and commit the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the player is unknown, the action is a rejected
    /// duplicate, the engine refuses the input, or the store fails. Nothing
    /// is written in any of those cases.
    pub fn record_action(
        &self,
        player: &PlayerId,
        event: &ActionEvent,
    ) -> Result<Transition, ServiceError<S::Error>> {
        let state = self
            .store
            .load_player(player)
            .map_err(ServiceError::Store)?
            .ok_or_else(|| ServiceError::UnknownPlayer(player.clone()))?;

        if self.reject_duplicates
            && self
                .store
                .contains_action(player, &event.source_ref)
                .map_err(ServiceError::Store)?
        {
            log::warn!("player {player}: duplicate action {}", event.source_ref);
            return Err(ServiceError::DuplicateAction(event.source_ref.clone()));
        }

        let transition = self.engine.apply(&state, event)?;
        let entry = transition.ledger_entry(event);
        self.store
            .commit_transition(player, &transition.state, &entry)
            .map_err(ServiceError::Store)?;
        Ok(transition)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PlayerRecord {
    state: PlayerState,
    ledger: Vec<LedgerEntry>,
}

/// In-process store for tests and the scenario tester. Clones share the
/// same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    players: Rc<RefCell<HashMap<PlayerId, PlayerRecord>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player with an initial snapshot and an empty ledger,
    /// replacing any existing record.
    pub fn insert_player(&self, player: PlayerId, state: PlayerState) {
        self.players.borrow_mut().insert(
            player,
            PlayerRecord {
                state,
                ledger: Vec::new(),
            },
        );
    }

    /// Edit a snapshot outside the engine (shop purchases, neglect decay).
    /// Returns `false` when the player is unknown.
    pub fn update_player(&self, player: &PlayerId, edit: impl FnOnce(&mut PlayerState)) -> bool {
        self.players
            .borrow_mut()
            .get_mut(player)
            .map(|record| edit(&mut record.state))
            .is_some()
    }

    #[must_use]
    pub fn ledger(&self, player: &PlayerId) -> Vec<LedgerEntry> {
        self.players
            .borrow()
            .get(player)
            .map(|record| record.ledger.clone())
            .unwrap_or_default()
    }
}

impl PlayerStore for MemoryStore {
    type Error = Infallible;

    fn load_player(&self, player: &PlayerId) -> Result<Option<PlayerState>, Self::Error> {
        Ok(self
            .players
            .borrow()
            .get(player)
            .map(|record| record.state.clone()))
    }

    fn commit_transition(
        &self,
        player: &PlayerId,
        state: &PlayerState,
        entry: &LedgerEntry,
    ) -> Result<(), Self::Error> {
        let mut players = self.players.borrow_mut();
        let record = players
            .entry(player.clone())
            .or_insert_with(|| PlayerRecord {
                state: state.clone(),
                ledger: Vec::new(),
            });
        record.state = state.clone();
        record.ledger.push(entry.clone());
        Ok(())
    }

    fn contains_action(
        &self,
        player: &PlayerId,
        source_ref: &SourceRef,
    ) -> Result<bool, Self::Error> {
        Ok(self.players.borrow().get(player).is_some_and(|record| {
            record
                .ledger
                .iter()
                .any(|entry| &entry.source_ref == source_ref)
        }))
    }
}
