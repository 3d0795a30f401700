//! Novalia Game Engine
//!
//! Platform-agnostic core logic for Novalia, a turn-based economic policy
//! teaching game. This crate provides all game mechanics without UI or
//! platform-specific dependencies.

use rand::SeedableRng;

pub mod actions;
pub mod advisors;
pub mod events;
pub mod industry;
pub mod meters;
pub mod policy;
pub mod save;
pub mod scenario;
pub mod score;
pub mod state;
pub mod summary;

// Re-export commonly used types
pub use actions::{
    ActionKind, CfoActionKind, DiplomacyEffects, DiplomacyOption, ETF_SERIES_LEN, ETF_START_PRICE,
    builtin_diplomacy_options, generate_price_series,
};
pub use advisors::{AdvisorId, AdvisorMessage, commentary, main_advisor_for};
pub use events::{GameEvent, builtin_events, pick_event};
pub use industry::{
    ActiveIndustryProject, IndustryEffects, IndustryProject, IndustryType, builtin_industries,
    tick_projects,
};
pub use meters::{
    HiddenMeters, Meter, MeterEffects, MeterId, Meters, scenario_bonus,
};
pub use policy::{Policy, builtin_policies};
pub use save::{SAVE_VERSION, SaveError, SavedGameState, from_json, to_json};
pub use scenario::{
    FailCondition, FailDirection, Scenario, ScenarioId, ScenarioTheme, builtin_scenarios,
    danger_meters,
};
pub use score::{
    Ending, GameResultType, Rank, RunResult, calculate_score, ending_type, rank_from_score,
};
pub use state::{ContentData, GamePhase, GameState, TurnRecord};
pub use summary::{
    MeterChangeTotals, PlayerSummary, build_player_summary, summarize_turn,
};

/// Trait for abstracting save/load operations.
/// Platform-specific implementations should provide this; the engine
/// deals in the already-encoded save envelope.
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist an encoded save envelope under a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be written.
    fn write_save(&self, key: &str, raw: &str) -> Result<(), Self::Error>;

    /// Read back an encoded save envelope, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn read_save(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Delete a saved game.
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, key: &str) -> Result<(), Self::Error>;
}

/// Main game engine tying run state to a storage backend.
pub struct GameEngine<S>
where
    S: GameStorage,
{
    storage: S,
}

impl<S> GameEngine<S>
where
    S: GameStorage,
{
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Start a fresh seeded run in the given chapter.
    ///
    /// # Errors
    ///
    /// Returns an error if the chapter is not in the content registry.
    pub fn new_game(&self, scenario: ScenarioId, seed: u64) -> Result<GameState, anyhow::Error> {
        let mut state = GameState::with_seed(seed);
        if !state.start_scenario(scenario) {
            anyhow::bail!("unknown scenario {scenario}");
        }
        Ok(state)
    }

    /// Encode and persist a run. The timestamp comes from the caller so
    /// the core stays clock-free.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the storage write fails.
    pub fn save_game(
        &self,
        key: &str,
        state: &GameState,
        now_ms: u64,
    ) -> Result<(), anyhow::Error> {
        let raw = save::to_json(state, now_ms)?;
        self.storage.write_save(key, &raw)?;
        Ok(())
    }

    /// Load and reseed a saved run. A missing save and a save written by
    /// an unsupported version both come back as `None`; anything else
    /// wrong with the stored payload is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails or the payload is
    /// malformed.
    pub fn load_game(&self, key: &str, seed: u64) -> Result<Option<GameState>, anyhow::Error> {
        let Some(raw) = self.storage.read_save(key)? else {
            return Ok(None);
        };
        match save::from_json(&raw) {
            Ok(data) => {
                let mut state = data.hydrate();
                state.rng = Some(rand_chacha::ChaCha20Rng::seed_from_u64(seed));
                Ok(Some(state))
            }
            Err(SaveError::Version { found }) => {
                log::debug!("discarding save {key} with unsupported version {found}");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Delete a saved game.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage delete fails.
    pub fn delete_save(&self, key: &str) -> Result<(), anyhow::Error> {
        self.storage.delete_save(key)?;
        Ok(())
    }
}
