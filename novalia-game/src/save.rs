//! Versioned save codec.
//!
//! A save is a flat JSON document with camelCase keys, carrying the run
//! at a turn boundary: phase, scenario id, turn, meters, history, active
//! projects and the hidden-meter fields, under a version tag. The
//! version gate is deliberately strict: an unknown version is reported,
//! not migrated, and callers treat it as "no usable save". Fields added
//! since an old save was written fall back to their defaults on load.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::industry::ActiveIndustryProject;
use crate::meters::{HiddenMeters, Meters};
use crate::scenario::ScenarioId;
use crate::state::{ContentData, GamePhase, GameState, TurnRecord};

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("unsupported save version {found}, expected {SAVE_VERSION}")]
    Version { found: u32 },
    #[error("malformed save data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The persisted document. Scenario identity is stored by id and looked
/// up in the content registry on load; the hidden meters are flattened
/// into top-level fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedGameState {
    pub version: u32,
    pub timestamp: u64,
    pub phase: GamePhase,
    pub current_scenario_id: Option<ScenarioId>,
    pub turn: u32,
    pub meters: Meters,
    pub history: Vec<TurnRecord>,
    pub active_industry_projects: Vec<ActiveIndustryProject>,
    pub etf_holding: i32,
    pub support: i32,
    pub credit: i32,
    pub rigidity: i32,
    pub inflation_risk: i32,
    pub productivity: i32,
    pub future_cost: i32,
    pub debt_level: i32,
    pub reserve_used: bool,
}

impl Default for SavedGameState {
    fn default() -> Self {
        let hidden = HiddenMeters::default();
        Self {
            // A save missing its version tag fails the gate.
            version: 0,
            timestamp: 0,
            phase: GamePhase::Title,
            current_scenario_id: None,
            turn: 1,
            meters: Meters::default(),
            history: Vec::new(),
            active_industry_projects: Vec::new(),
            etf_holding: 0,
            support: hidden.support,
            credit: hidden.credit,
            rigidity: hidden.rigidity,
            inflation_risk: hidden.inflation_risk,
            productivity: hidden.productivity,
            future_cost: hidden.future_cost,
            debt_level: 0,
            reserve_used: false,
        }
    }
}

impl SavedGameState {
    /// Snapshot a run. The timestamp comes from the caller so the core
    /// stays clock-free.
    #[must_use]
    pub fn from_state(state: &GameState, timestamp: u64) -> Self {
        Self {
            version: SAVE_VERSION,
            timestamp,
            phase: state.phase,
            current_scenario_id: state.current_scenario.as_ref().map(|s| s.id),
            turn: state.turn,
            meters: state.meters.clone(),
            history: state.history.clone(),
            active_industry_projects: state.active_projects.clone(),
            etf_holding: state.etf_holding,
            support: state.hidden.support,
            credit: state.hidden.credit,
            rigidity: state.hidden.rigidity,
            inflation_risk: state.hidden.inflation_risk,
            productivity: state.hidden.productivity,
            future_cost: state.hidden.future_cost,
            debt_level: state.debt_level,
            reserve_used: state.reserve_used,
        }
    }

    /// Rebuild a playable run at the saved turn boundary. The scenario
    /// comes back from the builtin registry by id; transient turn state
    /// (current event, pending action, logs) starts fresh, and the
    /// caller reseeds the RNG.
    #[must_use]
    pub fn hydrate(self) -> GameState {
        let data = ContentData::default();
        let current_scenario = self
            .current_scenario_id
            .and_then(|id| data.scenarios.iter().find(|s| s.id == id).cloned());
        GameState {
            phase: self.phase,
            current_scenario,
            meters: self.meters,
            hidden: HiddenMeters {
                support: self.support,
                credit: self.credit,
                rigidity: self.rigidity,
                inflation_risk: self.inflation_risk,
                productivity: self.productivity,
                future_cost: self.future_cost,
            },
            turn: self.turn,
            history: self.history,
            active_projects: self.active_industry_projects,
            etf_holding: self.etf_holding,
            debt_level: self.debt_level,
            reserve_used: self.reserve_used,
            data,
            ..GameState::default()
        }
    }
}

/// Serialize a run state into the save document.
pub fn to_json(state: &GameState, timestamp: u64) -> Result<String, SaveError> {
    Ok(serde_json::to_string(&SavedGameState::from_state(
        state, timestamp,
    ))?)
}

/// Parse and version-check a save document.
pub fn from_json(raw: &str) -> Result<SavedGameState, SaveError> {
    let data: SavedGameState = serde_json::from_str(raw)?;
    if data.version != SAVE_VERSION {
        return Err(SaveError::Version {
            found: data.version,
        });
    }
    Ok(data)
}
