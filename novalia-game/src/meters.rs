//! Meter model and effect resolution
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::scenario::ScenarioTheme;

pub const INITIAL_PRICE: i32 = 40;
pub const INITIAL_UNEMPLOYMENT: i32 = 25;
pub const INITIAL_LIFE: i32 = 50;
pub const INITIAL_TREASURY: i32 = 400;
pub const TREASURY_MIN: i32 = -100;
pub const TREASURY_MAX: i32 = 200;

const HIDDEN_METER_MAX: i32 = 100;
const SCENARIO_BONUS_STEP: i32 = 1;

/// The four tracked national indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeterId {
    Price,
    Unemployment,
    Life,
    Treasury,
}

impl MeterId {
    pub const ALL: [MeterId; 4] = [
        MeterId::Price,
        MeterId::Unemployment,
        MeterId::Life,
        MeterId::Treasury,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Unemployment => "unemployment",
            Self::Life => "life",
            Self::Treasury => "treasury",
        }
    }
}

impl fmt::Display for MeterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeterId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price" => Ok(Self::Price),
            "unemployment" => Ok(Self::Unemployment),
            "life" => Ok(Self::Life),
            "treasury" => Ok(Self::Treasury),
            _ => Err(()),
        }
    }
}

/// A single bounded indicator. `min <= value <= max` holds after every
/// mutation; the initial treasury (400) sits above its cap on purpose and
/// is pulled into range the first time it is touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meter {
    pub id: MeterId,
    pub label: String,
    pub value: i32,
    pub min: i32,
    pub max: i32,
    pub description: String,
}

impl Meter {
    fn new(id: MeterId, label: &str, value: i32, min: i32, max: i32, description: &str) -> Self {
        Self {
            id,
            label: label.to_string(),
            value,
            min,
            max,
            description: description.to_string(),
        }
    }

    /// Add a delta and clamp into `[min, max]`.
    pub fn apply_delta(&mut self, delta: i32) {
        self.value = (self.value + delta).clamp(self.min, self.max);
    }

    /// Set an absolute value, clamped into `[min, max]`.
    pub fn set_clamped(&mut self, value: i32) {
        self.value = value.clamp(self.min, self.max);
    }
}

/// Signed deltas per meter. A missing field means "leave that meter
/// untouched" — distinct from an explicit zero, which still counts as a
/// mutation and therefore clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MeterEffects {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unemployment: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treasury: Option<i32>,
}

impl MeterEffects {
    #[must_use]
    pub const fn get(&self, id: MeterId) -> Option<i32> {
        match id {
            MeterId::Price => self.price,
            MeterId::Unemployment => self.unemployment,
            MeterId::Life => self.life,
            MeterId::Treasury => self.treasury,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.price.is_none()
            && self.unemployment.is_none()
            && self.life.is_none()
            && self.treasury.is_none()
    }
}

/// Theme correction for a single delta. Only meters with a present delta
/// receive the bonus, and only in the direction the theme amplifies.
#[must_use]
pub const fn scenario_bonus(id: MeterId, delta: i32, theme: ScenarioTheme) -> i32 {
    match (theme, id) {
        (ScenarioTheme::Inflation | ScenarioTheme::Diplomacy, MeterId::Price) if delta > 0 => {
            SCENARIO_BONUS_STEP
        }
        (ScenarioTheme::Unemployment, MeterId::Unemployment) if delta < 0 => -SCENARIO_BONUS_STEP,
        (ScenarioTheme::Fiscal, MeterId::Treasury) if delta > 0 => SCENARIO_BONUS_STEP,
        _ => 0,
    }
}

/// The four primary meters of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters {
    meters: [Meter; 4],
}

impl Default for Meters {
    fn default() -> Self {
        Self {
            meters: [
                Meter::new(
                    MeterId::Price,
                    "Price level",
                    INITIAL_PRICE,
                    0,
                    100,
                    "Price level of everyday essentials",
                ),
                Meter::new(
                    MeterId::Unemployment,
                    "Unemployment",
                    INITIAL_UNEMPLOYMENT,
                    0,
                    100,
                    "Share of the workforce without a job",
                ),
                Meter::new(
                    MeterId::Life,
                    "Quality of life",
                    INITIAL_LIFE,
                    0,
                    100,
                    "How comfortable daily life feels",
                ),
                Meter::new(
                    MeterId::Treasury,
                    "Treasury",
                    INITIAL_TREASURY,
                    TREASURY_MIN,
                    TREASURY_MAX,
                    "State of the national finances",
                ),
            ],
        }
    }
}

impl Meters {
    // Array order matches the MeterId declaration order.
    #[must_use]
    pub fn get(&self, id: MeterId) -> &Meter {
        &self.meters[id as usize]
    }

    pub fn get_mut(&mut self, id: MeterId) -> &mut Meter {
        &mut self.meters[id as usize]
    }

    #[must_use]
    pub fn value(&self, id: MeterId) -> i32 {
        self.get(id).value
    }

    pub fn iter(&self) -> impl Iterator<Item = &Meter> {
        self.meters.iter()
    }

    /// Apply signed deltas with clamping. When `theme` is set, the
    /// scenario correction is added to each present delta first.
    pub fn apply(&mut self, effects: &MeterEffects, theme: Option<ScenarioTheme>) {
        for id in MeterId::ALL {
            let Some(delta) = effects.get(id) else {
                continue;
            };
            let adjusted = match theme {
                Some(theme) => delta + scenario_bonus(id, delta, theme),
                None => delta,
            };
            self.get_mut(id).apply_delta(adjusted);
        }
    }
}

/// Secondary state not shown on the main dashboard. Everything is held in
/// `[0, 100]` except `future_cost`, an accumulator with only a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenMeters {
    pub support: i32,
    pub credit: i32,
    pub rigidity: i32,
    pub inflation_risk: i32,
    pub productivity: i32,
    pub future_cost: i32,
}

impl Default for HiddenMeters {
    fn default() -> Self {
        Self {
            support: 50,
            credit: 50,
            rigidity: 0,
            inflation_risk: 0,
            productivity: 50,
            future_cost: 0,
        }
    }
}

impl HiddenMeters {
    pub fn clamp(&mut self) {
        self.support = self.support.clamp(0, HIDDEN_METER_MAX);
        self.credit = self.credit.clamp(0, HIDDEN_METER_MAX);
        self.rigidity = self.rigidity.clamp(0, HIDDEN_METER_MAX);
        self.inflation_risk = self.inflation_risk.clamp(0, HIDDEN_METER_MAX);
        self.productivity = self.productivity.clamp(0, HIDDEN_METER_MAX);
        self.future_cost = self.future_cost.max(0);
    }
}
