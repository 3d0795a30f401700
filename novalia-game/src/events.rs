//! Event table and weighted selection
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::collections::HashMap;

use crate::meters::MeterEffects;
use crate::scenario::{Scenario, ScenarioId};

fn default_weight() -> u32 {
    1
}

/// A world event drawn at the start of each turn. Effects, when present,
/// are applied automatically on draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<MeterEffects>,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub applicable_scenarios: SmallVec<[ScenarioId; 6]>,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub scenario_weights: HashMap<ScenarioId, u32>,
}

impl GameEvent {
    /// Base weight plus the per-scenario bonus. Base defaults to 1, so
    /// the total over any non-empty table is always positive.
    #[must_use]
    pub fn effective_weight(&self, scenario: Option<&Scenario>) -> u32 {
        let bonus = scenario
            .and_then(|s| self.scenario_weights.get(&s.id))
            .copied()
            .unwrap_or(0);
        self.weight.max(1) + bonus
    }
}

/// Weighted-random draw over the table. A uniform roll in
/// `[0, total_weight)` lands in one event's cumulative range; if
/// floating-point rounding overruns the scan, the last event wins.
pub fn pick_event<R: Rng>(
    events: &[GameEvent],
    scenario: Option<&Scenario>,
    rng: &mut R,
) -> Option<usize> {
    if events.is_empty() {
        return None;
    }

    let weights: Vec<f64> = events
        .iter()
        .map(|event| f64::from(event.effective_weight(scenario)))
        .collect();
    let total: f64 = weights.iter().sum();
    let roll = rng.random::<f64>() * total;

    let mut cumulative = 0.0;
    for (idx, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if roll < cumulative {
            return Some(idx);
        }
    }
    Some(events.len() - 1)
}

/// The builtin event table.
#[must_use]
pub fn builtin_events() -> Vec<GameEvent> {
    vec![
        GameEvent {
            id: "event-1".to_string(),
            title: "Bread prices triple overnight!".to_string(),
            description: "A spike in lightstone prices has sent the cost of everyday \
                          essentials soaring. Households are feeling the squeeze."
                .to_string(),
            effects: Some(MeterEffects {
                price: Some(20),
                life: Some(-15),
                ..MeterEffects::default()
            }),
            applicable_scenarios: smallvec![
                ScenarioId::Chapter2,
                ScenarioId::Chapter5,
                ScenarioId::Final
            ],
            weight: 2,
            scenario_weights: HashMap::from([
                (ScenarioId::Chapter2, 4),
                (ScenarioId::Chapter5, 3),
                (ScenarioId::Final, 2),
            ]),
        },
        GameEvent {
            id: "event-2".to_string(),
            title: "A major natural disaster strikes".to_string(),
            description: "An earthquake has hit Novalia. Infrastructure is badly damaged \
                          and reconstruction will be expensive."
                .to_string(),
            effects: Some(MeterEffects {
                treasury: Some(-50),
                life: Some(-20),
                unemployment: Some(5),
                ..MeterEffects::default()
            }),
            applicable_scenarios: smallvec![ScenarioId::Chapter4, ScenarioId::Final],
            weight: 1,
            scenario_weights: HashMap::from([
                (ScenarioId::Chapter4, 4),
                (ScenarioId::Final, 2),
            ]),
        },
        GameEvent {
            id: "event-3".to_string(),
            title: "A lightstone breakthrough!".to_string(),
            description: "Researchers found a far more efficient way to use lightstone. \
                          The economy is expected to pick up."
                .to_string(),
            effects: Some(MeterEffects {
                treasury: Some(30),
                life: Some(10),
                unemployment: Some(-3),
                ..MeterEffects::default()
            }),
            applicable_scenarios: SmallVec::new(),
            weight: 3,
            scenario_weights: HashMap::new(),
        },
        GameEvent {
            id: "event-4".to_string(),
            title: "A wave of corporate bankruptcies".to_string(),
            description: "The downturn has taken several large employers with it. \
                          Jobless numbers are climbing fast."
                .to_string(),
            effects: Some(MeterEffects {
                unemployment: Some(15),
                treasury: Some(-20),
                ..MeterEffects::default()
            }),
            applicable_scenarios: smallvec![ScenarioId::Chapter3, ScenarioId::Final],
            weight: 2,
            scenario_weights: HashMap::from([
                (ScenarioId::Chapter3, 4),
                (ScenarioId::Final, 2),
            ]),
        },
        GameEvent {
            id: "event-5".to_string(),
            title: "A resource shock hits".to_string(),
            description: "Relations with a neighbour soured and lightstone imports were \
                          restricted. Prices are surging."
                .to_string(),
            effects: Some(MeterEffects {
                price: Some(25),
                treasury: Some(-15),
                ..MeterEffects::default()
            }),
            applicable_scenarios: smallvec![ScenarioId::Chapter5, ScenarioId::Final],
            weight: 2,
            scenario_weights: HashMap::from([
                (ScenarioId::Chapter5, 4),
                (ScenarioId::Final, 2),
            ]),
        },
    ]
}
