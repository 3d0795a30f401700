//! Policy card definitions
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::meters::{MeterEffects, MeterId};
use crate::scenario::ScenarioId;

/// A policy the player commits to once per turn. Selecting one is the
/// primary driver of a turn record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub name: String,
    pub description: String,
    pub target_meters: SmallVec<[MeterId; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<MeterEffects>,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub applicable_scenarios: SmallVec<[ScenarioId; 6]>,
}

/// The builtin policy deck.
#[must_use]
pub fn builtin_policies() -> Vec<Policy> {
    vec![
        Policy {
            id: "policy-1".to_string(),
            name: "Tax cut".to_string(),
            description: "Lower income and consumption taxes to leave households with \
                          more to spend."
                .to_string(),
            target_meters: smallvec![MeterId::Price, MeterId::Treasury, MeterId::Life],
            effects: Some(MeterEffects {
                price: Some(-5),
                treasury: Some(-30),
                life: Some(8),
                ..MeterEffects::default()
            }),
            applicable_scenarios: smallvec![ScenarioId::Chapter2, ScenarioId::Final],
        },
        Policy {
            id: "policy-2".to_string(),
            name: "Expand public works".to_string(),
            description: "Build roads and bridges to create jobs through infrastructure \
                          spending."
                .to_string(),
            target_meters: smallvec![MeterId::Unemployment, MeterId::Treasury, MeterId::Life],
            effects: Some(MeterEffects {
                unemployment: Some(-8),
                treasury: Some(-40),
                life: Some(5),
                ..MeterEffects::default()
            }),
            applicable_scenarios: smallvec![ScenarioId::Chapter3, ScenarioId::Final],
        },
        Policy {
            id: "policy-3".to_string(),
            name: "Raise interest rates".to_string(),
            description: "Have the central bank raise its interest rate to rein in \
                          inflation."
                .to_string(),
            target_meters: smallvec![MeterId::Price, MeterId::Unemployment],
            effects: Some(MeterEffects {
                price: Some(-10),
                unemployment: Some(5),
                ..MeterEffects::default()
            }),
            applicable_scenarios: smallvec![
                ScenarioId::Chapter2,
                ScenarioId::Chapter5,
                ScenarioId::Final
            ],
        },
        Policy {
            id: "policy-4".to_string(),
            name: "Tax increase".to_string(),
            description: "Raise income and consumption taxes to repair the fiscal \
                          balance."
                .to_string(),
            target_meters: smallvec![MeterId::Treasury, MeterId::Life],
            effects: Some(MeterEffects {
                treasury: Some(40),
                life: Some(-8),
                ..MeterEffects::default()
            }),
            applicable_scenarios: smallvec![ScenarioId::Chapter4, ScenarioId::Final],
        },
        Policy {
            id: "policy-5".to_string(),
            name: "Trade talks".to_string(),
            description: "Negotiate with neighbouring states to stabilise lightstone \
                          import prices."
                .to_string(),
            target_meters: smallvec![MeterId::Price, MeterId::Treasury],
            effects: Some(MeterEffects {
                price: Some(-8),
                treasury: Some(-10),
                ..MeterEffects::default()
            }),
            applicable_scenarios: smallvec![ScenarioId::Chapter5, ScenarioId::Final],
        },
    ]
}
