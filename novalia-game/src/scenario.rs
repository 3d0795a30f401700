//! Scenario (chapter) definitions and termination predicates
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::fmt;
use std::str::FromStr;

use crate::meters::{MeterId, Meters};

const DANGER_PRICE_ABOVE: i32 = 80;
const DANGER_UNEMPLOYMENT_ABOVE: i32 = 80;
const DANGER_TREASURY_BELOW: i32 = 50;
const DANGER_LIFE_BELOW: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioId {
    Chapter1,
    Chapter2,
    Chapter3,
    Chapter4,
    Chapter5,
    Final,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 6] = [
        ScenarioId::Chapter1,
        ScenarioId::Chapter2,
        ScenarioId::Chapter3,
        ScenarioId::Chapter4,
        ScenarioId::Chapter5,
        ScenarioId::Final,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chapter1 => "chapter1",
            Self::Chapter2 => "chapter2",
            Self::Chapter3 => "chapter3",
            Self::Chapter4 => "chapter4",
            Self::Chapter5 => "chapter5",
            Self::Final => "final",
        }
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chapter1" => Ok(Self::Chapter1),
            "chapter2" => Ok(Self::Chapter2),
            "chapter3" => Ok(Self::Chapter3),
            "chapter4" => Ok(Self::Chapter4),
            "chapter5" => Ok(Self::Chapter5),
            "final" => Ok(Self::Final),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioTheme {
    Inflation,
    Unemployment,
    Fiscal,
    Diplomacy,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailDirection {
    Below,
    Above,
}

/// Single-meter threshold breach that ends a chapter in failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailCondition {
    pub meter: MeterId,
    pub threshold: i32,
    pub direction: FailDirection,
    pub message: String,
}

impl FailCondition {
    #[must_use]
    pub fn breached(&self, meters: &Meters) -> bool {
        let value = meters.value(self.meter);
        match self.direction {
            FailDirection::Below => value < self.threshold,
            FailDirection::Above => value > self.threshold,
        }
    }
}

/// Immutable chapter definition, selected at run start and read-only for
/// the run's duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,
    pub title: String,
    pub description: String,
    pub max_turns: u32,
    pub theme: ScenarioTheme,
    pub focus_meters: SmallVec<[MeterId; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_condition: Option<FailCondition>,
}

/// Meters currently inside their danger band. Two or more at once fail
/// the final chapter.
#[must_use]
pub fn danger_meters(meters: &Meters) -> Vec<MeterId> {
    let mut out = Vec::new();
    if meters.value(MeterId::Price) > DANGER_PRICE_ABOVE {
        out.push(MeterId::Price);
    }
    if meters.value(MeterId::Unemployment) > DANGER_UNEMPLOYMENT_ABOVE {
        out.push(MeterId::Unemployment);
    }
    if meters.value(MeterId::Treasury) < DANGER_TREASURY_BELOW {
        out.push(MeterId::Treasury);
    }
    if meters.value(MeterId::Life) < DANGER_LIFE_BELOW {
        out.push(MeterId::Life);
    }
    out
}

/// The six builtin chapters.
#[must_use]
pub fn builtin_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            id: ScenarioId::Chapter1,
            title: "Chapter 1: A Nation in Crisis".to_string(),
            description: "Prices, joblessness and the treasury are all slipping. \
                          An introductory scenario to steady Novalia."
                .to_string(),
            max_turns: 8,
            theme: ScenarioTheme::Mixed,
            focus_meters: smallvec![MeterId::Treasury, MeterId::Life],
            fail_condition: Some(FailCondition {
                meter: MeterId::Treasury,
                threshold: 0,
                direction: FailDirection::Below,
                message: "The treasury ran dry. Novalia has defaulted on its obligations."
                    .to_string(),
            }),
        },
        Scenario {
            id: ScenarioId::Chapter2,
            title: "Chapter 2: Prices Out of Control".to_string(),
            description: "Contain worsening inflation without crushing everyday life. \
                          An introduction to inflation."
                .to_string(),
            max_turns: 10,
            theme: ScenarioTheme::Inflation,
            focus_meters: smallvec![MeterId::Price, MeterId::Life],
            fail_condition: Some(FailCondition {
                meter: MeterId::Price,
                threshold: 90,
                direction: FailDirection::Above,
                message: "Hyperinflation destroyed trust in the currency. Novalia's economy \
                          has collapsed."
                    .to_string(),
            }),
        },
        Scenario {
            id: ScenarioId::Chapter3,
            title: "Chapter 3: The Jobs Drain Away".to_string(),
            description: "Face rising unemployment and a shrinking economy, and learn why \
                          employment policy matters."
                .to_string(),
            max_turns: 9,
            theme: ScenarioTheme::Unemployment,
            focus_meters: smallvec![MeterId::Unemployment, MeterId::Treasury],
            fail_condition: Some(FailCondition {
                meter: MeterId::Unemployment,
                threshold: 90,
                direction: FailDirection::Above,
                message: "Unemployment hit its ceiling. Unrest spread and Novalia descended \
                          into chaos."
                    .to_string(),
            }),
        },
        Scenario {
            id: ScenarioId::Chapter4,
            title: "Chapter 4: The Debt Piles Up".to_string(),
            description: "Stop the fiscal bleeding and balance austerity against taxation. \
                          A lesson in fiscal consolidation."
                .to_string(),
            max_turns: 10,
            theme: ScenarioTheme::Fiscal,
            focus_meters: smallvec![MeterId::Treasury, MeterId::Life],
            fail_condition: Some(FailCondition {
                meter: MeterId::Treasury,
                threshold: -50,
                direction: FailDirection::Below,
                message: "The debt burden passed the point of no return. Novalia has gone \
                          bankrupt."
                    .to_string(),
            }),
        },
        Scenario {
            id: ScenarioId::Chapter5,
            title: "Chapter 5: Trouble Abroad".to_string(),
            description: "Ride out a resource shock and swinging world prices. A lesson in \
                          diplomacy and resource dependence."
                .to_string(),
            max_turns: 9,
            theme: ScenarioTheme::Diplomacy,
            focus_meters: smallvec![MeterId::Price, MeterId::Treasury],
            fail_condition: Some(FailCondition {
                meter: MeterId::Price,
                threshold: 85,
                direction: FailDirection::Above,
                message: "The resource shock sent prices through the roof. Novalia's economy \
                          fell into disarray."
                    .to_string(),
            }),
        },
        Scenario {
            id: ScenarioId::Final,
            title: "Final Chapter: The Reckoning".to_string(),
            description: "Everything learned so far, at once. Keep every indicator in \
                          balance to the end."
                .to_string(),
            max_turns: 15,
            theme: ScenarioTheme::Mixed,
            focus_meters: smallvec![
                MeterId::Price,
                MeterId::Unemployment,
                MeterId::Treasury,
                MeterId::Life,
            ],
            // The final chapter fails on a composite rule instead: two or
            // more meters in their danger band at once.
            fail_condition: None,
        },
    ]
}
