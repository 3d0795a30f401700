//! Secondary-action (CFO phase) definitions
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::meters::MeterEffects;

pub const ETF_SERIES_LEN: usize = 20;
pub const ETF_START_PRICE: i32 = 100;
const ETF_PRICE_FLOOR: i32 = 10;
const ETF_MAX_STEP: i32 = 3;

/// One secondary action is taken per turn, after the policy choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Etf,
    Diplomacy,
    Survey,
    Industry,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Etf,
        ActionKind::Diplomacy,
        ActionKind::Survey,
        ActionKind::Industry,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Etf => "etf",
            Self::Diplomacy => "diplomacy",
            Self::Survey => "survey",
            Self::Industry => "industry",
        }
    }

    /// Fixed effect set applied when the action executes.
    #[must_use]
    pub const fn effects(self) -> MeterEffects {
        match self {
            Self::Etf => MeterEffects {
                price: None,
                unemployment: None,
                life: Some(1),
                treasury: Some(5),
            },
            Self::Diplomacy => MeterEffects {
                price: Some(-2),
                unemployment: None,
                life: None,
                treasury: None,
            },
            Self::Survey => MeterEffects {
                price: None,
                unemployment: None,
                life: Some(2),
                treasury: None,
            },
            Self::Industry => MeterEffects {
                price: None,
                unemployment: Some(-3),
                life: None,
                treasury: None,
            },
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "etf" => Ok(Self::Etf),
            "diplomacy" => Ok(Self::Diplomacy),
            "survey" => Ok(Self::Survey),
            "industry" => Ok(Self::Industry),
            _ => Err(()),
        }
    }
}

/// Treasury adjustments available to the finance office instead of a
/// regular secondary action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CfoActionKind {
    /// Issue additional bonds: cash now, credibility and future cost later.
    IssueDebt,
    /// Draw down the contingency reserve. Available once per run.
    DrawReserve,
}

impl CfoActionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IssueDebt => "issue_debt",
            Self::DrawReserve => "draw_reserve",
        }
    }
}

/// Full effect set of a finance/diplomacy option, covering both primary
/// and hidden meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DiplomacyEffects {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treasury: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unemployment: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_risk: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub productivity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub future_cost: Option<i32>,
}

impl DiplomacyEffects {
    /// The slice of these effects that lands on the primary meters.
    #[must_use]
    pub const fn meter_part(&self) -> MeterEffects {
        MeterEffects {
            price: self.price,
            unemployment: self.unemployment,
            life: self.life,
            treasury: self.treasury,
        }
    }
}

/// A negotiable monetary/fiscal measure with a success roll. Failure
/// falls back to `fail_effects` when present, else the success set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiplomacyOption {
    pub id: String,
    pub title: String,
    pub description: String,
    pub success_rate: f64,
    pub effects: DiplomacyEffects,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_effects: Option<DiplomacyEffects>,
}

impl DiplomacyOption {
    #[must_use]
    pub fn outcome_effects(&self, success: bool) -> DiplomacyEffects {
        if success {
            self.effects
        } else {
            self.fail_effects.unwrap_or(self.effects)
        }
    }
}

/// The builtin finance/diplomacy menu.
#[must_use]
pub fn builtin_diplomacy_options() -> Vec<DiplomacyOption> {
    vec![
        DiplomacyOption {
            id: "finance-1".to_string(),
            title: "Issue additional bonds".to_string(),
            description: "Raise funds on the bond market. The treasury recovers now, at \
                          the price of credibility and future repayments."
                .to_string(),
            success_rate: 0.9,
            effects: DiplomacyEffects {
                treasury: Some(30),
                credit: Some(-10),
                future_cost: Some(5),
                ..DiplomacyEffects::default()
            },
            fail_effects: Some(DiplomacyEffects {
                treasury: Some(15),
                credit: Some(-15),
                future_cost: Some(3),
                ..DiplomacyEffects::default()
            }),
        },
        DiplomacyOption {
            id: "finance-2".to_string(),
            title: "Monetary easing".to_string(),
            description: "The central bank cuts rates and floods the market with funds. \
                          Activity picks up, and so does inflation risk."
                .to_string(),
            success_rate: 0.75,
            effects: DiplomacyEffects {
                price: Some(5),
                productivity: Some(3),
                treasury: Some(-5),
                inflation_risk: Some(5),
                ..DiplomacyEffects::default()
            },
            fail_effects: Some(DiplomacyEffects {
                price: Some(2),
                productivity: Some(1),
                treasury: Some(-5),
                inflation_risk: Some(3),
                ..DiplomacyEffects::default()
            }),
        },
        DiplomacyOption {
            id: "finance-3".to_string(),
            title: "Employment subsidies".to_string(),
            description: "Subsidise employers to keep people in work. Popular, but hard \
                          on the treasury."
                .to_string(),
            success_rate: 0.8,
            effects: DiplomacyEffects {
                unemployment: Some(-4),
                support: Some(5),
                treasury: Some(-10),
                ..DiplomacyEffects::default()
            },
            fail_effects: Some(DiplomacyEffects {
                unemployment: Some(-2),
                support: Some(2),
                treasury: Some(-10),
                ..DiplomacyEffects::default()
            }),
        },
        DiplomacyOption {
            id: "finance-4".to_string(),
            title: "R&D investment".to_string(),
            description: "Back corporate research programmes for a slow but substantial \
                          productivity payoff."
                .to_string(),
            success_rate: 0.7,
            effects: DiplomacyEffects {
                productivity: Some(10),
                treasury: Some(-8),
                ..DiplomacyEffects::default()
            },
            fail_effects: Some(DiplomacyEffects {
                productivity: Some(3),
                treasury: Some(-8),
                ..DiplomacyEffects::default()
            }),
        },
    ]
}

/// Random-walk price history for the lightstone ETF chart: steps of at
/// most ±3 with a hard floor. Without an RNG the series stays flat.
pub fn generate_price_series<R: Rng>(
    len: usize,
    start_price: i32,
    mut rng: Option<&mut R>,
) -> Vec<i32> {
    let mut prices = Vec::with_capacity(len);
    prices.push(start_price);
    for i in 1..len {
        let step = rng
            .as_deref_mut()
            .map_or(0, |rng| rng.random_range(-ETF_MAX_STEP..=ETF_MAX_STEP));
        prices.push((prices[i - 1] + step).max(ETF_PRICE_FLOOR));
    }
    prices
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn every_action_moves_something() {
        for kind in ActionKind::ALL {
            assert!(!kind.effects().is_empty(), "{kind} does nothing");
        }
    }

    #[test]
    fn failure_falls_back_to_success_set_when_unspecified() {
        let mut option = builtin_diplomacy_options().remove(0);
        option.fail_effects = None;
        assert_eq!(option.outcome_effects(false), option.effects);
    }

    #[test]
    fn fail_effects_are_weaker_on_the_treasury() {
        let bonds = &builtin_diplomacy_options()[0];
        let ok = bonds.outcome_effects(true);
        let bad = bonds.outcome_effects(false);
        assert!(bad.treasury.unwrap() < ok.treasury.unwrap());
    }

    #[test]
    fn price_series_respects_floor_and_length() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let prices = generate_price_series(ETF_SERIES_LEN, 12, Some(&mut rng));
        assert_eq!(prices.len(), ETF_SERIES_LEN);
        assert!(prices.iter().all(|p| *p >= ETF_PRICE_FLOOR));
        assert_eq!(prices[0], 12);
    }

    #[test]
    fn price_series_without_rng_is_flat() {
        let prices = generate_price_series::<ChaCha20Rng>(5, ETF_START_PRICE, None);
        assert!(prices.iter().all(|p| *p == ETF_START_PRICE));
    }
}
