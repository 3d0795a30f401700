//! Scoring, ranks and endings
use serde::{Deserialize, Serialize};

use crate::meters::{MeterId, Meters};

const BANKRUPTCY_TREASURY: i32 = -50;
const DEBT_CRISIS_TREASURY: i32 = -20;
const AUSTERITY_TREASURY: i32 = 50;
const LOW_LIFE: i32 = 40;

/// How a run ended, mechanically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResultType {
    Clear,
    Fail,
    Bankruptcy,
}

impl GameResultType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Fail => "fail",
            Self::Bankruptcy => "bankruptcy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    S,
    A,
    B,
    C,
    D,
}

impl Rank {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

/// Narrative category of the ending, derived from the final meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    Balanced,
    Austerity,
    DebtCrisis,
    Bankruptcy,
}

impl Ending {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Austerity => "austerity",
            Self::DebtCrisis => "debt_crisis",
            Self::Bankruptcy => "bankruptcy",
        }
    }
}

/// Overall score in `[0, 100]`: the rounded mean of per-meter scores.
/// Price and unemployment invert (lower is better); a negative treasury
/// maps onto a compressed 0..50 band.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn calculate_score(meters: &Meters) -> i32 {
    let mut total = 0.0;
    let mut count = 0u32;
    for meter in meters.iter() {
        let score = match meter.id {
            MeterId::Price | MeterId::Unemployment => 100 - meter.value,
            MeterId::Treasury if meter.value < 0 => (50 + meter.value).max(0),
            MeterId::Life | MeterId::Treasury => meter.value,
        };
        total += f64::from(score);
        count += 1;
    }
    if count == 0 {
        return 0;
    }
    ((total / f64::from(count)).round() as i32).clamp(0, 100)
}

/// Banded rank thresholds: 90/75/60/40.
#[must_use]
pub const fn rank_from_score(score: i32) -> Rank {
    if score >= 90 {
        Rank::S
    } else if score >= 75 {
        Rank::A
    } else if score >= 60 {
        Rank::B
    } else if score >= 40 {
        Rank::C
    } else {
        Rank::D
    }
}

/// Priority-ordered ending classification from the final meter snapshot.
#[must_use]
pub fn ending_type(meters: &Meters) -> Ending {
    let treasury = meters.value(MeterId::Treasury);
    let life = meters.value(MeterId::Life);

    if treasury < BANKRUPTCY_TREASURY {
        return Ending::Bankruptcy;
    }
    if treasury < DEBT_CRISIS_TREASURY || (treasury < 0 && life < LOW_LIFE) {
        return Ending::DebtCrisis;
    }
    if treasury >= AUSTERITY_TREASURY && life < LOW_LIFE {
        return Ending::Austerity;
    }
    Ending::Balanced
}

/// Final verdict of a run, computed once at termination and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub result_type: GameResultType,
    pub rank: Rank,
    pub ending: Ending,
    pub score: i32,
    pub message: String,
}

impl RunResult {
    /// Derive the verdict from the final snapshot. A forced bankruptcy
    /// always narrates as the bankruptcy ending, whatever the meters say.
    #[must_use]
    pub fn from_meters(result_type: GameResultType, meters: &Meters, message: String) -> Self {
        let score = calculate_score(meters);
        let ending = match result_type {
            GameResultType::Bankruptcy => Ending::Bankruptcy,
            GameResultType::Clear | GameResultType::Fail => ending_type(meters),
        };
        Self {
            result_type,
            rank: rank_from_score(score),
            ending,
            score,
            message,
        }
    }
}
