//! Turn summaries and whole-run aggregation for the classroom dashboard
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::advisors::AdvisorId;
use crate::meters::{MeterId, Meters};
use crate::state::TurnRecord;

pub const SUMMARY_JOBS_PRIORITY: &str = "summary.jobs_priority";
pub const SUMMARY_TREASURY_STRAIN: &str = "summary.treasury_strain";
pub const SUMMARY_PRICE_CONTROL: &str = "summary.price_control";
pub const SUMMARY_LIFE_IMPROVED: &str = "summary.life_improved";
pub const SUMMARY_TREASURY_RECOVERING: &str = "summary.treasury_recovering";
pub const SUMMARY_UNEMPLOYMENT_RISING: &str = "summary.unemployment_rising";
pub const SUMMARY_BALANCED: &str = "summary.balanced";

pub const PITFALL_JOBS_OVER_BUDGET: &str = "pitfall.jobs_over_budget";
pub const PITFALL_PRICE_LIFE_NEGLECTED: &str = "pitfall.price_and_life_neglected";
pub const PITFALL_AUSTERITY_TRADEOFF: &str = "pitfall.austerity_tradeoff";
pub const PITFALL_BALANCED_PLAY: &str = "pitfall.balanced_play";

fn change(before: &Meters, after: &Meters, id: MeterId) -> i32 {
    after.value(id) - before.value(id)
}

/// Classify a turn by its dominant meter movement, yielding a stable
/// summary key for the turn record.
#[must_use]
pub fn summarize_turn(before: &Meters, after: &Meters) -> &'static str {
    let price = change(before, after, MeterId::Price);
    let unemployment = change(before, after, MeterId::Unemployment);
    let life = change(before, after, MeterId::Life);
    let treasury = change(before, after, MeterId::Treasury);

    let max_change = price
        .abs()
        .max(unemployment.abs())
        .max(life.abs())
        .max(treasury.abs());

    if unemployment.abs() == max_change && unemployment < 0 {
        SUMMARY_JOBS_PRIORITY
    } else if treasury.abs() == max_change && treasury < 0 {
        SUMMARY_TREASURY_STRAIN
    } else if price.abs() == max_change && price < 0 {
        SUMMARY_PRICE_CONTROL
    } else if life.abs() == max_change && life > 0 {
        SUMMARY_LIFE_IMPROVED
    } else if treasury > 0 {
        SUMMARY_TREASURY_RECOVERING
    } else if unemployment > 0 {
        SUMMARY_UNEMPLOYMENT_RISING
    } else {
        SUMMARY_BALANCED
    }
}

/// Total movement of one meter across a run, improvements and
/// deteriorations tallied separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MeterChangeTotals {
    pub increase_total: i32,
    pub decrease_total: i32,
}

/// Whole-run aggregation over the turn history, consumed by the
/// classroom dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub total_turns: usize,
    pub most_used_advisor: Option<AdvisorId>,
    pub advisor_use_count: HashMap<AdvisorId, u32>,
    pub meter_changes: HashMap<MeterId, MeterChangeTotals>,
    pub common_pitfalls: Vec<String>,
}

#[must_use]
pub fn build_player_summary(history: &[TurnRecord]) -> PlayerSummary {
    let mut advisor_use_count: HashMap<AdvisorId, u32> =
        AdvisorId::ALL.iter().map(|id| (*id, 0)).collect();
    let mut meter_changes: HashMap<MeterId, MeterChangeTotals> = MeterId::ALL
        .iter()
        .map(|id| (*id, MeterChangeTotals::default()))
        .collect();

    for record in history {
        if let Some(advisor) = record.main_advisor_id {
            *advisor_use_count.entry(advisor).or_default() += 1;
        }
        for id in MeterId::ALL {
            let delta = change(&record.before_meters, &record.after_meters, id);
            let totals = meter_changes.entry(id).or_default();
            if delta > 0 {
                totals.increase_total += delta;
            } else if delta < 0 {
                totals.decrease_total += delta.abs();
            }
        }
    }

    let most_used_advisor = advisor_use_count
        .iter()
        .filter(|(_, count)| **count > 0)
        .max_by_key(|(_, count)| **count)
        .map(|(advisor, _)| *advisor);

    let totals = |id: MeterId| meter_changes[&id];
    let mut common_pitfalls = Vec::new();

    if totals(MeterId::Treasury).decrease_total > 50
        && totals(MeterId::Unemployment).decrease_total > 20
    {
        common_pitfalls.push(PITFALL_JOBS_OVER_BUDGET.to_string());
    }
    if totals(MeterId::Price).increase_total > 30 && totals(MeterId::Life).decrease_total > 20 {
        common_pitfalls.push(PITFALL_PRICE_LIFE_NEGLECTED.to_string());
    }
    if totals(MeterId::Treasury).increase_total > 40
        && (totals(MeterId::Unemployment).increase_total > 15
            || totals(MeterId::Life).decrease_total > 15)
    {
        common_pitfalls.push(PITFALL_AUSTERITY_TRADEOFF.to_string());
    }
    if common_pitfalls.is_empty() {
        let improvements = totals(MeterId::Unemployment).decrease_total
            + totals(MeterId::Life).increase_total
            + totals(MeterId::Treasury).increase_total;
        let deteriorations = totals(MeterId::Price).increase_total
            + totals(MeterId::Unemployment).increase_total
            + totals(MeterId::Life).decrease_total
            + totals(MeterId::Treasury).decrease_total;
        if improvements > deteriorations {
            common_pitfalls.push(PITFALL_BALANCED_PLAY.to_string());
        }
    }

    PlayerSummary {
        total_turns: history.len(),
        most_used_advisor,
        advisor_use_count,
        meter_changes,
        common_pitfalls,
    }
}
