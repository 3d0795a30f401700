//! Deferred industry investment projects
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::meters::MeterEffects;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndustryType {
    Agriculture,
    Manufacturing,
    Services,
    MagicTech,
}

impl IndustryType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Agriculture => "agriculture",
            Self::Manufacturing => "manufacturing",
            Self::Services => "services",
            Self::MagicTech => "magic_tech",
        }
    }
}

impl fmt::Display for IndustryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-turn payoff of an active project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IndustryEffects {
    #[serde(default)]
    pub unemployment: i32,
    #[serde(default)]
    pub treasury: i32,
    #[serde(default)]
    pub life: i32,
}

/// A project paid for up front whose effects start after `delay` turns
/// and then repeat for `duration` turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryProject {
    pub id: String,
    pub industry: IndustryType,
    pub name: String,
    pub description: String,
    pub cost: i32,
    pub delay: u32,
    pub duration: u32,
    pub effects_per_turn: IndustryEffects,
}

/// A started project with its countdowns. No effect accrues while
/// `remaining_delay > 0`; afterwards `effects_per_turn` lands once per
/// turn until `remaining_duration` runs out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveIndustryProject {
    #[serde(flatten)]
    pub project: IndustryProject,
    pub remaining_delay: u32,
    pub remaining_duration: u32,
}

impl ActiveIndustryProject {
    #[must_use]
    pub fn start(project: IndustryProject) -> Self {
        let remaining_delay = project.delay;
        let remaining_duration = project.duration;
        Self {
            project,
            remaining_delay,
            remaining_duration,
        }
    }
}

/// Advance every active project by one turn, dropping the exhausted ones,
/// and return the aggregated deltas to apply. Only meters with a nonzero
/// total are reported, so idle projects never force a clamp.
pub fn tick_projects(active: &mut Vec<ActiveIndustryProject>) -> MeterEffects {
    let mut unemployment = 0;
    let mut treasury = 0;
    let mut life = 0;

    active.retain_mut(|project| {
        if project.remaining_delay > 0 {
            project.remaining_delay -= 1;
            return true;
        }
        if project.remaining_duration == 0 {
            return false;
        }
        unemployment += project.project.effects_per_turn.unemployment;
        treasury += project.project.effects_per_turn.treasury;
        life += project.project.effects_per_turn.life;
        project.remaining_duration -= 1;
        project.remaining_duration > 0
    });

    MeterEffects {
        price: None,
        unemployment: (unemployment != 0).then_some(unemployment),
        treasury: (treasury != 0).then_some(treasury),
        life: (life != 0).then_some(life),
    }
}

/// The builtin project catalogue.
#[must_use]
pub fn builtin_industries() -> Vec<IndustryProject> {
    vec![
        IndustryProject {
            id: "industry-agriculture".to_string(),
            industry: IndustryType::Agriculture,
            name: "Farmland development programme".to_string(),
            description: "Expand farmland and irrigation to lift agricultural output, \
                          creating jobs and easing daily life."
                .to_string(),
            cost: 30,
            delay: 1,
            duration: 4,
            effects_per_turn: IndustryEffects {
                unemployment: -2,
                treasury: 1,
                life: 1,
            },
        },
        IndustryProject {
            id: "industry-manufacturing".to_string(),
            industry: IndustryType::Manufacturing,
            name: "Factory modernisation programme".to_string(),
            description: "Modernise existing plants for a big jump in output. Strong job \
                          creation, steep up-front cost."
                .to_string(),
            cost: 50,
            delay: 2,
            duration: 5,
            effects_per_turn: IndustryEffects {
                unemployment: -4,
                treasury: 2,
                life: 2,
            },
        },
        IndustryProject {
            id: "industry-services".to_string(),
            industry: IndustryType::Services,
            name: "Tourism and services push".to_string(),
            description: "Build out tourist infrastructure to energise the service \
                          sector. Modest, steady gains."
                .to_string(),
            cost: 25,
            delay: 1,
            duration: 3,
            effects_per_turn: IndustryEffects {
                unemployment: -1,
                treasury: 3,
                life: 2,
            },
        },
        IndustryProject {
            id: "industry-magic-tech".to_string(),
            industry: IndustryType::MagicTech,
            name: "Lightstone start-up fund".to_string(),
            description: "Back research into new lightstone applications. Slow to pay \
                          off, but the late-game tax take is substantial."
                .to_string(),
            cost: 40,
            delay: 3,
            duration: 6,
            effects_per_turn: IndustryEffects {
                unemployment: -2,
                treasury: 5,
                life: 1,
            },
        },
    ]
}
