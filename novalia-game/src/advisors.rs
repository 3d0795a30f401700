//! Advisor roster and commentary
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::policy::Policy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisorId {
    Riku,
    Haru,
    Sato,
    Tsumugi,
    Mina,
    Navi,
}

impl AdvisorId {
    pub const ALL: [AdvisorId; 6] = [
        AdvisorId::Riku,
        AdvisorId::Haru,
        AdvisorId::Sato,
        AdvisorId::Tsumugi,
        AdvisorId::Mina,
        AdvisorId::Navi,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Riku => "riku",
            Self::Haru => "haru",
            Self::Sato => "sato",
            Self::Tsumugi => "tsumugi",
            Self::Mina => "mina",
            Self::Navi => "navi",
        }
    }

    /// Canned reactions voiced when a policy lands.
    #[must_use]
    pub const fn comments(self) -> &'static [&'static str] {
        match self {
            Self::Riku => &[
                "Economically sound, in my view.",
                "We should weigh the fiscal impact carefully.",
                "Think about the long run here.",
            ],
            Self::Haru => &[
                "Public works do wonders for unemployment, though the treasury will feel it.",
                "Infrastructure is a long-term investment.",
                "An interesting policy from an engineering standpoint.",
            ],
            Self::Sato => &[
                "I can endorse this from an education angle.",
                "Please keep the next generation in mind.",
                "Developing people is the foundation of a nation.",
            ],
            Self::Tsumugi => &[
                "The people's health must come first.",
                "A solid healthcare system matters.",
                "Welfare policy is a long-term investment.",
            ],
            Self::Mina => &[
                "I'd like to see more digital initiatives.",
                "Efficiency will be the key.",
                "A policy that rewards innovation, I like it.",
            ],
            Self::Navi => &[
                "Running the numbers on this policy...",
                "Probabilistically, this choice holds up.",
                "Cross-referencing with historical data...",
            ],
        }
    }
}

impl fmt::Display for AdvisorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdvisorId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "riku" => Ok(Self::Riku),
            "haru" => Ok(Self::Haru),
            "sato" => Ok(Self::Sato),
            "tsumugi" => Ok(Self::Tsumugi),
            "mina" => Ok(Self::Mina),
            "navi" => Ok(Self::Navi),
            _ => Err(()),
        }
    }
}

/// One advisor's remark about the policy just applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorMessage {
    pub advisor_id: AdvisorId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_policy_id: Option<String>,
}

/// Attribute a policy to the advisor whose portfolio it matches, by
/// keyword over name and description. Navi (data analysis) is the
/// catch-all.
#[must_use]
pub fn main_advisor_for(policy: &Policy) -> AdvisorId {
    let text = format!(
        "{} {}",
        policy.name.to_lowercase(),
        policy.description.to_lowercase()
    );
    if text.contains("public works") || text.contains("infrastructure") {
        AdvisorId::Haru
    } else if text.contains("education") || text.contains("school") {
        AdvisorId::Sato
    } else if text.contains("health") || text.contains("welfare") || text.contains("medical") {
        AdvisorId::Tsumugi
    } else if text.contains("digital") || text.contains("efficien") {
        AdvisorId::Mina
    } else if text.contains("tax") || text.contains("fiscal") || text.contains("interest rate") {
        AdvisorId::Riku
    } else {
        AdvisorId::Navi
    }
}

/// One random remark from each advisor. Without an RNG the first line of
/// each pool is used.
pub fn commentary<R: Rng>(policy_id: &str, mut rng: Option<&mut R>) -> Vec<AdvisorMessage> {
    AdvisorId::ALL
        .iter()
        .map(|&advisor_id| {
            let pool = advisor_id.comments();
            let idx = rng
                .as_deref_mut()
                .map_or(0, |rng| rng.random_range(0..pool.len()));
            AdvisorMessage {
                advisor_id,
                text: pool[idx].to_string(),
                related_policy_id: Some(policy_id.to_string()),
            }
        })
        .collect()
}
