//! Business structures and their tax-leakage multipliers

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// How funds currently move from stablecoins into local currency.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Structure {
    #[default]
    DirectBank,
    FintechPartner,
    CexRamp,
    DefiOnRamp,
}

impl Structure {
    pub const ALL: [Structure; 4] = [
        Structure::DirectBank,
        Structure::FintechPartner,
        Structure::CexRamp,
        Structure::DefiOnRamp,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Structure::DirectBank => "Direct exchange → local bank",
            Structure::FintechPartner => "Exchange → local fintech partner",
            Structure::CexRamp => "Stablecoin → CEX → local ramp",
            Structure::DefiOnRamp => "DeFi → local on-ramp",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Structure::DirectBank => "direct-bank",
            Structure::FintechPartner => "fintech",
            Structure::CexRamp => "cex-ramp",
            Structure::DefiOnRamp => "defi",
        }
    }

    /// Share of the combined statutory rate actually leaked, in (0, 1].
    pub fn multiplier(&self) -> f64 {
        match self {
            Structure::DirectBank => 1.0,
            Structure::FintechPartner => 0.85,
            Structure::CexRamp => 0.70,
            Structure::DefiOnRamp => 0.60,
        }
    }
}

impl Display for Structure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn normalize(s: &str) -> String {
    s.replace("->", "→")
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Structure {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        Structure::ALL
            .into_iter()
            .find(|st| normalize(st.label()) == key || st.slug() == key)
            .ok_or_else(|| anyhow!("Unknown structure: {}", s))
    }
}

impl TryFrom<String> for Structure {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Structure> for String {
    fn from(value: Structure) -> Self {
        value.label().to_string()
    }
}
