use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Research technologies relevant to ballistics. Combat-only technologies (weapons, shielding,
/// armour) are deliberately not modelled: the core never simulates combat (§1 Non-goals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Technology {
    CombustionDrive,
    ImpulseDrive,
    HyperspaceDrive,
    HyperspaceTechnology,
    EspionageTechnology,
    Astrophysics,
}

/// Response of `get-research`: technology levels, keyed sparsely (an absent key means level 0).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Research {
    pub levels: HashMap<Technology, u16>,
}

impl Research {
    pub fn level(&self, technology: Technology) -> u16 {
        self.levels.get(&technology).copied().unwrap_or(0)
    }
}
