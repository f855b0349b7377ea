use serde::{Deserialize, Serialize};

/// Transportable or storable resource kinds. Energy and dark matter are reported by the remote
/// client but never cargo-loaded: only `metal`/`crystal`/`deuterium` occupy cargo hold space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Metal,
    Crystal,
    Deuterium,
    Energy,
    DarkMatter,
}

/// A resource amount to load into a fleet's cargo hold, keyed by the three haulable resources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Cargo {
    pub metal: u64,
    pub crystal: u64,
    pub deuterium: u64,
}

impl Cargo {
    pub const fn zero() -> Self {
        Cargo { metal: 0, crystal: 0, deuterium: 0 }
    }

    pub fn total(&self) -> u64 {
        self.metal + self.crystal + self.deuterium
    }

    /// Greedily packs as much of the available resources as fits in `capacity`, after first
    /// setting aside `reserved_deuterium` for the flight itself (it is never loaded as cargo).
    /// Mirrors `bot.get_cargo`'s preference order: deuterium, then crystal, then metal.
    pub fn pack(available: Resources, capacity: u64, reserved_deuterium: u64) -> Cargo {
        let mut remaining = capacity;
        let spare_deuterium = available.deuterium.saturating_sub(reserved_deuterium);
        let deuterium = spare_deuterium.min(remaining);
        remaining -= deuterium;
        let crystal = available.crystal.min(remaining);
        remaining -= crystal;
        let metal = available.metal.min(remaining);
        Cargo { metal, crystal, deuterium }
    }
}

/// Response of `get-resources`: the full resource snapshot of a planet, including storage
/// produced per hour (`Production`) separately from the on-hand amounts here.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct Resources {
    pub metal: u64,
    pub crystal: u64,
    pub deuterium: u64,
    pub energy: i64,
    pub dark_matter: u64,
}

/// Hourly production rate of the three haulable resources, used to decide whether a planet is
/// worth revisiting before its next scheduled wake.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct Production {
    pub metal: u64,
    pub crystal: u64,
    pub deuterium: u64,
}
