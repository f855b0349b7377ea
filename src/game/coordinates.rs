use serde::{Deserialize, Serialize};

/// Kind of body a set of [`Coordinates`] resolves to. Debris fields never belong to a player and
/// can only ever be a fleet-event destination, never a dispatch origin or destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    Planet,
    Moon,
    Debris,
}

/// A universe coordinate: (galaxy, system, position, body-type). Totally ordered so it can be
/// used as a map key and sorted for deterministic iteration (nearest-origin selection in the
/// expedition debris harvest, for instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct Coordinates {
    pub galaxy: u16,
    pub system: u16,
    pub position: u16,
    #[serde(rename = "type")]
    pub body_type: BodyType,
}

impl Coordinates {
    pub const fn new(galaxy: u16, system: u16, position: u16, body_type: BodyType) -> Self {
        Coordinates { galaxy, system, position, body_type }
    }

    /// A coordinate is a "same position" hop away from another when they differ only by
    /// body-type (planet <-> moon at the same spot); this is the distance-5 case the defence
    /// subsystem treats specially.
    pub fn is_same_position(&self, other: &Coordinates) -> bool {
        self.galaxy == other.galaxy && self.system == other.system && self.position == other.position
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{:?}:{}:{}:{}]", self.body_type, self.galaxy, self.system, self.position)
    }
}
