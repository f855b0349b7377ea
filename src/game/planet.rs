use serde::{Deserialize, Serialize};
use crate::{
    lib::uuid::Id,
    game::coordinates::Coordinates,
};

pub struct PlanetTag;
pub type PlanetId = Id<PlanetTag>;

/// A planet or moon. Belongs to the player iff it is listed in the most recently fetched
/// [`Overview`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Planet {
    pub id: PlanetId,
    pub name: String,
    pub coords: Coordinates,
}

impl std::fmt::Display for Planet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.coords)
    }
}

/// Active in-game character class. Bonuses from the class feed the ballistics engine (ship
/// speed, cargo capacity, fuel consumption) the same way `ogame.game.engine.Engine` conditions
/// its formulas on `character_class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    Collector,
    General,
    Discoverer,
}

/// Response of `get-overview`: the player's own bodies plus their active character class.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Overview {
    pub planets: Vec<Planet>,
    pub character_class: Option<CharacterClass>,
}

impl Overview {
    pub fn owns(&self, coords: Coordinates) -> bool {
        self.planets.iter().any(|p| p.coords == coords)
    }

    pub fn find(&self, coords: Coordinates) -> Option<&Planet> {
        self.planets.iter().find(|p| p.coords == coords)
    }
}
