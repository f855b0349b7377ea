use serde::{Deserialize, Serialize};

/// The mission tag of a fleet event or fleet movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mission {
    Attack,
    AcsAttack,
    Transport,
    Deployment,
    Defend,
    Espionage,
    Colonization,
    Harvest,
    Destroy,
    Missile,
    Expedition,
    Trade,
}

impl Mission {
    /// Missions that constitute a hostile incoming fleet, before the ship-composition check
    /// `FleetEvent::is_hostile` also applies (a probe-only fleet on one of these missions is not
    /// hostile).
    pub const HOSTILE: [Mission; 4] = [Mission::Attack, Mission::AcsAttack, Mission::Destroy, Mission::Espionage];

    pub fn is_hostile(self) -> bool {
        Self::HOSTILE.contains(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostile_missions() {
        assert!(Mission::Attack.is_hostile());
        assert!(Mission::AcsAttack.is_hostile());
        assert!(Mission::Destroy.is_hostile());
        assert!(Mission::Espionage.is_hostile());
        assert!(!Mission::Transport.is_hostile());
        assert!(!Mission::Deployment.is_hostile());
        assert!(!Mission::Expedition.is_hostile());
    }
}
