use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use chrono::Duration;
use crate::{
    lib::{uuid::Id, time::Time},
    game::{coordinates::Coordinates, mission::Mission, resource::Cargo, ship::Ship},
};

pub struct FleetEventTag;
pub type FleetEventId = Id<FleetEventTag>;

/// A named group of ships, keyed by ship type. Absent keys mean zero ships of that type, the same
/// sparse convention `Research` uses for technology levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShipGroup(pub HashMap<Ship, u32>);

impl ShipGroup {
    pub fn new() -> Self {
        ShipGroup(HashMap::new())
    }

    pub fn count(&self, ship: Ship) -> u32 {
        self.0.get(&ship).copied().unwrap_or(0)
    }

    pub fn total_ships(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|&count| count == 0)
    }

    pub fn cargo_capacity(&self) -> u64 {
        self.0
            .iter()
            .map(|(ship, &count)| ship.as_data().cargo_capacity as u64 * count as u64)
            .sum()
    }

    /// True when the group is non-empty and every ship in it is an espionage probe. Probe-only
    /// fleets carry no combat or cargo capability and are excluded from hostile classification.
    pub fn is_probes_only(&self) -> bool {
        let present: Vec<Ship> = self.0.iter().filter(|(_, &count)| count > 0).map(|(&ship, _)| ship).collect();
        !present.is_empty() && present.iter().all(|&ship| ship == Ship::EspionageProbe)
    }
}

/// One entry from `get-events`: an incoming or outgoing fleet movement, friend or foe. Only
/// movements belonging to the player reveal `ships`; hostile fleets report only mission and ETA.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FleetEvent {
    pub id: FleetEventId,
    pub mission: Mission,
    pub origin: Coordinates,
    pub dest: Coordinates,
    pub departure_time: Time,
    pub arrival_time: Time,
    pub is_return_flight: bool,
    pub is_own: bool,
    pub ships: Option<ShipGroup>,
}

impl FleetEvent {
    /// Hostile by mission, own-ness and ship composition: a fleet made up solely of espionage
    /// probes carries no attack capability and is never classified as hostile, regardless of
    /// mission. Composition is unknown (`ships: None`) for most hostile-mission events the remote
    /// game reports, in which case the mission alone decides.
    pub fn is_hostile(&self) -> bool {
        if self.is_own || !self.mission.is_hostile() {
            return false;
        }
        !matches!(&self.ships, Some(ships) if ships.is_probes_only())
    }
}

pub struct FleetMovementTag;
pub type FleetMovementId = Id<FleetMovementTag>;

/// A fleet movement the player controls (own outbound or returning fleet), with enough detail to
/// compute whether and when it can be recalled.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FleetMovement {
    pub id: FleetMovementId,
    pub mission: Mission,
    pub origin: Coordinates,
    pub dest: Coordinates,
    pub departure_time: Time,
    pub arrival_time: Time,
    pub is_return_flight: bool,
    pub ships: ShipGroup,
    pub cargo: Cargo,
    /// Expeditions and some other missions hold at the destination before returning; `None` for
    /// missions that have no holding phase (transport, deployment, attack).
    pub holding_time_seconds: Option<u32>,
}

impl FleetMovement {
    pub fn flight_duration(&self) -> i64 {
        self.arrival_time.epoch_seconds() - self.departure_time.epoch_seconds()
    }

    pub fn holding_start(&self) -> Time {
        self.arrival_time
    }

    pub fn holding_end(&self) -> Time {
        match self.holding_time_seconds {
            Some(seconds) => self.arrival_time.checked_add(Duration::seconds(seconds as i64)),
            None => self.arrival_time,
        }
    }
}

/// Response of `get-movement`: every own fleet movement plus the free-slot counters that gate
/// new dispatches.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Movement {
    pub fleets: Vec<FleetMovement>,
    pub free_fleet_slots: u32,
    pub free_expedition_slots: u32,
}

/// Result of `get-fleet-dispatch`: the ships and free slots currently available at a planet, plus
/// a single-use anti-replay token whose validity window closes quickly. Must be fetched
/// immediately before the `send-fleet` call it authorises; nothing may observe remote state
/// between the two.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FleetDispatch {
    pub ships: ShipGroup,
    pub free_fleet_slots: u32,
    pub free_expedition_slots: u32,
    pub dispatch_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_group_cargo_capacity_sums_by_type() {
        let mut ships = HashMap::new();
        ships.insert(Ship::SmallCargo, 2);
        ships.insert(Ship::LargeCargo, 1);
        let group = ShipGroup(ships);
        assert_eq!(group.cargo_capacity(), 2 * 5000 + 25000);
    }

    #[test]
    fn test_ship_group_is_empty_when_all_counts_zero() {
        let mut ships = HashMap::new();
        ships.insert(Ship::SmallCargo, 0);
        assert!(ShipGroup(ships).is_empty());
    }
}
