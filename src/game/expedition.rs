use std::collections::HashSet;

use crate::{
    lib::{config::{Config, ExpeditionConfig, RepeatCount}, error::InternalError, time::Time},
    game::{
        coordinates::Coordinates,
        fleet::movement::{FleetMovementId, Movement},
        mission::Mission,
        notification::Notification,
        planet::Overview,
        remote::{dispatch_fleet, FleetDispatchRequest, RemoteGameClient},
        research::Research,
        ship::Ship,
    },
};

fn ceil_div(a: u64, b: u64) -> u64 {
    if b == 0 { 0 } else { (a + b - 1) / b }
}

/// Runtime state for one configured expedition slot, indexed the same way as `Config::expeditions`.
/// `running == fleet_id.is_some()`: the fleet id, not a separate bool, is the source of truth for
/// whether this slot currently has an outbound expedition, so the two can never drift apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpeditionState {
    pub remaining: Option<RepeatCount>,
    pub fleet_id: Option<FleetMovementId>,
}

impl ExpeditionState {
    pub fn running(&self) -> bool {
        self.fleet_id.is_some()
    }
}

/// A pending operator-issued cancellation for one expedition slot, consumed on the next
/// reconciliation pass it applies to.
#[derive(Debug, Clone, Copy)]
pub struct PendingCancel {
    pub expedition_index: usize,
    pub return_fleet: bool,
}

/// Outcome of one expedition reconciliation pass.
pub struct ExpeditionOutcome {
    pub notifications: Vec<Notification>,
}

/// Reconciles configured expeditions against the current fleet movement snapshot, in four steps
/// mirroring `bot.bot.OGameBot`'s `SendExpedition`/`CancelExpedition` handling: drain any pending
/// cancellation, notice finished runs and harvest their debris, reattach movements that match a
/// slot but lost their fleet id (a dispatch that succeeded remotely but whose post-dispatch match
/// failed last pass), then dispatch any slot that is idle and has repeats remaining.
pub async fn handle_expeditions(
    client: &dyn RemoteGameClient,
    overview: &Overview,
    movement: &Movement,
    research: &Research,
    config: &Config,
    states: &mut [ExpeditionState],
    pending_cancel: Option<PendingCancel>,
) -> Result<ExpeditionOutcome, InternalError> {
    let mut notifications = Vec::new();

    if let Some(cancel) = pending_cancel {
        if let Some(state) = states.get_mut(cancel.expedition_index) {
            // A cancellation always stops future redispatch, whether or not the slot currently
            // has an outbound fleet; `return_fleet` only controls whether an outbound fleet is
            // actively recalled rather than left to finish its current flight.
            if cancel.return_fleet {
                if let Some(fleet_id) = state.fleet_id {
                    client.recall_fleet(fleet_id).await?;
                }
            }
            state.remaining = Some(RepeatCount::Times(0));
            notifications.push(Notification::ExpeditionCancelled {
                expedition_index: cancel.expedition_index,
                return_fleet: cancel.return_fleet,
                reason: "cancelled by operator".into(),
            });
        }
    }

    for (index, expedition) in config.expeditions.iter().enumerate() {
        let state = match states.get_mut(index) {
            Some(state) => state,
            None => continue,
        };

        if let Some(fleet_id) = state.fleet_id {
            if !movement.fleets.iter().any(|m| m.id == fleet_id) {
                state.fleet_id = None;
                notifications.push(Notification::ExpeditionFinished {
                    expedition_index: index,
                    origin: expedition.origin,
                    dest: expedition.dest,
                    estimated_finds: crate::game::fleet::travel::max_expedition_finds(research),
                });
                if let Some(remaining) = state.remaining {
                    state.remaining = Some(remaining.decrement());
                }
                if config.harvest_expedition_debris {
                    notifications.extend(harvest_debris_near(client, overview, config, expedition).await?);
                }
            }
        }
    }

    let claimed: HashSet<FleetMovementId> = states.iter().filter_map(|s| s.fleet_id).collect();
    for (index, expedition) in config.expeditions.iter().enumerate() {
        let state = match states.get_mut(index) {
            Some(state) => state,
            None => continue,
        };
        if state.fleet_id.is_some() {
            continue;
        }
        let unassigned = movement.fleets.iter().find(|m| {
            !claimed.contains(&m.id)
                && m.mission == Mission::Expedition
                && m.origin == expedition.origin
                && m.dest == expedition.dest
                && !m.is_return_flight
        });
        if let Some(movement) = unassigned {
            state.fleet_id = Some(movement.id);
        }
    }

    for (index, expedition) in config.expeditions.iter().enumerate() {
        let state = match states.get_mut(index) {
            Some(state) => state,
            None => continue,
        };
        if state.running() {
            continue;
        }
        let exhausted = state.remaining.map_or(false, |r| r.is_exhausted());
        if exhausted {
            continue;
        }

        let origin_planet = match overview.find(expedition.origin) {
            Some(planet) => planet.id,
            None => continue,
        };

        // A successful send here does not learn the new fleet's id: the remote game does not hand
        // one back, and the dispatch-token discipline forbids an extra read in between. The
        // reattach step above will pick the new movement up and claim it on the next pass.
        match dispatch_expedition(client, origin_planet, expedition).await {
            Ok(_dispatched) => {}
            Err(InternalError::NoFreeExpeditionSlot) => {
                notifications.push(Notification::ExpeditionCancelled {
                    expedition_index: index,
                    return_fleet: false,
                    reason: InternalError::NoFreeExpeditionSlot.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    Ok(ExpeditionOutcome { notifications })
}

/// Dispatches one configured expedition through the anti-replay token helper. Declines (returns
/// `Ok(false)`) rather than erroring when the origin currently lacks enough of the configured
/// ships, enough free slots, or enough fuel for the round trip including the holding time at the
/// destination: these are transient conditions worth retrying next pass, not failures worth
/// surfacing as an error.
async fn dispatch_expedition(
    client: &dyn RemoteGameClient,
    origin_planet: crate::game::planet::PlanetId,
    expedition: &ExpeditionConfig,
) -> Result<bool, InternalError> {
    let resources = client.get_resources(origin_planet).await?;
    let distance = crate::game::fleet::travel::distance(expedition.origin, expedition.dest);
    let round_trip_fuel = crate::game::fleet::travel::fuel_consumption(&expedition.ships, distance, expedition.speed) * 2;

    let (_, accepted) = dispatch_fleet(client, origin_planet, |snapshot| {
        if snapshot.free_fleet_slots == 0 || snapshot.free_expedition_slots == 0 {
            return None;
        }
        if round_trip_fuel > resources.deuterium {
            return None;
        }
        for (ship, &count) in expedition.ships.0.iter() {
            if snapshot.ships.count(*ship) < count {
                return None;
            }
        }
        Some(FleetDispatchRequest {
            origin: expedition.origin,
            dest: expedition.dest,
            mission: Mission::Expedition,
            ships: expedition.ships.clone(),
            cargo: expedition.cargo,
            speed: expedition.speed,
            holding_time_seconds: Some(expedition.holding_time * 3600),
            token: snapshot.dispatch_token.clone(),
        })
    })
    .await?;

    Ok(matches!(accepted, Some(true)))
}

/// Looks up the debris field an expedition may have left behind and, if there is a shortfall
/// between what a recycler fleet from the nearest own body can carry and what is sitting on the
/// tile, dispatches a harvest run and/or reports the shortfall. Mirrors `bot.bot`'s opportunistic
/// expedition-debris harvest (§4.4 step 4).
async fn harvest_debris_near(
    client: &dyn RemoteGameClient,
    overview: &Overview,
    config: &Config,
    expedition: &ExpeditionConfig,
) -> Result<Vec<Notification>, InternalError> {
    let galaxy = client.get_galaxy(expedition.dest.galaxy, expedition.dest.system).await?;
    let debris = match galaxy.expedition_debris {
        Some(debris) if debris.total() > 0 => debris,
        _ => return Ok(Vec::new()),
    };

    let mut candidates: Vec<Coordinates> = overview.planets.iter().map(|p| p.coords).collect();
    candidates.sort_by_key(|&coords| crate::game::fleet::travel::distance(coords, expedition.dest));

    for origin in candidates {
        let origin_planet = match overview.find(origin) {
            Some(planet) => planet.id,
            None => continue,
        };

        let mut shortfall = None;
        let (_, accepted) = dispatch_fleet(client, origin_planet, |snapshot| {
            let available = snapshot.ships.count(Ship::Recycler);
            if available == 0 {
                return None;
            }
            let capacity_each = Ship::Recycler.as_data().cargo_capacity as u64;
            let needed = ceil_div(debris.total(), capacity_each) as u32;
            let sending = needed.min(available);
            if sending < needed {
                shortfall = Some(format!("needed {} recyclers, only {} available at this origin", needed, available));
            }
            let mut ships = std::collections::HashMap::new();
            ships.insert(Ship::Recycler, sending);
            Some(FleetDispatchRequest {
                origin,
                dest: expedition.dest,
                mission: Mission::Harvest,
                ships: crate::game::fleet::movement::ShipGroup(ships),
                cargo: Default::default(),
                speed: config.harvest_speed,
                holding_time_seconds: None,
                token: snapshot.dispatch_token.clone(),
            })
        })
        .await?;

        if matches!(accepted, Some(true)) {
            return Ok(vec![Notification::DebrisHarvest { destination: expedition.dest, debris: debris.total(), shortfall }]);
        }
    }

    Ok(vec![Notification::DebrisHarvest {
        destination: expedition.dest,
        debris: debris.total(),
        shortfall: Some("no origin had any recyclers available".into()),
    }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{coordinates::BodyType, planet::{Planet, PlanetId}, remote::stub::StubRemoteClient};

    fn coords(position: u16) -> Coordinates {
        Coordinates::new(1, 1, position, BodyType::Planet)
    }

    fn overview_with(origin: Coordinates) -> Overview {
        Overview { planets: vec![Planet { id: PlanetId::new(), name: "Home".into(), coords: origin }], character_class: None }
    }

    #[tokio::test]
    async fn test_finished_expedition_decrements_repeat_and_redispatches() {
        let client = StubRemoteClient::default();
        let origin = coords(1);
        let overview = overview_with(origin);
        *client.movement.lock().unwrap() = Some(Movement { fleets: vec![], free_fleet_slots: 1, free_expedition_slots: 1 });

        let mut config = Config::default();
        config.expeditions.push(ExpeditionConfig {
            origin,
            origin_type: BodyType::Planet,
            dest: coords(16),
            ships: Default::default(),
            cargo: Default::default(),
            speed: 10,
            holding_time: 1,
            repeat: RepeatCount::Times(2),
        });
        let fleet_id = FleetMovementId::new();
        let mut states = vec![ExpeditionState { remaining: Some(RepeatCount::Times(2)), fleet_id: Some(fleet_id) }];

        let movement = Movement { fleets: vec![], free_fleet_slots: 1, free_expedition_slots: 1 };
        let outcome = handle_expeditions(&client, &overview, &movement, &Research::default(), &config, &mut states, None)
            .await
            .unwrap();

        assert_eq!(states[0].remaining, Some(RepeatCount::Times(1)));
        assert!(outcome.notifications.iter().any(|n| matches!(n, Notification::ExpeditionFinished { .. })));
    }

    #[tokio::test]
    async fn test_cancellation_clears_remaining_and_optionally_recalls() {
        let client = StubRemoteClient::default();
        let origin = coords(1);
        let overview = overview_with(origin);
        let mut config = Config::default();
        config.expeditions.push(ExpeditionConfig {
            origin,
            origin_type: BodyType::Planet,
            dest: coords(16),
            ships: Default::default(),
            cargo: Default::default(),
            speed: 10,
            holding_time: 1,
            repeat: RepeatCount::Forever,
        });
        let fleet_id = FleetMovementId::new();
        let mut states = vec![ExpeditionState { remaining: Some(RepeatCount::Forever), fleet_id: Some(fleet_id) }];
        let movement = Movement {
            fleets: vec![crate::game::fleet::movement::FleetMovement {
                id: fleet_id,
                mission: Mission::Expedition,
                origin,
                dest: coords(16),
                departure_time: Time::from_epoch_seconds(0),
                arrival_time: Time::from_epoch_seconds(100),
                is_return_flight: false,
                ships: Default::default(),
                cargo: Default::default(),
                holding_time_seconds: Some(3600),
            }],
            free_fleet_slots: 1,
            free_expedition_slots: 1,
        };

        let cancel = PendingCancel { expedition_index: 0, return_fleet: true };
        let outcome = handle_expeditions(&client, &overview, &movement, &Research::default(), &config, &mut states, Some(cancel))
            .await
            .unwrap();

        assert_eq!(states[0].remaining, Some(RepeatCount::Times(0)));
        assert_eq!(client.recalled.lock().unwrap().len(), 1);
        assert!(outcome.notifications.iter().any(|n| matches!(n, Notification::ExpeditionCancelled { return_fleet: true, .. })));
    }

    #[tokio::test]
    async fn test_unassigned_fleet_is_reattached_before_dispatch() {
        let client = StubRemoteClient::default();
        let origin = coords(1);
        let dest = coords(16);
        let overview = overview_with(origin);
        let mut config = Config::default();
        config.expeditions.push(ExpeditionConfig {
            origin,
            origin_type: BodyType::Planet,
            dest,
            ships: Default::default(),
            cargo: Default::default(),
            speed: 10,
            holding_time: 1,
            repeat: RepeatCount::Forever,
        });
        let mut states = vec![ExpeditionState::default()];
        let unassigned_id = FleetMovementId::new();
        let movement = Movement {
            fleets: vec![crate::game::fleet::movement::FleetMovement {
                id: unassigned_id,
                mission: Mission::Expedition,
                origin,
                dest,
                departure_time: Time::from_epoch_seconds(0),
                arrival_time: Time::from_epoch_seconds(100),
                is_return_flight: false,
                ships: Default::default(),
                cargo: Default::default(),
                holding_time_seconds: Some(3600),
            }],
            free_fleet_slots: 1,
            free_expedition_slots: 1,
        };

        handle_expeditions(&client, &overview, &movement, &Research::default(), &config, &mut states, None)
            .await
            .unwrap();

        assert_eq!(states[0].fleet_id, Some(unassigned_id));
        assert!(client.dispatched.lock().unwrap().is_empty());
    }
}
