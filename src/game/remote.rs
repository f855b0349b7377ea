use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    lib::{config::RemoteConfig, error::InternalError, uuid::Id},
    game::{
        coordinates::Coordinates,
        fleet::movement::{FleetDispatch, FleetEvent, FleetMovementId, Movement, ShipGroup},
        planet::{Overview, PlanetId},
        research::Research,
        resource::{Cargo, Production, Resources},
    },
};

pub struct ShipyardTag;
pub type ShipyardId = Id<ShipyardTag>;

/// Response of `get-shipyard`: ships currently stationed at (and buildable by) a planet. Used
/// only to confirm enough ships of the right type exist before a dispatch is attempted.
#[derive(Debug, Clone, Deserialize)]
pub struct Shipyard {
    pub planet: PlanetId,
    pub ships: ShipGroup,
}

/// A resource field left behind by a destroyed fleet, reported per galaxy tile.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct DebrisField {
    pub metal: u64,
    pub crystal: u64,
}

impl DebrisField {
    pub fn total(&self) -> u64 {
        self.metal + self.crystal
    }
}

/// Response of `get-galaxy`: the tile contents relevant to expedition-debris harvesting. Position
/// 16 is where expedition debris is reported; other positions are not modelled since nothing else
/// in this system reads them.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Galaxy {
    pub galaxy: u16,
    pub system: u16,
    pub expedition_debris: Option<DebrisField>,
}

/// The player's view into the remote game. One implementation talks to the real game over HTTP;
/// tests substitute a stub that returns canned snapshots. Every method can fail with a
/// [`InternalError`] describing a specific, expected game-rule rejection (insufficient fuel, no
/// free slot, and so on); anything else escapes as [`crate::lib::error::BotError`].
#[async_trait]
pub trait RemoteGameClient: Send + Sync {
    async fn get_overview(&self) -> Result<Overview, InternalError>;
    async fn get_resources(&self, planet: PlanetId) -> Result<Resources, InternalError>;
    async fn get_production(&self, planet: PlanetId) -> Result<Production, InternalError>;
    async fn get_research(&self) -> Result<Research, InternalError>;
    async fn get_shipyard(&self, planet: PlanetId) -> Result<Shipyard, InternalError>;
    async fn get_events(&self) -> Result<Vec<FleetEvent>, InternalError>;
    async fn get_movement(&self) -> Result<Movement, InternalError>;
    async fn get_galaxy(&self, galaxy: u16, system: u16) -> Result<Galaxy, InternalError>;

    /// Current ships, free slots and a single-use anti-replay token for `planet`. The token's
    /// validity window closes quickly: callers must treat this call and the following
    /// [`send_fleet`](Self::send_fleet) as a single, uninterruptible step. Prefer
    /// [`dispatch_fleet`] over calling these two methods directly.
    async fn get_fleet_dispatch(&self, planet: PlanetId) -> Result<FleetDispatch, InternalError>;
    /// Returns whether the remote game accepted the dispatch. Acceptance does not guarantee the
    /// movement will show up in the next `get-movement` snapshot exactly as requested; callers
    /// must verify separately.
    async fn send_fleet(&self, dispatch: FleetDispatchRequest) -> Result<bool, InternalError>;
    async fn recall_fleet(&self, fleet_movement_id: crate::game::fleet::movement::FleetMovementId) -> Result<(), InternalError>;
}

/// Fetches the fleet-dispatch snapshot and immediately sends the fleet, closing the window the
/// anti-replay token's validity depends on. Call sites must never perform `get_fleet_dispatch` and
/// `send_fleet` as two independently-awaited steps with other remote calls between them; routing
/// every dispatch through this one function enforces that at the type level instead of relying on
/// every call site remembering the rule.
///
/// `build` may decline to dispatch (no route, no ships, no slot) by returning `None`, in which
/// case nothing is sent and the result's second element is `None`.
pub async fn dispatch_fleet(
    client: &dyn RemoteGameClient,
    planet: PlanetId,
    build: impl FnOnce(&FleetDispatch) -> Option<FleetDispatchRequest>,
) -> Result<(FleetDispatch, Option<bool>), InternalError> {
    let snapshot = client.get_fleet_dispatch(planet).await?;
    let accepted = match build(&snapshot) {
        Some(request) => Some(client.send_fleet(request).await?),
        None => None,
    };
    Ok((snapshot, accepted))
}

/// Parameters of a `send-fleet` call. A plain struct rather than positional arguments, since the
/// remote client boundary is exactly where a typo in field order would be most expensive.
#[derive(Debug, Clone)]
pub struct FleetDispatchRequest {
    pub origin: Coordinates,
    pub dest: Coordinates,
    pub mission: crate::game::mission::Mission,
    pub ships: ShipGroup,
    pub cargo: Cargo,
    pub speed: u8,
    pub holding_time_seconds: Option<u32>,
    pub token: String,
}

/// Talks to the real game over plain JSON HTTP. The remote game's actual surface is a server-side
/// rendered browser game with no public API; this client targets a thin JSON bridge in front of
/// it (the same shape `ogame.ogame.OGame` talks to session-cookie HTML pages through, simplified
/// here to request/response JSON endpoints named after the operation they perform).
pub struct HttpRemoteClient {
    http: reqwest::Client,
    base_url: String,
    session_token: String,
}

impl HttpRemoteClient {
    pub fn new(config: &RemoteConfig, request_timeout: std::time::Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(HttpRemoteClient { http, base_url: config.base_url.clone(), session_token: config.session_token.clone() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}?token={}", self.base_url.trim_end_matches('/'), path, self.session_token)
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, InternalError> {
        let response = self
            .http
            .get(&self.url(path))
            .send()
            .await
            .map_err(|e| InternalError::RemoteUnavailable(e.to_string()))?;
        response
            .error_for_status()
            .map_err(|e| InternalError::RemoteUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| InternalError::RemoteUnavailable(e.to_string()))
    }

    async fn post<B: Serialize, T: for<'de> Deserialize<'de>>(&self, path: &str, body: &B) -> Result<T, InternalError> {
        let response = self
            .http
            .post(&self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| InternalError::RemoteUnavailable(e.to_string()))?;
        response
            .error_for_status()
            .map_err(|e| InternalError::RemoteUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| InternalError::RemoteUnavailable(e.to_string()))
    }
}

#[derive(Serialize)]
struct SendFleetBody {
    origin: Coordinates,
    dest: Coordinates,
    mission: crate::game::mission::Mission,
    ships: ShipGroup,
    cargo: Cargo,
    speed: u8,
    holding_time_seconds: Option<u32>,
    token: String,
}

#[derive(Deserialize)]
struct SendFleetResponse {
    accepted: bool,
}

#[derive(Serialize)]
struct RecallFleetBody {
    fleet_movement_id: FleetMovementId,
}

#[async_trait]
impl RemoteGameClient for HttpRemoteClient {
    async fn get_overview(&self) -> Result<Overview, InternalError> {
        self.get("get-overview").await
    }

    async fn get_resources(&self, planet: PlanetId) -> Result<Resources, InternalError> {
        self.get(&format!("get-resources&planet={}", planet)).await
    }

    async fn get_production(&self, planet: PlanetId) -> Result<Production, InternalError> {
        self.get(&format!("get-production&planet={}", planet)).await
    }

    async fn get_research(&self) -> Result<Research, InternalError> {
        self.get("get-research").await
    }

    async fn get_shipyard(&self, planet: PlanetId) -> Result<Shipyard, InternalError> {
        self.get(&format!("get-shipyard&planet={}", planet)).await
    }

    async fn get_events(&self) -> Result<Vec<FleetEvent>, InternalError> {
        self.get("get-events").await
    }

    async fn get_movement(&self) -> Result<Movement, InternalError> {
        self.get("get-movement").await
    }

    async fn get_galaxy(&self, galaxy: u16, system: u16) -> Result<Galaxy, InternalError> {
        self.get(&format!("get-galaxy&galaxy={}&system={}", galaxy, system)).await
    }

    async fn get_fleet_dispatch(&self, planet: PlanetId) -> Result<FleetDispatch, InternalError> {
        self.get(&format!("get-fleet-dispatch&planet={}", planet)).await
    }

    async fn send_fleet(&self, dispatch: FleetDispatchRequest) -> Result<bool, InternalError> {
        let body = SendFleetBody {
            origin: dispatch.origin,
            dest: dispatch.dest,
            mission: dispatch.mission,
            ships: dispatch.ships,
            cargo: dispatch.cargo,
            speed: dispatch.speed,
            holding_time_seconds: dispatch.holding_time_seconds,
            token: dispatch.token,
        };
        let response: SendFleetResponse = self.post("send-fleet", &body).await?;
        Ok(response.accepted)
    }

    async fn recall_fleet(&self, fleet_movement_id: FleetMovementId) -> Result<(), InternalError> {
        self.post("recall-fleet", &RecallFleetBody { fleet_movement_id }).await
    }
}

#[cfg(test)]
pub mod stub {
    use super::*;
    use std::sync::Mutex;

    /// A hand-rolled test double rather than a mocking-framework mock: the crate is small enough
    /// that canned responses behind a `Mutex` are clearer than mock-macro boilerplate.
    pub struct StubRemoteClient {
        pub overview: Mutex<Option<Overview>>,
        pub events: Mutex<Vec<FleetEvent>>,
        pub movement: Mutex<Option<Movement>>,
        pub shipyards: Mutex<std::collections::HashMap<PlanetId, ShipGroup>>,
        pub galaxies: Mutex<std::collections::HashMap<(u16, u16), Galaxy>>,
        pub dispatch_ships: Mutex<Option<ShipGroup>>,
        pub free_fleet_slots: Mutex<u32>,
        pub free_expedition_slots: Mutex<u32>,
        pub dispatched: Mutex<Vec<FleetDispatchRequest>>,
        pub recalled: Mutex<Vec<crate::game::fleet::movement::FleetMovementId>>,
        pub accept_dispatch: Mutex<bool>,
    }

    impl Default for StubRemoteClient {
        fn default() -> Self {
            StubRemoteClient {
                overview: Mutex::new(None),
                events: Mutex::new(Vec::new()),
                movement: Mutex::new(None),
                shipyards: Mutex::new(std::collections::HashMap::new()),
                galaxies: Mutex::new(std::collections::HashMap::new()),
                dispatch_ships: Mutex::new(None),
                free_fleet_slots: Mutex::new(1),
                free_expedition_slots: Mutex::new(1),
                dispatched: Mutex::new(Vec::new()),
                recalled: Mutex::new(Vec::new()),
                accept_dispatch: Mutex::new(true),
            }
        }
    }

    #[async_trait]
    impl RemoteGameClient for StubRemoteClient {
        async fn get_overview(&self) -> Result<Overview, InternalError> {
            self.overview.lock().unwrap().clone().ok_or(InternalError::NotFound("overview"))
        }

        async fn get_resources(&self, _planet: PlanetId) -> Result<Resources, InternalError> {
            Ok(Resources::default())
        }

        async fn get_production(&self, _planet: PlanetId) -> Result<Production, InternalError> {
            Ok(Production::default())
        }

        async fn get_research(&self) -> Result<Research, InternalError> {
            Ok(Research::default())
        }

        async fn get_shipyard(&self, planet: PlanetId) -> Result<Shipyard, InternalError> {
            let ships = self.shipyards.lock().unwrap().get(&planet).cloned().unwrap_or_default();
            Ok(Shipyard { planet, ships })
        }

        async fn get_events(&self) -> Result<Vec<FleetEvent>, InternalError> {
            Ok(self.events.lock().unwrap().clone())
        }

        async fn get_movement(&self) -> Result<Movement, InternalError> {
            self.movement.lock().unwrap().clone().ok_or(InternalError::NotFound("movement"))
        }

        async fn get_galaxy(&self, galaxy: u16, system: u16) -> Result<Galaxy, InternalError> {
            Ok(self.galaxies.lock().unwrap().get(&(galaxy, system)).cloned().unwrap_or(Galaxy { galaxy, system, expedition_debris: None }))
        }

        async fn get_fleet_dispatch(&self, planet: PlanetId) -> Result<FleetDispatch, InternalError> {
            let ships = self
                .dispatch_ships
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| self.shipyards.lock().unwrap().get(&planet).cloned().unwrap_or_default());
            Ok(FleetDispatch {
                ships,
                free_fleet_slots: *self.free_fleet_slots.lock().unwrap(),
                free_expedition_slots: *self.free_expedition_slots.lock().unwrap(),
                dispatch_token: "stub-token".into(),
            })
        }

        async fn send_fleet(&self, dispatch: FleetDispatchRequest) -> Result<bool, InternalError> {
            let accepted = *self.accept_dispatch.lock().unwrap();
            self.dispatched.lock().unwrap().push(dispatch);
            Ok(accepted)
        }

        async fn recall_fleet(&self, fleet_movement_id: crate::game::fleet::movement::FleetMovementId) -> Result<(), InternalError> {
            self.recalled.lock().unwrap().push(fleet_movement_id);
            Ok(())
        }
    }
}
