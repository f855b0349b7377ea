use crate::{
    game::{coordinates::Coordinates, mission::Mission},
    game::fleet::movement::{FleetEvent, FleetMovement},
};

/// A composable predicate over fleet events, mirroring `bot.filter_incoming_events` /
/// `bot.filter_mission`: small, named filters that combine with `.and()` rather than one
/// monolithic query function per call site.
pub struct FleetFilter(Box<dyn Fn(&FleetEvent) -> bool>);

impl FleetFilter {
    pub fn new(predicate: impl Fn(&FleetEvent) -> bool + 'static) -> Self {
        FleetFilter(Box::new(predicate))
    }

    pub fn matches(&self, event: &FleetEvent) -> bool {
        (self.0)(event)
    }

    pub fn and(self, other: FleetFilter) -> FleetFilter {
        FleetFilter::new(move |event| self.matches(event) && other.matches(event))
    }

    pub fn hostile() -> FleetFilter {
        FleetFilter::new(|event| event.is_hostile())
    }

    pub fn mission(mission: Mission) -> FleetFilter {
        FleetFilter::new(move |event| event.mission == mission)
    }

    pub fn destined_for(dest: Coordinates) -> FleetFilter {
        FleetFilter::new(move |event| event.dest == dest)
    }

    pub fn incoming() -> FleetFilter {
        FleetFilter::new(|event| !event.is_return_flight)
    }
}

pub fn filter_events<'a>(events: &'a [FleetEvent], filter: &FleetFilter) -> Vec<&'a FleetEvent> {
    events.iter().filter(|event| filter.matches(event)).collect()
}

/// Own fleet movements currently inbound to `dest` and not yet holding there, the set the defence
/// subsystem consults to find the last-friendly-arrival before a hostile fleet lands.
pub fn movements_inbound_to(movements: &[FleetMovement], dest: Coordinates) -> Vec<&FleetMovement> {
    movements
        .iter()
        .filter(|movement| !movement.is_return_flight && movement.dest == dest)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::coordinates::BodyType,
        game::fleet::movement::ShipGroup,
        lib::time::Time,
    };

    fn sample_event(mission: Mission, is_own: bool) -> FleetEvent {
        FleetEvent {
            id: Default::default(),
            mission,
            origin: Coordinates::new(1, 1, 1, BodyType::Planet),
            dest: Coordinates::new(1, 1, 5, BodyType::Planet),
            departure_time: Time::from_epoch_seconds(0),
            arrival_time: Time::from_epoch_seconds(100),
            is_return_flight: false,
            is_own,
            ships: Some(ShipGroup::new()),
        }
    }

    #[test]
    fn test_hostile_filter_excludes_own_fleets() {
        let own_attack = sample_event(Mission::Attack, true);
        let hostile_attack = sample_event(Mission::Attack, false);
        let filter = FleetFilter::hostile();
        assert!(!filter.matches(&own_attack));
        assert!(filter.matches(&hostile_attack));
    }

    #[test]
    fn test_combined_filter_requires_both_predicates() {
        let dest = Coordinates::new(1, 1, 5, BodyType::Planet);
        let filter = FleetFilter::hostile().and(FleetFilter::destined_for(dest));
        let event = sample_event(Mission::Espionage, false);
        assert!(filter.matches(&event));
    }
}
