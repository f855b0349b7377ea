use crate::game::{
    coordinates::Coordinates,
    fleet::movement::ShipGroup,
    planet::CharacterClass,
    research::{Research, Technology},
};

/// Pure ballistics, mirroring `ogame.game.calc`/`ogame.game.engine.Engine`. Kept free of I/O and
/// of the scheduler so it can be property-tested without a remote client or clock.
///
/// Distance between two coordinates, tiered the way the universe map is: crossing a galaxy
/// dwarfs crossing a system, which dwarfs moving between positions in the same system.
pub fn distance(from: Coordinates, to: Coordinates) -> u32 {
    if from.galaxy != to.galaxy {
        20_000 * diff(from.galaxy, to.galaxy) as u32
    } else if from.system != to.system {
        2_700 + 95 * diff(from.system, to.system) as u32
    } else if from.position != to.position {
        1_000 + 5 * diff(from.position, to.position) as u32
    } else {
        5
    }
}

fn diff(a: u16, b: u16) -> u16 {
    if a > b { a - b } else { b - a }
}

/// Effective speed of the slowest ship in the group, in distance/hour at 100% throttle, after
/// applying the best drive each ship has researched and the character-class speed bonus.
pub fn fleet_speed(ships: &ShipGroup, research: &Research, character_class: Option<CharacterClass>) -> u32 {
    ships
        .0
        .iter()
        .filter(|(_, &count)| count > 0)
        .map(|(&ship, _)| {
            let drive = ship.best_drive(|tech| research.level(tech));
            apply_class_speed_bonus(drive.speed, character_class)
        })
        .min()
        .unwrap_or(0)
}

fn apply_class_speed_bonus(speed: u32, character_class: Option<CharacterClass>) -> u32 {
    match character_class {
        // A general's combat fleets cruise 10% faster; collectors and discoverers get no
        // general-purpose speed bonus (theirs apply to cargo and expedition finds instead).
        Some(CharacterClass::General) => speed + speed / 10,
        _ => speed,
    }
}

/// Flight duration in seconds at a given throttle (1-10, i.e. 10%-100%), following the classic
/// OGame formula: higher throttle trades fuel for time down to a floor near 10% of the unthrottled
/// duration.
pub fn flight_duration(distance: u32, speed: u32, throttle: u8) -> i64 {
    if speed == 0 {
        return i64::MAX;
    }
    let throttle_fraction = (throttle.clamp(1, 10) as f64) / 10.0;
    let raw = 10.0 + 3500.0 / throttle_fraction * ((distance as f64 * 10.0) / speed as f64).sqrt();
    raw.round() as i64
}

/// Cargo capacity of a fleet, summing each ship's base hold (no class bonus modelled here: only
/// collectors get a cargo bonus and it is applied by the caller against the planet-wide total,
/// not per ship, matching `Engine.cargo_capacity`).
pub fn cargo_capacity(ships: &ShipGroup, character_class: Option<CharacterClass>) -> u64 {
    let base = ships.cargo_capacity();
    match character_class {
        Some(CharacterClass::Collector) => base + base / 4,
        _ => base,
    }
}

/// Deuterium burned for the whole fleet to cover `distance` at the given throttle, summed ship by
/// ship since each ship type burns fuel independently of the others in the same fleet.
pub fn fuel_consumption(ships: &ShipGroup, distance: u32, throttle: u8) -> u64 {
    let throttle_fraction = (throttle.clamp(1, 10) as f64) / 10.0;
    ships
        .0
        .iter()
        .map(|(&ship, &count)| {
            let data = ship.as_data();
            let per_ship = data.base_fuel_consumption as f64 * distance as f64 / 35_000.0
                * (throttle_fraction * 0.5 + 0.5);
            (per_ship.ceil() as u64) * count as u64
        })
        .sum()
}

/// Estimated number of expedition "finds" a fleet can bring back before running out of find
/// slots, a coarse stand-in for `Engine.max_expedition_find` used only to annotate notifications.
pub fn max_expedition_finds(research: &Research) -> u8 {
    1 + (research.level(Technology::Astrophysics) / 3).min(4) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::coordinates::BodyType;

    #[test]
    fn test_distance_prioritises_galaxy_over_system_over_position() {
        let a = Coordinates::new(1, 1, 1, BodyType::Planet);
        let same_galaxy_diff_system = Coordinates::new(1, 3, 1, BodyType::Planet);
        let diff_galaxy = Coordinates::new(2, 1, 1, BodyType::Planet);
        assert_eq!(distance(a, a), 5);
        assert!(distance(a, diff_galaxy) > distance(a, same_galaxy_diff_system));
    }

    #[test]
    fn test_flight_duration_decreases_as_speed_increases() {
        let slow = flight_duration(10_000, 5_000, 10);
        let fast = flight_duration(10_000, 15_000, 10);
        assert!(fast < slow);
    }

    #[test]
    fn test_flight_duration_at_lower_throttle_takes_longer() {
        let full = flight_duration(10_000, 10_000, 10);
        let half = flight_duration(10_000, 10_000, 5);
        assert!(half > full);
    }
}
