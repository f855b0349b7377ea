use serde::{Deserialize, Serialize};
use crate::game::research::Technology;

/// Every ship type the remote game can report in a fleet. Combat ships are modelled only far
/// enough to compute cargo capacity and speed; weapons/shield/armour values are out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ship {
    SmallCargo,
    LargeCargo,
    LightFighter,
    HeavyFighter,
    Cruiser,
    Battleship,
    ColonyShip,
    Recycler,
    EspionageProbe,
    Bomber,
    Destroyer,
    Deathstar,
    Battlecruiser,
    Reaper,
    Pathfinder,
}

/// A drive a ship can be equipped with, and the research level required to unlock it. Speed is
/// the ship's base speed (distance/hour at speed 100%) once that drive is installed.
#[derive(Debug, Clone, Copy)]
pub struct Drive {
    pub technology: Technology,
    pub min_level: u16,
    pub speed: u32,
}

/// Static catalogue data for one ship type: cargo capacity, structural integrity (used for
/// expedition find-size estimation) and the drives it can be fitted with, cheapest first.
#[derive(Debug, Clone, Copy)]
pub struct ShipModel {
    pub cargo_capacity: u32,
    pub structural_integrity: u32,
    pub base_fuel_consumption: u32,
    pub drives: &'static [Drive],
}

impl Ship {
    /// Mirrors the teacher's `ShipModelCategory::as_data()` catalogue-by-match pattern: static
    /// game data kept as code rather than loaded from a table, since it never changes at runtime.
    /// Values follow `ogame.game.const.Ship`/`ships.py`.
    pub fn as_data(self) -> ShipModel {
        use Technology::*;
        match self {
            Ship::SmallCargo => ShipModel {
                cargo_capacity: 5000,
                structural_integrity: 4000,
                base_fuel_consumption: 10,
                drives: &[
                    Drive { technology: CombustionDrive, min_level: 0, speed: 5000 },
                    Drive { technology: ImpulseDrive, min_level: 5, speed: 10000 },
                ],
            },
            Ship::LargeCargo => ShipModel {
                cargo_capacity: 25000,
                structural_integrity: 12000,
                base_fuel_consumption: 50,
                drives: &[Drive { technology: CombustionDrive, min_level: 0, speed: 7500 }],
            },
            Ship::LightFighter => ShipModel {
                cargo_capacity: 50,
                structural_integrity: 4000,
                base_fuel_consumption: 20,
                drives: &[Drive { technology: CombustionDrive, min_level: 0, speed: 12500 }],
            },
            Ship::HeavyFighter => ShipModel {
                cargo_capacity: 100,
                structural_integrity: 10000,
                base_fuel_consumption: 75,
                drives: &[Drive { technology: ImpulseDrive, min_level: 2, speed: 10000 }],
            },
            Ship::Cruiser => ShipModel {
                cargo_capacity: 800,
                structural_integrity: 27000,
                base_fuel_consumption: 300,
                drives: &[Drive { technology: ImpulseDrive, min_level: 4, speed: 15000 }],
            },
            Ship::Battleship => ShipModel {
                cargo_capacity: 1500,
                structural_integrity: 60000,
                base_fuel_consumption: 500,
                drives: &[Drive { technology: HyperspaceDrive, min_level: 4, speed: 10000 }],
            },
            Ship::ColonyShip => ShipModel {
                cargo_capacity: 7500,
                structural_integrity: 30000,
                base_fuel_consumption: 1000,
                drives: &[Drive { technology: ImpulseDrive, min_level: 3, speed: 2500 }],
            },
            Ship::Recycler => ShipModel {
                cargo_capacity: 20000,
                structural_integrity: 16000,
                base_fuel_consumption: 300,
                drives: &[
                    Drive { technology: CombustionDrive, min_level: 0, speed: 2000 },
                    Drive { technology: ImpulseDrive, min_level: 17, speed: 4000 },
                    Drive { technology: HyperspaceDrive, min_level: 15, speed: 6000 },
                ],
            },
            Ship::EspionageProbe => ShipModel {
                cargo_capacity: 5,
                structural_integrity: 1000,
                base_fuel_consumption: 1,
                drives: &[Drive { technology: CombustionDrive, min_level: 0, speed: 100000000 }],
            },
            Ship::Bomber => ShipModel {
                cargo_capacity: 500,
                structural_integrity: 75000,
                base_fuel_consumption: 700,
                drives: &[
                    Drive { technology: ImpulseDrive, min_level: 8, speed: 4000 },
                    Drive { technology: HyperspaceDrive, min_level: 8, speed: 5000 },
                ],
            },
            Ship::Destroyer => ShipModel {
                cargo_capacity: 2000,
                structural_integrity: 110000,
                base_fuel_consumption: 1000,
                drives: &[Drive { technology: HyperspaceDrive, min_level: 6, speed: 5000 }],
            },
            Ship::Deathstar => ShipModel {
                cargo_capacity: 1000000,
                structural_integrity: 9000000,
                base_fuel_consumption: 1,
                drives: &[Drive { technology: HyperspaceDrive, min_level: 7, speed: 100 }],
            },
            Ship::Battlecruiser => ShipModel {
                cargo_capacity: 750,
                structural_integrity: 70000,
                base_fuel_consumption: 250,
                drives: &[Drive { technology: HyperspaceDrive, min_level: 5, speed: 10000 }],
            },
            Ship::Reaper => ShipModel {
                cargo_capacity: 10000,
                structural_integrity: 140000,
                base_fuel_consumption: 1100,
                drives: &[Drive { technology: HyperspaceDrive, min_level: 9, speed: 7000 }],
            },
            Ship::Pathfinder => ShipModel {
                cargo_capacity: 10000,
                structural_integrity: 23000,
                base_fuel_consumption: 300,
                drives: &[Drive { technology: HyperspaceDrive, min_level: 2, speed: 12000 }],
            },
        }
    }

    /// The fastest drive the given research levels unlock, matching `Engine._get_drive`'s
    /// best-available-drive selection (highest `min_level` satisfied wins, not first-listed).
    pub fn best_drive(self, research_levels: impl Fn(Technology) -> u16) -> Drive {
        let data = self.as_data();
        *data
            .drives
            .iter()
            .filter(|d| research_levels(d.technology) >= d.min_level)
            .max_by_key(|d| d.min_level)
            .unwrap_or(&data.drives[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_drive_picks_highest_satisfied_level() {
        let ship = Ship::SmallCargo;
        let drive = ship.best_drive(|t| if t == Technology::ImpulseDrive { 5 } else { 0 });
        assert_eq!(drive.technology, Technology::ImpulseDrive);
        assert_eq!(drive.speed, 10000);
    }

    #[test]
    fn test_best_drive_falls_back_to_base() {
        let ship = Ship::SmallCargo;
        let drive = ship.best_drive(|_| 0);
        assert_eq!(drive.technology, Technology::CombustionDrive);
    }
}
