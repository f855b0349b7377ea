pub mod movement;
pub mod query;
pub mod travel;

pub use movement::{FleetDispatch, FleetEvent, FleetMovement, Movement, ShipGroup};
