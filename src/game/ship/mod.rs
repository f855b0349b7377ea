pub mod model;

pub use model::{Ship, ShipModel};
