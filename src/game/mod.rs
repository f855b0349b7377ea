pub mod bot;
pub mod cache;
pub mod coordinates;
pub mod defence;
pub mod expedition;
pub mod fleet;
pub mod mission;
pub mod notification;
pub mod planet;
pub mod remote;
pub mod research;
pub mod resource;
pub mod scheduler;
pub mod ship;
