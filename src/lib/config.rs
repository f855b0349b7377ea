use std::collections::HashMap;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::{
    game::{
        coordinates::{Coordinates, BodyType},
        fleet::movement::ShipGroup,
        resource::Cargo,
    },
    lib::error::ConfigError,
};

fn default_sleep_min() -> u64 { 600 }
fn default_sleep_max() -> u64 { 900 }
fn default_min_time_before_attack() -> u64 { 120 }
fn default_max_time_before_attack() -> u64 { 180 }
fn default_max_return_flight_time() -> u64 { 600 }
fn default_harvest_expedition_debris() -> bool { true }
fn default_harvest_speed() -> u8 { 10 }
fn default_request_timeout() -> u64 { 10 }
fn default_delay_between_requests() -> u64 { 1 }
fn default_repeat() -> RepeatCount { RepeatCount::Forever }
fn default_speed() -> u8 { 10 }
fn default_holding_time() -> u32 { 1 }

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_sleep_min")]
    pub sleep_min: u64,
    #[serde(default = "default_sleep_max")]
    pub sleep_max: u64,
    #[serde(default = "default_min_time_before_attack")]
    pub min_time_before_attack_to_act: u64,
    #[serde(default = "default_max_time_before_attack")]
    pub max_time_before_attack_to_act: u64,
    #[serde(default)]
    pub try_recalling_saved_fleet: bool,
    #[serde(default = "default_max_return_flight_time")]
    pub max_return_flight_time: u64,
    #[serde(default = "default_harvest_expedition_debris")]
    pub harvest_expedition_debris: bool,
    #[serde(default = "default_harvest_speed")]
    pub harvest_speed: u8,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default = "default_delay_between_requests")]
    pub delay_between_requests: u64,
    /// A list rather than a map: expedition slots are addressed by stable index so that runtime
    /// state (repeat counters, outbound flags) carried alongside `Config` stays aligned across
    /// decision-loop passes, which a `HashMap`'s iteration order would not guarantee.
    #[serde(default)]
    pub expeditions: Vec<ExpeditionConfig>,
    #[serde(default)]
    pub listeners: HashMap<String, ListenerConfig>,
    pub remote: RemoteConfig,
}

/// Connection details for the remote game client. Kept separate from the rest of `Config`
/// because it is the one sub-table with no sensible default: without a server and session there
/// is nothing for the bot to act on.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub session_token: String,
}

impl Default for RemoteConfig {
    /// Only meaningful for tests, which use a stub client and never dereference these fields;
    /// `Config::load` always requires `[remote]` to be present in the TOML file.
    fn default() -> Self {
        RemoteConfig { base_url: String::new(), session_token: String::new() }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sleep_min: default_sleep_min(),
            sleep_max: default_sleep_max(),
            min_time_before_attack_to_act: default_min_time_before_attack(),
            max_time_before_attack_to_act: default_max_time_before_attack(),
            try_recalling_saved_fleet: true,
            max_return_flight_time: default_max_return_flight_time(),
            harvest_expedition_debris: default_harvest_expedition_debris(),
            harvest_speed: default_harvest_speed(),
            request_timeout: default_request_timeout(),
            delay_between_requests: default_delay_between_requests(),
            expeditions: Vec::new(),
            listeners: HashMap::new(),
            remote: RemoteConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExpeditionConfig {
    pub origin: Coordinates,
    pub origin_type: BodyType,
    pub dest: Coordinates,
    pub ships: ShipGroup,
    #[serde(default)]
    pub cargo: Cargo,
    #[serde(default = "default_speed")]
    pub speed: u8,
    #[serde(default = "default_holding_time")]
    pub holding_time: u32,
    #[serde(default = "default_repeat")]
    pub repeat: RepeatCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RepeatCount {
    Times(u32),
    Forever,
}

impl RepeatCount {
    pub fn is_exhausted(self) -> bool {
        matches!(self, RepeatCount::Times(0))
    }

    pub fn decrement(self) -> Self {
        match self {
            RepeatCount::Times(n) => RepeatCount::Times(n.saturating_sub(1)),
            RepeatCount::Forever => RepeatCount::Forever,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListenerConfig {
    Log,
    Webhook { url: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_count_decrements_to_exhaustion() {
        let r = RepeatCount::Times(2);
        let r = r.decrement();
        assert_eq!(r, RepeatCount::Times(1));
        let r = r.decrement();
        assert!(r.is_exhausted());
    }

    #[test]
    fn test_repeat_count_forever_never_decrements() {
        let r = RepeatCount::Forever;
        assert_eq!(r.decrement(), RepeatCount::Forever);
        assert!(!r.is_exhausted());
    }
}
