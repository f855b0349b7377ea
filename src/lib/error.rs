use std::fmt::{Display, Formatter, Result as FmtResult};

/// Aggregate error type for everything that can go wrong while driving the decision loop.
///
/// Please prefer this type over the more specific ones in the subsystems, at least at the
/// boundary between the decision loop and its callers: it gets extended as we plug in more
/// transports or config formats.
#[derive(Debug)]
pub enum BotError {
    Transport(reqwest::Error),
    Config(ConfigError),
    Internal(InternalError),
}

impl From<reqwest::Error> for BotError {
    fn from(error: reqwest::Error) -> Self { Self::Transport(error) }
}

impl From<ConfigError> for BotError {
    fn from(error: ConfigError) -> Self { Self::Config(error) }
}

impl From<InternalError> for BotError {
    fn from(error: InternalError) -> Self { Self::Internal(error) }
}

impl Display for BotError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult { write!(f, "{:?}", self) }
}

impl std::error::Error for BotError {}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self { Self::Io(error) }
}

impl From<toml::de::Error> for ConfigError {
    fn from(error: toml::de::Error) -> Self { Self::Parse(error) }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult { write!(f, "{:?}", self) }
}

impl std::error::Error for ConfigError {}

/// Domain-level failures raised by the subsystems. Most of these are caught at the subsystem
/// boundary and folded into the `error` field of a notification rather than propagated; only
/// the ones reachable from cache/transport plumbing ever reach [`BotError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    /// A planet/moon id referenced by an intent or event is not one of the player's own bodies.
    AccessDenied,
    /// An id could not be resolved against current remote state.
    NotFound(&'static str),
    /// No ships present at the origin for a requested dispatch.
    FleetEmpty,
    /// All fleet slots are currently used.
    NoFreeFleetSlot,
    /// All expedition slots are currently used.
    NoFreeExpeditionSlot,
    /// The chosen route's fuel consumption exceeds available deuterium.
    InsufficientFuel,
    /// Required resources are not present on the origin planet.
    InsufficientResources,
    /// Requested cargo exceeds the fleet's carrying capacity.
    CargoExceedsCapacity,
    /// No escape route could be ranked, or none had affordable fuel.
    NoEscapeRoute,
    /// `send-fleet` returned successfully but the resulting movement could not be matched
    /// unambiguously (zero or multiple candidates).
    DispatchVerificationFailed,
    /// The origin is currently the destination of a hostile fleet; the dispatch was skipped.
    UnderHostileAttack,
    /// The remote client could not complete the request (network failure, non-2xx response,
    /// unparseable body). Carries only a message: the underlying `reqwest::Error` is not `Clone`,
    /// and this variant has to stay comparable for tests the same way the others are.
    RemoteUnavailable(String),
}

impl Display for InternalError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            InternalError::AccessDenied => write!(f, "origin is not one of the player's own bodies"),
            InternalError::NotFound(what) => write!(f, "{} not found", what),
            InternalError::FleetEmpty => write!(f, "no ships"),
            InternalError::NoFreeFleetSlot => write!(f, "no free fleet slots"),
            InternalError::NoFreeExpeditionSlot => write!(f, "no free expedition slots"),
            InternalError::InsufficientFuel => write!(f, "not enough fuel"),
            InternalError::InsufficientResources => write!(f, "not enough resources"),
            InternalError::CargoExceedsCapacity => write!(f, "cargo exceeds capacity"),
            InternalError::NoEscapeRoute => write!(f, "no escape route"),
            InternalError::DispatchVerificationFailed => write!(f, "could not verify dispatched fleet"),
            InternalError::UnderHostileAttack => write!(f, "origin is under hostile attack"),
            InternalError::RemoteUnavailable(message) => write!(f, "remote client error: {}", message),
        }
    }
}

impl std::error::Error for InternalError {}

pub type Result<T> = std::result::Result<T, BotError>;
