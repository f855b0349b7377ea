use std::{
    marker::PhantomData,
    hash::{Hasher, Hash},
    fmt::{self, Debug, Display, Formatter},
};
use serde::{Deserialize, Serialize};

/// A type-tagged identifier. `T` is never constructed, it only pins an `Id<T>` to the entity it
/// identifies so that e.g. a `FleetId` can never be mistaken for a `PlanetId` at compile time.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T> {
    value: uuid::Uuid,
    #[serde(skip)]
    _phantom: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new() -> Self {
        Id { value: uuid::Uuid::new_v4(), _phantom: PhantomData }
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Debug for Id<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { Debug::fmt(&self.value, f) }
}

impl<T> Display for Id<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { Display::fmt(&self.value, f) }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self { Id { value: self.value, _phantom: PhantomData } }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool { self.value.eq(&other.value) }
}
impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> { self.value.partial_cmp(&other.value) }
}
impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering { self.value.cmp(&other.value) }
}

impl<T> Hash for Id<T> {
    fn hash<H>(&self, state: &mut H) where H: Hasher { self.value.hash(state) }
}

impl<T> From<uuid::Uuid> for Id<T> {
    fn from(value: uuid::Uuid) -> Self { Id { value, _phantom: PhantomData } }
}

impl<T> From<Id<T>> for uuid::Uuid {
    fn from(id: Id<T>) -> Self { id.value }
}
