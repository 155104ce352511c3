//! Client-side state for techNotes: normalized entity collections, the
//! tag-invalidated entity cache, domain records, and the durable
//! "trust this device" preference.

pub mod cache;
pub mod entity;
pub mod error;
pub mod models;
pub mod persist;
pub mod tags;

mod memory;
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::LocalStorage;

pub use cache::{
    CacheEvent, EntityCache, FetchTicket, Listener, QuerySnapshot, QueryStatus, Subscription,
    SubscriptionOptions,
};
pub use entity::{Entity, EntityCollection, EntityKind};
pub use error::StoreError;
pub use models::{NewNote, NewUser, Note, NoteUpdate, Role, User, UserUpdate};
pub use persist::{KeyValueStore, PersistPreference, PERSIST_KEY};
pub use tags::{CacheTag, TagId};
