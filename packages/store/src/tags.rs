//! Cache tags tie a cached query to the records it depends on.
//!
//! A collection query provides `{kind, LIST}` plus one tag per id it holds.
//! Creating a record invalidates `LIST`; updating or deleting invalidates the
//! record's own tag.

use std::collections::HashSet;

use crate::entity::{Entity, EntityCollection, EntityKind};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TagId {
    List,
    Id(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheTag {
    pub kind: EntityKind,
    pub id: TagId,
}

impl CacheTag {
    pub fn list(kind: EntityKind) -> Self {
        Self {
            kind,
            id: TagId::List,
        }
    }

    pub fn id(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: TagId::Id(id.into()),
        }
    }
}

impl std::fmt::Display for CacheTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.id {
            TagId::List => write!(f, "{}:LIST", self.kind),
            TagId::Id(id) => write!(f, "{}:{}", self.kind, id),
        }
    }
}

/// Tags provided by a collection query result. A missing result still
/// provides `LIST` so that a create retries a failed fetch.
pub fn provided_tags<E: Entity>(collection: Option<&EntityCollection<E>>) -> HashSet<CacheTag> {
    let mut tags = HashSet::from([CacheTag::list(E::KIND)]);
    if let Some(collection) = collection {
        tags.extend(collection.ids().iter().map(|id| CacheTag::id(E::KIND, id.clone())));
    }
    tags
}
