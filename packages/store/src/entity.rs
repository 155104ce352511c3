//! # Normalized entity collections
//!
//! The server returns plain JSON arrays whose records carry their id in a
//! `_id` field. [`EntityCollection::from_response`] turns such an array into an
//! ordered id list plus an id → record map, copying `_id` into a uniform `id`
//! field first (see [`alias_ids`]).
//!
//! Invariants kept by every constructor:
//!
//! - every id in [`ids`](EntityCollection::ids) has an entry in the map;
//! - ids are unique, the first occurrence of a duplicate wins.
//!
//! A response that is not an array is treated as an empty collection.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Server-side id field.
pub const SERVER_ID_FIELD: &str = "_id";

/// Which collection a record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Note,
    User,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Note => "Note",
            EntityKind::User => "User",
        }
    }

    /// REST collection path.
    pub fn path(&self) -> &'static str {
        match self {
            EntityKind::Note => "/notes",
            EntityKind::User => "/users",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record type that can live in an [`EntityCollection`].
pub trait Entity: Clone + std::fmt::Debug + PartialEq + DeserializeOwned + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Body sent to create a record.
    type Draft: Serialize;
    /// Body sent to update a record. Carries the id of the target.
    type Patch: Serialize;

    fn id(&self) -> &str;

    fn patch_id(patch: &Self::Patch) -> &str;
}

/// `{ ids, entities }` view of a server collection.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityCollection<E> {
    ids: Vec<String>,
    entities: HashMap<String, E>,
}

impl<E> Default for EntityCollection<E> {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            entities: HashMap::new(),
        }
    }
}

impl<E: Entity> EntityCollection<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace-all constructor. Keeps input order; later duplicates are ignored.
    pub fn from_records(records: impl IntoIterator<Item = E>) -> Self {
        let mut collection = Self::default();
        for record in records {
            let id = record.id().to_string();
            if collection.entities.contains_key(&id) {
                tracing::debug!(kind = %E::KIND, %id, "ignoring duplicate id");
                continue;
            }
            collection.ids.push(id.clone());
            collection.entities.insert(id, record);
        }
        collection
    }

    /// Normalize a raw `GET` response body.
    pub fn from_response(raw: Value) -> Result<Self, serde_json::Error> {
        let Some(records) = alias_ids(raw) else {
            tracing::warn!(kind = %E::KIND, "expected an array of records, using an empty collection");
            return Ok(Self::default());
        };

        let records = records
            .into_iter()
            .map(|record| serde_json::from_value::<E>(Value::Object(record)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_records(records))
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// Records in id order.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.ids.iter().filter_map(|id| self.entities.get(id))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Copy each record's `_id` into `id`.
///
/// Returns `None` when `raw` is not an array. Elements that are not objects or
/// carry no id at all are dropped with a warning.
pub fn alias_ids(raw: Value) -> Option<Vec<Map<String, Value>>> {
    let Value::Array(items) = raw else {
        return None;
    };

    let records = items
        .into_iter()
        .filter_map(|item| {
            let Value::Object(mut record) = item else {
                tracing::warn!("skipping non-object element in collection response");
                return None;
            };
            match record.get(SERVER_ID_FIELD).cloned() {
                Some(id) => {
                    record.insert("id".to_string(), id);
                }
                None if record.contains_key("id") => {}
                None => {
                    tracing::warn!("skipping record without an id");
                    return None;
                }
            }
            Some(record)
        })
        .collect();
    Some(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Note, User};
    use serde_json::json;

    #[test]
    fn test_alias_keeps_server_id_and_adds_id() {
        let records = alias_ids(json!([{ "_id": "a", "title": "x" }])).unwrap();
        assert_eq!(
            Value::Object(records[0].clone()),
            json!({ "id": "a", "_id": "a", "title": "x" })
        );
    }

    #[test]
    fn test_normalizes_note_array() {
        let notes = EntityCollection::<Note>::from_response(json!([{ "_id": "a", "title": "x" }])).unwrap();
        assert_eq!(notes.ids(), ["a".to_string()]);
        let note = notes.get("a").unwrap();
        assert_eq!(note.id, "a");
        assert_eq!(note.title, "x");
    }

    #[test]
    fn test_non_array_is_empty() {
        let users = EntityCollection::<User>::from_response(json!({ "message": "No users found" })).unwrap();
        assert!(users.is_empty());

        let users = EntityCollection::<User>::from_response(Value::Null).unwrap();
        assert!(users.is_empty());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let notes = EntityCollection::<Note>::from_response(json!([
            { "_id": "a", "title": "first" },
            { "_id": "b", "title": "other" },
            { "_id": "a", "title": "second" },
        ]))
        .unwrap();

        assert_eq!(notes.ids(), ["a".to_string(), "b".to_string()]);
        assert_eq!(notes.get("a").unwrap().title, "first");
        assert!(notes.ids().iter().all(|id| notes.contains(id)));
    }

    #[test]
    fn test_iter_follows_server_order() {
        let notes = EntityCollection::<Note>::from_response(json!([
            { "_id": "c", "title": "3" },
            { "_id": "a", "title": "1" },
        ]))
        .unwrap();
        let titles: Vec<_> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["3", "1"]);
    }

    #[test]
    fn test_malformed_record_is_an_error() {
        let result = EntityCollection::<Note>::from_response(json!([{ "_id": "a", "completed": "yes" }]));
        assert!(result.is_err());
    }
}
