//! # Resource — an entity cache wired to its REST collection
//!
//! [`Resource`] borrows the shared [`ReauthClient`] and one
//! [`EntityCache`], and implements the read and write operations for that
//! entity type:
//!
//! | Operation | Request | Cache effect |
//! |-----------|---------|--------------|
//! | [`refetch`](Resource::refetch) | `GET /notes` | replaces the snapshot (or records the error) |
//! | [`create`](Resource::create) | `POST /notes` | invalidates `Note:LIST` |
//! | [`update`](Resource::update) | `PATCH /notes` | invalidates `Note:<id>` |
//! | [`delete`](Resource::delete) | `DELETE /notes` `{id}` | invalidates `Note:<id>` |
//!
//! An invalidated query with live subscribers is refetched right away; with
//! no subscribers it stays stale until the next subscription asks for data.

use serde_json::{json, Value};

use store::{
    CacheTag, Entity, EntityCache, EntityCollection, Listener, QuerySnapshot, Subscription,
    SubscriptionOptions,
};

use crate::auth::ReauthClient;
use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};

pub struct Resource<'a, E, T> {
    client: &'a ReauthClient<T>,
    cache: &'a EntityCache<E, ApiError>,
}

impl<'a, E: Entity, T: Transport> Resource<'a, E, T> {
    pub fn new(client: &'a ReauthClient<T>, cache: &'a EntityCache<E, ApiError>) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &'a EntityCache<E, ApiError> {
        self.cache
    }

    /// One `GET` of the whole collection, normalized. Does not touch the cache.
    pub async fn fetch_collection(&self) -> Result<EntityCollection<E>, ApiError> {
        let body = self.client.call(&ApiRequest::get(E::KIND.path())).await?;
        Ok(EntityCollection::from_response(body)?)
    }

    /// Fetch into the cache. A newer refetch started meanwhile wins.
    pub async fn refetch(&self) -> QuerySnapshot<E, ApiError> {
        let ticket = self.cache.begin_fetch();
        let outcome = self.fetch_collection().await;
        if let Err(error) = &outcome {
            tracing::warn!(kind = %E::KIND, %error, "collection fetch failed");
        }
        self.cache.complete_fetch(ticket, outcome);
        self.cache.snapshot()
    }

    /// Fetch unless the cache already holds fresh data. `force` always fetches.
    pub async fn prefetch(&self, force: bool) {
        if force || self.cache.needs_fetch() {
            self.refetch().await;
        }
    }

    pub fn subscribe(&self, options: SubscriptionOptions, listener: Listener) -> Subscription {
        self.cache.subscribe(options, listener)
    }

    /// Window regained focus.
    pub async fn on_focus(&self) {
        if self.cache.refetches_on_focus() {
            self.refetch().await;
        }
    }

    pub async fn create(&self, draft: &E::Draft) -> Result<Option<String>, ApiError> {
        let body = serde_json::to_value(draft)?;
        let reply = self.client.call(&ApiRequest::post(E::KIND.path(), body)).await?;
        self.invalidate(&[CacheTag::list(E::KIND)]).await;
        Ok(server_message(&reply))
    }

    pub async fn update(&self, patch: &E::Patch) -> Result<Option<String>, ApiError> {
        let id = E::patch_id(patch).to_string();
        let body = serde_json::to_value(patch)?;
        let reply = self.client.call(&ApiRequest::patch(E::KIND.path(), body)).await?;
        self.invalidate(&[CacheTag::id(E::KIND, id)]).await;
        Ok(server_message(&reply))
    }

    pub async fn delete(&self, id: &str) -> Result<Option<String>, ApiError> {
        let reply = self
            .client
            .call(&ApiRequest::delete(E::KIND.path(), json!({ "id": id })))
            .await?;
        self.invalidate(&[CacheTag::id(E::KIND, id)]).await;
        Ok(server_message(&reply))
    }

    async fn invalidate(&self, tags: &[CacheTag]) {
        if self.cache.invalidate(tags) && self.cache.subscriber_count() > 0 {
            self.refetch().await;
        }
    }
}

fn server_message(reply: &Value) -> Option<String> {
    reply.get("message").and_then(Value::as_str).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CredentialStore;
    use crate::remote::RemoteClient;
    use crate::testing::ScriptedTransport;
    use std::sync::Arc;
    use store::{CacheEvent, NewNote, Note, NoteUpdate, QueryStatus, User};

    fn client(transport: &ScriptedTransport) -> ReauthClient<ScriptedTransport> {
        let credentials = CredentialStore::new();
        credentials.set("token");
        ReauthClient::new(RemoteClient::new(transport.clone(), credentials), 1)
    }

    fn quiet() -> Listener {
        Arc::new(|_: &CacheEvent| {})
    }

    fn note(id: &str, username: &str) -> Value {
        json!({ "_id": id, "user": format!("u-{username}"), "username": username, "title": id, "text": "", "completed": false })
    }

    #[tokio::test]
    async fn test_refetch_fills_cache() {
        let transport = ScriptedTransport::new();
        transport.reply("GET /notes", 200, json!([note("a", "alice"), note("b", "bob")]));
        let client = client(&transport);
        let cache = EntityCache::<Note, ApiError>::new();

        let snapshot = Resource::new(&client, &cache).refetch().await;
        assert_eq!(snapshot.status, QueryStatus::Fulfilled);
        assert_eq!(*cache.select_ids(), vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_non_array_degrades_to_empty() {
        let transport = ScriptedTransport::new();
        transport.reply("GET /users", 200, json!({ "message": "unexpected" }));
        let client = client(&transport);
        let cache = EntityCache::<User, ApiError>::new();

        let snapshot = Resource::new(&client, &cache).refetch().await;
        assert!(snapshot.is_success());
        assert!(snapshot.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_refetch_keeps_previous_collection() {
        let transport = ScriptedTransport::new();
        transport.reply("GET /notes", 200, json!([note("a", "alice")]));
        transport.reply("GET /notes", 400, json!({ "message": "No notes found" }));
        let client = client(&transport);
        let cache = EntityCache::<Note, ApiError>::new();
        let notes = Resource::new(&client, &cache);

        notes.refetch().await;
        let snapshot = notes.refetch().await;
        assert!(snapshot.is_error());
        assert_eq!(snapshot.error.unwrap().to_string(), "No notes found");
        assert_eq!(snapshot.data.unwrap().ids(), ["a".to_string()]);
    }

    #[tokio::test]
    async fn test_create_refetches_subscribed_list() {
        let transport = ScriptedTransport::new();
        transport.reply("GET /notes", 200, json!([note("a", "alice")]));
        transport.reply("POST /notes", 201, json!({ "message": "New note created" }));
        transport.reply("GET /notes", 200, json!([note("a", "alice"), note("b", "alice")]));
        let client = client(&transport);
        let cache = EntityCache::<Note, ApiError>::new();
        let notes = Resource::new(&client, &cache);
        let _sub = notes.subscribe(SubscriptionOptions::default(), quiet());

        notes.refetch().await;
        let message = notes
            .create(&NewNote {
                user: "u-alice".into(),
                title: "b".into(),
                text: String::new(),
            })
            .await
            .unwrap();

        assert_eq!(message.as_deref(), Some("New note created"));
        assert_eq!(transport.count("GET /notes"), 2);
        assert_eq!(*cache.select_ids(), vec!["a".to_string(), "b".to_string()]);
        let posted = transport.last("POST /notes").unwrap().body.unwrap();
        assert_eq!(posted["title"], "b");
    }

    #[tokio::test]
    async fn test_update_refetches_only_when_entity_is_cached() {
        let transport = ScriptedTransport::new();
        transport.reply("GET /notes", 200, json!([note("a", "alice")]));
        transport.reply("PATCH /notes", 200, json!({ "message": "updated" }));
        transport.reply("PATCH /notes", 200, json!({ "message": "updated" }));
        let mut renamed = note("a", "alice");
        renamed["title"] = json!("renamed");
        transport.reply("GET /notes", 200, json!([renamed]));
        let client = client(&transport);
        let cache = EntityCache::<Note, ApiError>::new();
        let notes = Resource::new(&client, &cache);
        let _sub = notes.subscribe(SubscriptionOptions::default(), quiet());
        notes.refetch().await;

        let patch = |id: &str| NoteUpdate {
            id: id.into(),
            user: "u-alice".into(),
            title: "renamed".into(),
            text: String::new(),
            completed: true,
        };

        // not part of the cached collection: no refetch
        notes.update(&patch("zzz")).await.unwrap();
        assert_eq!(transport.count("GET /notes"), 1);

        notes.update(&patch("a")).await.unwrap();
        assert_eq!(transport.count("GET /notes"), 2);
        assert_eq!(cache.select_by_id("a").unwrap().title, "renamed");
    }

    #[tokio::test]
    async fn test_delete_removes_id_after_refetch() {
        let transport = ScriptedTransport::new();
        transport.reply("GET /users", 200, json!([{ "_id": "u1", "username": "alice" }, { "_id": "u2", "username": "bob" }]));
        transport.reply("DELETE /users", 200, json!({ "message": "User alice deleted" }));
        transport.reply("GET /users", 200, json!([{ "_id": "u2", "username": "bob" }]));
        let client = client(&transport);
        let cache = EntityCache::<User, ApiError>::new();
        let users = Resource::new(&client, &cache);
        let _sub = users.subscribe(SubscriptionOptions::default(), quiet());

        users.refetch().await;
        users.delete("u1").await.unwrap();

        assert_eq!(transport.last("DELETE /users").unwrap().body, Some(json!({ "id": "u1" })));
        let ids = cache.select_ids();
        assert_eq!(*ids, vec!["u2".to_string()]);
        let data = cache.data().unwrap();
        assert!(ids.iter().all(|id| data.contains(id)));
    }

    #[tokio::test]
    async fn test_invalidation_without_subscribers_defers_fetch() {
        let transport = ScriptedTransport::new();
        transport.reply("GET /notes", 200, json!([note("a", "alice")]));
        transport.reply("DELETE /notes", 200, json!({ "message": "deleted" }));
        transport.reply("GET /notes", 200, json!([]));
        let client = client(&transport);
        let cache = EntityCache::<Note, ApiError>::new();
        let notes = Resource::new(&client, &cache);

        notes.refetch().await;
        notes.delete("a").await.unwrap();
        assert_eq!(transport.count("GET /notes"), 1);
        assert!(cache.snapshot().is_stale);

        let sub = notes.subscribe(SubscriptionOptions::default(), quiet());
        assert!(sub.needs_initial_fetch());
        notes.prefetch(false).await;
        assert!(cache.select_ids().is_empty());
    }

    #[tokio::test]
    async fn test_failed_mutation_does_not_invalidate() {
        let transport = ScriptedTransport::new();
        transport.reply("GET /notes", 200, json!([note("a", "alice")]));
        transport.reply("DELETE /notes", 400, json!({ "message": "Note ID required" }));
        let client = client(&transport);
        let cache = EntityCache::<Note, ApiError>::new();
        let notes = Resource::new(&client, &cache);
        let _sub = notes.subscribe(SubscriptionOptions::default(), quiet());

        notes.refetch().await;
        let err = notes.delete("a").await.unwrap_err();
        assert_eq!(err.to_string(), "Note ID required");
        assert!(!cache.snapshot().is_stale);
        assert_eq!(transport.count("GET /notes"), 1);
    }

    #[tokio::test]
    async fn test_focus_refetch_follows_subscriber_options() {
        let transport = ScriptedTransport::new();
        transport.reply("GET /notes", 200, json!([]));
        let client = client(&transport);
        let cache = EntityCache::<Note, ApiError>::new();
        let notes = Resource::new(&client, &cache);

        let plain = notes.subscribe(SubscriptionOptions::default(), quiet());
        notes.on_focus().await;
        assert_eq!(transport.count("GET /notes"), 0);
        drop(plain);

        let _focus = notes.subscribe(SubscriptionOptions::default().refetch_on_focus(), quiet());
        notes.on_focus().await;
        assert_eq!(transport.count("GET /notes"), 1);
    }
}
