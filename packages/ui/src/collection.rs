//! Subscribing components to an entity cache.
//!
//! [`use_collection`] registers the calling component on the cache with a
//! listener that schedules a re-render, kicks off the first fetch when the
//! cache asks for one, and runs the component's polling loop. The
//! subscription is released when the component unmounts.

use std::rc::Rc;
use std::sync::Arc;

use api::{ApiError, HttpTransport, Resource};
use dioxus::core::schedule_update;
use dioxus::prelude::*;
use store::{CacheEvent, Entity, Listener, Note, QuerySnapshot, SubscriptionOptions, User};

use crate::platform::{self, TechNotes};
use crate::provider::use_app;

pub type Snapshot<E> = QuerySnapshot<E, ApiError>;

/// Picks one resource off the client, e.g. `TechNotes::notes`.
pub type SelectResource<E> = for<'a> fn(&'a TechNotes) -> Resource<'a, E, HttpTransport>;

pub fn use_collection<E: Entity>(resource: SelectResource<E>, options: SubscriptionOptions) -> Snapshot<E> {
    let app = use_app();
    let polling = options.polling_interval;

    let subscription = use_hook(|| {
        let update = schedule_update();
        let listener: Listener = Arc::new(move |_: &CacheEvent| update());
        Rc::new(resource(&app).subscribe(options, listener))
    });

    use_hook(|| {
        if subscription.needs_initial_fetch() {
            let app = app.clone();
            spawn(async move {
                resource(&app).refetch().await;
            });
        }
    });

    use_future({
        let app = app.clone();
        move || {
            let app = app.clone();
            async move {
                let Some(interval) = polling else {
                    return;
                };
                loop {
                    platform::sleep(interval).await;
                    tracing::debug!(kind = %E::KIND, "polling");
                    resource(&app).refetch().await;
                }
            }
        }
    });

    resource(&app).cache().snapshot()
}

/// Notes with the configured polling and focus behaviour.
pub fn use_notes() -> Snapshot<Note> {
    let options = use_app().config().notes_options();
    use_collection(TechNotes::notes, options)
}

/// Users with the configured polling and focus behaviour.
pub fn use_users() -> Snapshot<User> {
    let options = use_app().config().users_options();
    use_collection(TechNotes::users, options)
}
