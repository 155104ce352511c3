//! # Entity cache — one cached collection query with tag invalidation
//!
//! [`EntityCache`] owns the latest [`EntityCollection`] snapshot for one entity
//! type, the tags that snapshot provides, and a set of subscriber callbacks.
//! It performs no I/O: callers announce a fetch with
//! [`begin_fetch`](EntityCache::begin_fetch), perform the request, and hand the
//! outcome back with [`complete_fetch`](EntityCache::complete_fetch).
//!
//! ## Snapshots
//!
//! A successful fetch replaces the collection with a new `Arc`; the previous
//! value is never mutated. A failed fetch records the error and keeps the
//! previous collection.
//!
//! ## Superseded fetches
//!
//! Every fetch gets a [`FetchTicket`]. Only the most recently issued ticket of
//! the current epoch may complete; anything older is dropped on arrival.
//! [`reset`](EntityCache::reset) starts a new epoch, so fetches that were in
//! flight at logout never repopulate the cache.
//!
//! ## Observers
//!
//! Subscribers register a callback and [`SubscriptionOptions`]. They are told
//! about every [`CacheEvent`]. The options are aggregated so the driver knows
//! how often to poll and whether focus should trigger a refetch.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use crate::entity::{Entity, EntityCollection};
use crate::tags::{provided_tags, CacheTag};

/// Callback invoked after the cache changed.
pub type Listener = Arc<dyn Fn(&CacheEvent) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheEvent {
    /// A fetch landed and replaced the collection.
    Updated,
    /// A fetch failed; the previous collection is kept.
    Failed,
    /// A mutation invalidated tags this query provides.
    Invalidated,
    /// The cache was cleared (logout).
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryStatus {
    Uninitialized,
    Pending,
    Fulfilled,
    Rejected,
}

/// Per-subscriber refresh policy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubscriptionOptions {
    pub polling_interval: Option<Duration>,
    pub refetch_on_focus: bool,
    pub refetch_on_mount_or_arg_change: bool,
}

impl SubscriptionOptions {
    pub fn polling(mut self, interval: Duration) -> Self {
        self.polling_interval = Some(interval);
        self
    }

    pub fn refetch_on_focus(mut self) -> Self {
        self.refetch_on_focus = true;
        self
    }

    pub fn refetch_on_mount(mut self) -> Self {
        self.refetch_on_mount_or_arg_change = true;
        self
    }
}

/// Identifies one fetch attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
    seq: u64,
}

/// Read-only view of the cache at one point in time.
#[derive(Clone, Debug)]
pub struct QuerySnapshot<E, X> {
    pub data: Option<Arc<EntityCollection<E>>>,
    pub error: Option<X>,
    pub status: QueryStatus,
    pub is_fetching: bool,
    pub is_stale: bool,
}

impl<E, X> QuerySnapshot<E, X> {
    /// First load: fetching with nothing to show yet.
    pub fn is_loading(&self) -> bool {
        self.is_fetching && self.data.is_none()
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Fulfilled
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Rejected
    }
}

struct Subscriber {
    options: SubscriptionOptions,
    listener: Listener,
}

struct CacheState<E, X> {
    data: Option<Arc<EntityCollection<E>>>,
    error: Option<X>,
    status: QueryStatus,
    stale: bool,
    provided: HashSet<CacheTag>,
    epoch: u64,
    issued: u64,
    fetching: bool,
    next_subscriber: u64,
    subscribers: BTreeMap<u64, Subscriber>,
}

impl<E, X> CacheState<E, X> {
    fn listeners(&self) -> Vec<Listener> {
        self.subscribers.values().map(|s| s.listener.clone()).collect()
    }
}

struct Shared<E, X> {
    state: Mutex<CacheState<E, X>>,
    memo: Mutex<Option<Memo<E>>>,
}

/// Derived views of one collection snapshot.
struct Memo<E> {
    source: Arc<EntityCollection<E>>,
    all: Option<Arc<Vec<E>>>,
    ids: Option<Arc<Vec<String>>>,
}

/// Cached collection query for one entity type. Cloning shares the cache.
pub struct EntityCache<E, X> {
    shared: Arc<Shared<E, X>>,
}

impl<E, X> Clone for EntityCache<E, X> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<E: Entity, X: Clone + Send + Sync + 'static> Default for EntityCache<E, X> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity, X: Clone + Send + Sync + 'static> EntityCache<E, X> {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(CacheState {
                    data: None,
                    error: None,
                    status: QueryStatus::Uninitialized,
                    stale: false,
                    provided: HashSet::new(),
                    epoch: 0,
                    issued: 0,
                    fetching: false,
                    next_subscriber: 0,
                    subscribers: BTreeMap::new(),
                }),
                memo: Mutex::new(None),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<E, X>> {
        self.shared.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(listeners: Vec<Listener>, event: CacheEvent) {
        for listener in listeners {
            listener(&event);
        }
    }

    pub fn snapshot(&self) -> QuerySnapshot<E, X> {
        let state = self.lock();
        QuerySnapshot {
            data: state.data.clone(),
            error: state.error.clone(),
            status: state.status,
            is_fetching: state.fetching,
            is_stale: state.stale,
        }
    }

    pub fn data(&self) -> Option<Arc<EntityCollection<E>>> {
        self.lock().data.clone()
    }

    /// True when there is nothing usable cached, or the cached value was invalidated.
    pub fn needs_fetch(&self) -> bool {
        let state = self.lock();
        state.stale || (state.data.is_none() && !state.fetching)
    }

    /// Announce a fetch. Any earlier ticket is superseded.
    pub fn begin_fetch(&self) -> FetchTicket {
        let mut state = self.lock();
        state.issued += 1;
        state.fetching = true;
        if state.status == QueryStatus::Uninitialized {
            state.status = QueryStatus::Pending;
        }
        FetchTicket {
            epoch: state.epoch,
            seq: state.issued,
        }
    }

    /// Store the outcome of a fetch. Returns `false` when the ticket was
    /// superseded and the outcome discarded.
    pub fn complete_fetch(&self, ticket: FetchTicket, outcome: Result<EntityCollection<E>, X>) -> bool {
        let (listeners, event) = {
            let mut state = self.lock();
            if ticket.epoch != state.epoch || ticket.seq != state.issued {
                tracing::debug!(kind = %E::KIND, ?ticket, "discarding superseded fetch");
                return false;
            }
            state.fetching = false;
            let event = match outcome {
                Ok(collection) => {
                    state.provided = provided_tags(Some(&collection));
                    state.data = Some(Arc::new(collection));
                    state.error = None;
                    state.status = QueryStatus::Fulfilled;
                    state.stale = false;
                    CacheEvent::Updated
                }
                Err(error) => {
                    if state.data.is_none() {
                        state.provided = provided_tags::<E>(None);
                    }
                    state.error = Some(error);
                    state.status = QueryStatus::Rejected;
                    CacheEvent::Failed
                }
            };
            (state.listeners(), event)
        };
        Self::notify(listeners, event);
        true
    }

    /// Mark the query stale if it provides any of `tags`. Returns whether it did.
    pub fn invalidate(&self, tags: &[CacheTag]) -> bool {
        let listeners = {
            let mut state = self.lock();
            if !tags.iter().any(|tag| state.provided.contains(tag)) {
                return false;
            }
            state.stale = true;
            state.listeners()
        };
        tracing::debug!(kind = %E::KIND, "cache invalidated");
        Self::notify(listeners, CacheEvent::Invalidated);
        true
    }

    /// Drop all cached data and start a new epoch. Subscribers stay registered.
    pub fn reset(&self) {
        let listeners = {
            let mut state = self.lock();
            state.epoch += 1;
            state.data = None;
            state.error = None;
            state.status = QueryStatus::Uninitialized;
            state.stale = false;
            state.fetching = false;
            state.provided.clear();
            state.listeners()
        };
        *self.shared.memo.lock().unwrap_or_else(PoisonError::into_inner) = None;
        tracing::debug!(kind = %E::KIND, "cache reset");
        Self::notify(listeners, CacheEvent::Reset);
    }

    pub fn subscribe(&self, options: SubscriptionOptions, listener: Listener) -> Subscription {
        let mut state = self.lock();
        let initial_fetch = options.refetch_on_mount_or_arg_change
            || state.stale
            || (state.data.is_none() && !state.fetching);
        let id = state.next_subscriber;
        state.next_subscriber += 1;
        state.subscribers.insert(id, Subscriber { options, listener });

        let weak: Weak<Shared<E, X>> = Arc::downgrade(&self.shared);
        Subscription {
            initial_fetch,
            release: Some(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    let mut state = shared.state.lock().unwrap_or_else(PoisonError::into_inner);
                    state.subscribers.remove(&id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Shortest polling interval requested by any subscriber.
    pub fn polling_interval(&self) -> Option<Duration> {
        self.lock()
            .subscribers
            .values()
            .filter_map(|s| s.options.polling_interval)
            .min()
    }

    pub fn refetches_on_focus(&self) -> bool {
        self.lock().subscribers.values().any(|s| s.options.refetch_on_focus)
    }

    fn with_memo<T>(&self, derive: impl FnOnce(&mut Memo<E>) -> T) -> Option<T> {
        let source = self.data()?;
        let mut memo = self.shared.memo.lock().unwrap_or_else(PoisonError::into_inner);
        let fresh = match memo.as_ref() {
            Some(m) => !Arc::ptr_eq(&m.source, &source),
            None => true,
        };
        if fresh {
            *memo = Some(Memo {
                source,
                all: None,
                ids: None,
            });
        }
        memo.as_mut().map(derive)
    }

    /// All records in id order. Recomputed only when the collection changed.
    pub fn select_all(&self) -> Arc<Vec<E>> {
        self.with_memo(|memo| {
            let source = &memo.source;
            memo.all
                .get_or_insert_with(|| Arc::new(source.iter().cloned().collect()))
                .clone()
        })
        .unwrap_or_default()
    }

    /// Ordered ids. Recomputed only when the collection changed.
    pub fn select_ids(&self) -> Arc<Vec<String>> {
        self.with_memo(|memo| {
            let source = &memo.source;
            memo.ids
                .get_or_insert_with(|| Arc::new(source.ids().to_vec()))
                .clone()
        })
        .unwrap_or_default()
    }

    pub fn select_by_id(&self, id: &str) -> Option<E> {
        self.data()?.get(id).cloned()
    }
}

/// Live registration on an [`EntityCache`]. Dropping it unsubscribes.
pub struct Subscription {
    initial_fetch: bool,
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Whether the subscriber should trigger a fetch right away.
    pub fn needs_initial_fetch(&self) -> bool {
        self.initial_fetch
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("initial_fetch", &self.initial_fetch)
            .finish_non_exhaustive()
    }
}
