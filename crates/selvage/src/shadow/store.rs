use super::{Shadow, ShadowPatch, Shadowable, Shadowed, merge};
use selvage_common::AtUri;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Callback<P> = Arc<dyn Fn(&AtUri, Option<&Shadow<P>>) + Send + Sync>;

struct Inner<P> {
    shadows: HashMap<AtUri, Shadow<P>>,
    subscribers: HashMap<AtUri, Vec<(u64, Callback<P>)>>,
    next_subscriber: u64,
}

impl<P> Default for Inner<P> {
    fn default() -> Self {
        Self {
            shadows: HashMap::new(),
            subscribers: HashMap::new(),
            next_subscriber: 0,
        }
    }
}

/// In-memory store of pending shadows, one per record URI.
///
/// Cloning the store clones a handle; all clones see the same shadows. Create one per
/// session (or per test) and pass it to whoever needs it.
///
/// Subscribers are called synchronously, on the mutating thread, after the store's
/// lock is released. A callback may therefore write to a *different* record; writing
/// to the record whose notification is being delivered is unsupported.
pub struct ShadowStore<P>(Arc<Mutex<Inner<P>>>);

impl<P> Clone for ShadowStore<P> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<P> Default for ShadowStore<P> {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(Inner::default())))
    }
}

impl<P> fmt::Debug for ShadowStore<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("ShadowStore")
            .field("shadows", &inner.shadows.len())
            .field("subscribed", &inner.subscribers.len())
            .finish()
    }
}

impl<P> ShadowStore<P> {
    fn lock(&self) -> MutexGuard<'_, Inner<P>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: ShadowPatch> ShadowStore<P> {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// The current shadow for `id`, if any
    pub fn get(&self, id: &AtUri) -> Option<Shadow<P>> {
        self.lock().shadows.get(id).cloned()
    }

    /// Merge `patch` into the shadow for `id`, field by field, newest winning.
    ///
    /// Creates the shadow if there is none. A tombstoned record stays tombstoned.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self, patch), fields(id = %id)))]
    pub fn set(&self, id: AtUri, patch: P) {
        let changed = {
            let mut inner = self.lock();
            match inner.shadows.entry(id.clone()) {
                Entry::Occupied(mut entry) => match entry.get_mut() {
                    Shadow::Tombstone => false,
                    Shadow::Patch(existing) => {
                        existing.merge_from(patch);
                        true
                    }
                },
                Entry::Vacant(entry) => {
                    entry.insert(Shadow::Patch(patch));
                    true
                }
            }
        };
        if changed {
            self.notify(&id);
        }
    }

    /// Mark `id` as deleted locally, replacing any pending patch
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self), fields(id = %id)))]
    pub fn tombstone(&self, id: AtUri) {
        self.lock().shadows.insert(id.clone(), Shadow::Tombstone);
        self.notify(&id);
    }

    /// Drop the shadow for `id`, usually once the server state supersedes it.
    ///
    /// Clearing an id with no shadow does nothing.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self), fields(id = %id)))]
    pub fn clear(&self, id: &AtUri) {
        let removed = self.lock().shadows.remove(id).is_some();
        if removed {
            self.notify(id);
        }
    }

    /// Register `callback` for changes to `id`.
    ///
    /// The callback receives the id and the shadow after the change (`None` once
    /// cleared). It stays registered until the returned [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, id: AtUri, callback: F) -> Subscription
    where
        F: Fn(&AtUri, Option<&Shadow<P>>) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let key = inner.next_subscriber;
        inner.next_subscriber += 1;
        inner
            .subscribers
            .entry(id.clone())
            .or_default()
            .push((key, Arc::new(callback)));

        let weak: Weak<Mutex<Inner<P>>> = Arc::downgrade(&self.0);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
                    if let Some(subs) = inner.subscribers.get_mut(&id) {
                        subs.retain(|(k, _)| *k != key);
                        if subs.is_empty() {
                            inner.subscribers.remove(&id);
                        }
                    }
                }
            })),
        }
    }

    /// Number of subscribers currently registered for `id`
    pub fn subscriber_count(&self, id: &AtUri) -> usize {
        self.lock().subscribers.get(id).map_or(0, Vec::len)
    }

    /// Merge the current shadow (if any) onto `canonical`
    pub fn view<T>(&self, canonical: &T) -> Shadowed<T>
    where
        T: Shadowable<Patch = P>,
    {
        let shadow = self.get(canonical.shadow_key());
        merge(canonical, shadow.as_ref())
    }

    /// Number of records with a pending shadow
    pub fn len(&self) -> usize {
        self.lock().shadows.len()
    }

    /// Whether no record has a pending shadow
    pub fn is_empty(&self) -> bool {
        self.lock().shadows.is_empty()
    }

    /// Drop every shadow and every subscriber.
    ///
    /// Outstanding [`Subscription`] handles become inert.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.shadows.clear();
        inner.subscribers.clear();
    }

    fn notify(&self, id: &AtUri) {
        let (shadow, callbacks) = {
            let inner = self.lock();
            let callbacks: Vec<Callback<P>> = inner
                .subscribers
                .get(id)
                .map(|subs| subs.iter().map(|(_, cb)| cb.clone()).collect())
                .unwrap_or_default();
            (inner.shadows.get(id).cloned(), callbacks)
        };
        for callback in callbacks {
            callback(id, shadow.as_ref());
        }
    }
}

/// Handle for a [`ShadowStore::subscribe`] registration.
///
/// Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Stop receiving notifications
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
