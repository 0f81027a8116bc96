//! Immutable key/template storage and its hot-swappable handle.

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use arc_swap::ArcSwap;
use log::debug;

use super::Locale;

/// Query interface over an already-populated resource store.
///
/// Implementations must not change their answers while shared; reloading is
/// done by swapping in a new store through [`StoreHandle::replace`].
pub trait ResourceStore: Send + Sync {
    /// Return the raw template stored for `key` under exactly `locale`.
    fn lookup(&self, key: &str, locale: &Locale) -> Option<Cow<'_, str>>;
}

impl<S: ResourceStore + ?Sized> ResourceStore for Arc<S> {
    fn lookup(&self, key: &str, locale: &Locale) -> Option<Cow<'_, str>> {
        (**self).lookup(key, locale)
    }
}

impl<S: ResourceStore + ?Sized> ResourceStore for Box<S> {
    fn lookup(&self, key: &str, locale: &Locale) -> Option<Cow<'_, str>> {
        (**self).lookup(key, locale)
    }
}

/// In-memory store partitioned by locale.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapStore {
    partitions: HashMap<Locale, HashMap<String, String>>,
}

impl MapStore {
    /// Start building a store.
    ///
    /// ```
    /// use common::resources::{MapStore, ResourceStore};
    /// use unic_langid::langid;
    ///
    /// let store = MapStore::builder()
    ///     .entry(langid!("en"), "key.greeting", "Hello {0}")
    ///     .build();
    /// assert_eq!(
    ///     store.lookup("key.greeting", &langid!("en")).as_deref(),
    ///     Some("Hello {0}"),
    /// );
    /// assert!(store.lookup("key.greeting", &langid!("fr")).is_none());
    /// ```
    #[must_use]
    pub fn builder() -> MapStoreBuilder {
        MapStoreBuilder::default()
    }

    /// Locales holding at least one entry, sorted by their tag.
    #[must_use]
    pub fn locales(&self) -> Vec<&Locale> {
        let mut locales: Vec<&Locale> = self.partitions.keys().collect();
        locales.sort_unstable_by_key(|locale| locale.to_string());
        locales
    }

    /// Distinct keys across every locale, sorted.
    #[must_use]
    pub fn keys(&self) -> BTreeSet<&str> {
        self.partitions
            .values()
            .flat_map(|entries| entries.keys().map(String::as_str))
            .collect()
    }

    /// Total number of (key, locale) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.partitions.values().map(HashMap::len).sum()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceStore for MapStore {
    fn lookup(&self, key: &str, locale: &Locale) -> Option<Cow<'_, str>> {
        self.partitions
            .get(locale)
            .and_then(|entries| entries.get(key))
            .map(|template| Cow::Borrowed(template.as_str()))
    }
}

/// Builder for [`MapStore`]. Later entries replace earlier ones.
#[derive(Clone, Debug, Default)]
pub struct MapStoreBuilder {
    partitions: HashMap<Locale, HashMap<String, String>>,
}

impl MapStoreBuilder {
    /// Add a single template for `key` under `locale`.
    #[must_use]
    pub fn entry(
        mut self,
        locale: Locale,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.partitions
            .entry(locale)
            .or_default()
            .insert(key.into(), template.into());
        self
    }

    /// Add every `(key, template)` pair under `locale`.
    #[must_use]
    pub fn entries<I, K, V>(mut self, locale: Locale, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.partitions.entry(locale).or_default().extend(
            entries
                .into_iter()
                .map(|(key, template)| (key.into(), template.into())),
        );
        self
    }

    /// Freeze the collected entries.
    #[must_use]
    pub fn build(self) -> MapStore {
        MapStore {
            partitions: self.partitions,
        }
    }
}

/// Shared, atomically replaceable reference to the current store.
///
/// Clones share the same slot, so a [`replace`](Self::replace) through any
/// clone is seen by every resolver holding one. Readers take a
/// [`StoreSnapshot`] and keep seeing that store until they drop it.
#[derive(Clone)]
pub struct StoreHandle {
    current: Arc<ArcSwap<Box<dyn ResourceStore>>>,
}

impl StoreHandle {
    /// Wrap `store` in a new handle.
    pub fn new(store: impl ResourceStore + 'static) -> Self {
        let store: Box<dyn ResourceStore> = Box::new(store);
        Self {
            current: Arc::new(ArcSwap::from_pointee(store)),
        }
    }

    /// Take a consistent view of the current store.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            inner: self.current.load_full(),
        }
    }

    /// Swap in a fully built replacement store.
    pub fn replace(&self, store: impl ResourceStore + 'static) {
        let store: Box<dyn ResourceStore> = Box::new(store);
        self.current.store(Arc::new(store));
        debug!(target: "almanac::store", "resource store replaced");
    }
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("StoreHandle").finish_non_exhaustive()
    }
}

impl From<MapStore> for StoreHandle {
    fn from(store: MapStore) -> Self {
        Self::new(store)
    }
}

/// Point-in-time view of a [`StoreHandle`].
#[derive(Clone)]
pub struct StoreSnapshot {
    inner: Arc<Box<dyn ResourceStore>>,
}

impl Deref for StoreSnapshot {
    type Target = dyn ResourceStore;

    fn deref(&self) -> &Self::Target {
        &**self.inner
    }
}

impl fmt::Debug for StoreSnapshot {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("StoreSnapshot").finish_non_exhaustive()
    }
}

impl ResourceStore for StoreSnapshot {
    fn lookup(&self, key: &str, locale: &Locale) -> Option<Cow<'_, str>> {
        self.inner.lookup(key, locale)
    }
}
