//! Store doubles for exercising resolvers and injectors.

use std::borrow::Cow;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::resources::{Locale, ResourceStore};

/// Wraps a store and records every `(key, locale)` it is asked for.
///
/// Share it through an [`Arc`](std::sync::Arc) to inspect the record after
/// handing a clone to a resolver.
pub struct RecordingStore<S> {
    inner: S,
    lookups: Mutex<Vec<(String, Locale)>>,
}

impl<S: ResourceStore> RecordingStore<S> {
    /// Record lookups made against `inner`.
    #[must_use]
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// Every lookup so far, in order.
    #[must_use]
    pub fn lookups(&self) -> Vec<(String, Locale)> {
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The keys looked up so far, in order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.lookups().into_iter().map(|(key, _)| key).collect()
    }

    /// The locales tried for `key`, in order.
    #[must_use]
    pub fn locales_for(&self, key: &str) -> Vec<Locale> {
        self.lookups()
            .into_iter()
            .filter(|(seen, _)| seen == key)
            .map(|(_, locale)| locale)
            .collect()
    }

    /// Forget the record.
    pub fn clear(&self) {
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<S: ResourceStore> ResourceStore for RecordingStore<S> {
    fn lookup(&self, key: &str, locale: &Locale) -> Option<Cow<'_, str>> {
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((key.to_owned(), locale.clone()));
        self.inner.lookup(key, locale)
    }
}

impl<S> fmt::Debug for RecordingStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingStore").finish_non_exhaustive()
    }
}

/// A store that never holds anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct MissingStore;

impl ResourceStore for MissingStore {
    fn lookup(&self, _key: &str, _locale: &Locale) -> Option<Cow<'_, str>> {
        None
    }
}
