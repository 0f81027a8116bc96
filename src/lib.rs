//! Almanac wires a resource store, a default locale, and the lookup services
//! built on them.
//!
//! [`Almanac`] is the entry point most applications need: hand it a store and
//! the loaded [`Settings`] and it selects the default locale, then exposes a
//! strict [`ResourceResolver`], a [`MessageSource`], and a
//! [`ResourceInjector`] sharing one hot-swappable store.

pub mod config;

use std::env;

use common::i18n::{LocaleSelection, MessageSource, resolve_locale};
use common::injection::ResourceInjector;
use common::resources::{LOCALE_ENV, ResourceResolver, ResourceStore, StoreHandle};

pub use common::{i18n, injection, resources};
pub use config::{ConfigError, Settings};

/// Resolver, message source, and injector sharing a store and default locale.
///
/// # Examples
///
/// ```
/// use almanac::{Almanac, Settings};
/// use almanac::resources::MapStore;
/// use unic_langid::langid;
///
/// let store = MapStore::builder()
///     .entry(langid!("cy"), "key.greeting", "Shwmae {0}")
///     .build();
/// let settings = Settings {
///     locale: Some(String::from("cy")),
/// };
///
/// let almanac = Almanac::with_locale(store, &settings, Some("cy"));
/// assert_eq!(almanac.selection().locale(), &langid!("cy"));
/// assert_eq!(
///     almanac.messages().message("key.greeting").as_deref(),
///     Ok("Shwmae {0}"),
/// );
/// ```
#[derive(Debug)]
pub struct Almanac {
    selection: LocaleSelection,
    resolver: ResourceResolver,
    messages: MessageSource,
    injector: ResourceInjector,
}

impl Almanac {
    /// Build the services over `store`, selecting the default locale from
    /// `ALMANAC_LOCALE` and then `settings`.
    #[must_use]
    pub fn new(store: impl Into<StoreHandle>, settings: &Settings) -> Self {
        Self::with_locale(store, settings, None)
    }

    /// Like [`Self::new`], with an explicit locale taking precedence over the
    /// environment and the settings.
    #[must_use]
    pub fn with_locale(
        store: impl Into<StoreHandle>,
        settings: &Settings,
        explicit: Option<&str>,
    ) -> Self {
        let selection = resolve_locale(explicit, env::var(LOCALE_ENV).ok(), settings.locale());
        selection.log_outcome("almanac::selection");

        let resolver = ResourceResolver::new(store).with_default_locale(selection.locale().clone());

        Self {
            selection,
            messages: MessageSource::new(resolver.clone()),
            injector: ResourceInjector::new(resolver.clone()),
            resolver,
        }
    }

    /// How the default locale was chosen.
    #[must_use]
    pub const fn selection(&self) -> &LocaleSelection {
        &self.selection
    }

    /// The strict resolver.
    #[must_use]
    pub const fn resolver(&self) -> &ResourceResolver {
        &self.resolver
    }

    /// The String-only message source.
    #[must_use]
    pub const fn messages(&self) -> &MessageSource {
        &self.messages
    }

    /// The lenient injector.
    #[must_use]
    pub const fn injector(&self) -> &ResourceInjector {
        &self.injector
    }

    /// Swap in a new store; every service sees it on its next lookup.
    pub fn reload(&self, store: impl ResourceStore + 'static) {
        self.resolver.store().replace(store);
    }
}
