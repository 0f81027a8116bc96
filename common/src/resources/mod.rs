//! Locale-aware resource lookup.
//!
//! A [`ResourceStore`] answers a single question: does this key exist for this
//! locale, and if so what is its raw template. Everything else builds on that
//! query. [`candidates`] computes the deterministic fallback sequence,
//! [`format_template`] performs positional `{n}` substitution, the
//! [`ConverterRegistry`] turns formatted text into typed values, and
//! [`ResourceResolver`] combines the three behind a strict API that surfaces
//! misses as [`NotFoundError`].
//!
//! See [`ResourceResolver::request`] for every locale, argument, and default
//! combination.

/// Re-export the Fluent value type used for positional arguments.
pub use fluent_templates::fluent_bundle::FluentValue;

/// Ordered positional arguments substituted into `{n}` placeholders.
pub type Arguments<'a> = Vec<FluentValue<'a>>;

mod convert;
mod error;
mod format;
mod locale;
mod resolver;
mod store;

pub use convert::ConverterRegistry;
pub use error::{ConversionError, NotFoundError, ResolveError};
pub use format::format_template;
pub use locale::{
    FALLBACK_LOCALE, LOCALE_ENV, Locale, LocaleChain, candidates, default_locale,
    set_default_locale,
};
pub(crate) use locale::FALLBACK_LANGUAGE;
pub use resolver::{ResourceRequest, ResourceResolver};
pub use store::{MapStore, MapStoreBuilder, ResourceStore, StoreHandle, StoreSnapshot};

#[cfg(test)]
mod tests;
