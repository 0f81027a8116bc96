//! Resource resolution, message lookup, and injection for Almanac.
//!
//! The crate layers a locale-aware lookup over an immutable key/template
//! store. [`resources`] holds the store, locale fallback, converter registry,
//! and the strict [`ResourceResolver`]. [`i18n`] narrows that to a String-only
//! [`MessageSource`] and selects the effective default locale. [`injection`]
//! writes resolved values into registered members of arbitrary types.

pub mod i18n;
pub mod injection;
pub mod resources;
pub mod testing;

pub use i18n::{
    LocaleSelection, LocaleSource, MessageRequest, MessageSource, NoSuchMessage, normalise_locale,
    resolve_locale,
};
pub use injection::{
    ClassChain, ClassDescriptor, Injectable, InjectedResource, InjectionError, Member, MemberKind,
    ResourceInjector,
};
pub use resources::{
    Arguments, ConversionError, ConverterRegistry, FALLBACK_LOCALE, FluentValue, Locale,
    LocaleChain, MapStore, MapStoreBuilder, NotFoundError, ResolveError, ResourceRequest,
    ResourceResolver, ResourceStore, StoreHandle, StoreSnapshot, candidates, default_locale,
    format_template, set_default_locale,
};
