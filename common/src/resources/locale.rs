//! Locale fallback chains and the process-wide default locale.
//!
//! Lookups never consult a single locale. [`candidates`] expands a request
//! into the exact locale, its bare language, and the default locale, in that
//! order and without duplicates, so the outcome depends only on the request
//! and never on how a store happens to iterate its partitions.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use arc_swap::ArcSwap;
use log::debug;
use once_cell::sync::Lazy;
use unic_langid::{LanguageIdentifier, langid};

/// Locale identifier used as the lookup dimension of every store.
pub type Locale = LanguageIdentifier;

/// Environment variable consulted when the default locale is first read.
pub const LOCALE_ENV: &str = "ALMANAC_LOCALE";

/// Locale used when neither the environment nor the caller picks one.
pub const FALLBACK_LOCALE: &str = "en";

pub(crate) const FALLBACK_LANGUAGE: Locale = langid!("en");

static DEFAULT_LOCALE: Lazy<ArcSwap<Locale>> =
    Lazy::new(|| ArcSwap::from_pointee(initial_default_locale()));

fn initial_default_locale() -> Locale {
    let from_env = env::var(LOCALE_ENV)
        .ok()
        .and_then(|raw| Locale::from_str(raw.trim()).ok());

    match from_env {
        Some(locale) => {
            debug!(target: "almanac::locale", "default locale `{locale}` taken from {LOCALE_ENV}");
            locale
        }
        None => FALLBACK_LANGUAGE,
    }
}

/// Return the process-wide default locale.
///
/// ```
/// use common::resources::{default_locale, set_default_locale};
/// use unic_langid::langid;
///
/// set_default_locale(langid!("fr"));
/// assert_eq!(default_locale(), langid!("fr"));
/// ```
#[must_use]
pub fn default_locale() -> Locale {
    Locale::clone(&DEFAULT_LOCALE.load())
}

/// Atomically replace the process-wide default locale.
pub fn set_default_locale(locale: Locale) {
    DEFAULT_LOCALE.store(Arc::new(locale));
}

/// Compute the fallback chain for `requested` using the process default.
///
/// With no locale supplied the chain is the default locale alone.
#[must_use]
pub fn candidates(requested: Option<&Locale>) -> LocaleChain {
    LocaleChain::build(requested, &default_locale())
}

/// Ordered, duplicate-free sequence of locales consulted during a lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LocaleChain {
    locales: Vec<Locale>,
}

impl LocaleChain {
    /// Build the chain for `requested` against an explicit `default`.
    ///
    /// ```
    /// use common::resources::LocaleChain;
    /// use unic_langid::langid;
    ///
    /// let chain = LocaleChain::build(Some(&langid!("de-AT")), &langid!("en"));
    /// assert_eq!(chain.to_string(), "de-AT, de, en");
    /// ```
    #[must_use]
    pub fn build(requested: Option<&Locale>, default: &Locale) -> Self {
        let mut chain = Self::default();

        if let Some(locale) = requested {
            chain.push(locale.clone());
            chain.push(language_only(locale));
        }
        chain.push(default.clone());

        chain
    }

    fn push(&mut self, locale: Locale) {
        if !self.locales.contains(&locale) {
            self.locales.push(locale);
        }
    }

    /// Iterate over the candidates in lookup order.
    pub fn iter(&self) -> std::slice::Iter<'_, Locale> {
        self.locales.iter()
    }

    /// The candidates as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Locale] {
        &self.locales
    }

    /// The first candidate consulted.
    #[must_use]
    pub fn first(&self) -> Option<&Locale> {
        self.locales.first()
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locales.len()
    }

    /// Whether the chain holds no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}

impl<'a> IntoIterator for &'a LocaleChain {
    type Item = &'a Locale;
    type IntoIter = std::slice::Iter<'a, Locale>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for LocaleChain {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut locales = self.locales.iter();
        if let Some(first) = locales.next() {
            write!(formatter, "{first}")?;
        }
        for locale in locales {
            write!(formatter, ", {locale}")?;
        }
        Ok(())
    }
}

/// Strip script, region, and variants, keeping the bare language.
fn language_only(locale: &Locale) -> Locale {
    Locale::from_parts(locale.language, None, None, &[])
}
