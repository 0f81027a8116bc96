use std::fmt;
use std::str::FromStr;

use log::{debug, warn};

use crate::resources::{FALLBACK_LANGUAGE, FALLBACK_LOCALE, LOCALE_ENV, Locale};

/// Source for a resolved locale.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LocaleSource {
    /// Locale supplied explicitly by the caller.
    ExplicitArgument,
    /// Locale sourced from the `ALMANAC_LOCALE` environment variable.
    EnvironmentVariable,
    /// Locale taken from the settings file.
    Configuration,
    /// Fallback locale used when no candidate is valid.
    Fallback,
}

impl fmt::Display for LocaleSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExplicitArgument => formatter.write_str("explicit locale override"),
            Self::EnvironmentVariable => formatter.write_str(LOCALE_ENV),
            Self::Configuration => formatter.write_str("configuration locale"),
            Self::Fallback => formatter.write_str("fallback locale"),
        }
    }
}

/// Outcome of locale resolution including the effective locale and provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LocaleSelection {
    locale: Locale,
    source: LocaleSource,
    requested: Option<String>,
}

impl LocaleSelection {
    const fn new(locale: Locale, source: LocaleSource, requested: Option<String>) -> Self {
        Self {
            locale,
            source,
            requested,
        }
    }

    const fn fallback() -> Self {
        Self::new(FALLBACK_LANGUAGE, LocaleSource::Fallback, None)
    }

    /// Returns the effective locale source.
    #[must_use]
    pub const fn source(&self) -> LocaleSource {
        self.source
    }

    /// Returns the raw value supplied by the winning source, if any.
    #[must_use]
    pub fn requested(&self) -> Option<&str> {
        self.requested.as_deref()
    }

    /// Returns the resolved locale.
    #[must_use]
    pub const fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Whether the fallback locale was used.
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        self.source == LocaleSource::Fallback
    }

    /// Consumes the selection, yielding the locale.
    #[must_use]
    pub fn into_locale(self) -> Locale {
        self.locale
    }

    /// Emit a debug log summarising the resolved locale.
    pub fn log_outcome(&self, target: &str) {
        debug!(
            target: target,
            "resolved {} to `{}`",
            self.source(),
            self.locale(),
        );
    }
}

/// Attempt to resolve a locale candidate from the given source.
fn try_resolve_candidate(source: LocaleSource, raw: Option<&str>) -> Option<LocaleSelection> {
    let candidate = normalise_locale(raw)?;

    match Locale::from_str(candidate) {
        Ok(locale) => Some(LocaleSelection::new(
            locale,
            source,
            Some(candidate.to_owned()),
        )),
        Err(_) => {
            warn!(
                target: "almanac::selection",
                "skipping unparseable {source} `{candidate}`; falling back to {FALLBACK_LOCALE}",
            );
            None
        }
    }
}

/// Resolve the default locale from explicit, environment, and configuration
/// overrides.
///
/// The resolver considers candidates in the following order:
///
/// 1. The explicit locale supplied by the caller.
/// 2. The `ALMANAC_LOCALE` environment variable.
/// 3. The settings file.
/// 4. `en` when no candidate parses.
///
/// ```
/// use common::i18n::{LocaleSource, resolve_locale};
///
/// let selection = resolve_locale(None, Some(String::from("not a locale!")), Some("cy"));
/// assert_eq!(selection.source(), LocaleSource::Configuration);
/// assert_eq!(selection.locale().to_string(), "cy");
/// ```
#[must_use]
pub fn resolve_locale(
    explicit: Option<&str>,
    environment: Option<String>,
    configuration: Option<&str>,
) -> LocaleSelection {
    let candidates = [
        (LocaleSource::ExplicitArgument, explicit),
        (LocaleSource::EnvironmentVariable, environment.as_deref()),
        (LocaleSource::Configuration, configuration),
    ];

    candidates
        .into_iter()
        .find_map(|(source, raw)| try_resolve_candidate(source, raw))
        .unwrap_or_else(LocaleSelection::fallback)
}

/// Trim whitespace and discard empty locale candidates.
#[must_use]
pub fn normalise_locale(input: Option<&str>) -> Option<&str> {
    input
        .map(str::trim)
        .and_then(|value| if value.is_empty() { None } else { Some(value) })
}
