//! Settings loader for applications embedding Almanac.
//!
//! Settings live in a small TOML file. Every field is optional so an empty
//! file, or no file at all via [`Settings::load_or_default`], yields the
//! defaults. Unknown keys are rejected to surface typos early.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use common::i18n::normalise_locale;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// Failure to load a settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read settings from `{path}`: {source}")]
    Read {
        /// File that was requested.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid settings TOML.
    #[error("failed to parse settings from `{path}`: {source}")]
    Parse {
        /// File that was parsed.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        #[source]
        source: toml::de::Error,
    },
}

/// Application-level settings.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Preferred default locale when neither the caller nor the environment
    /// supplies one.
    ///
    /// The value is trimmed and blank values are ignored, so `locale = ""`
    /// falls back cleanly to the bundled default.
    pub locale: Option<String>,
}

impl Settings {
    /// Parses settings from TOML source.
    ///
    /// # Errors
    ///
    /// Returns the parser diagnostic when `source` is malformed or names an
    /// unknown key.
    ///
    /// # Examples
    ///
    /// ```
    /// use almanac::Settings;
    ///
    /// let settings = Settings::from_toml_str("locale = \"cy\"\n")?;
    /// assert_eq!(settings.locale(), Some("cy"));
    /// # Ok::<(), toml::de::Error>(())
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Reads and parses the settings file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents are not valid settings.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        Self::load_with(path, |file| fs::read_to_string(file))
    }

    /// Like [`Self::load`], but a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Fails as [`Self::load`] does for any problem other than the file not
    /// existing.
    pub fn load_or_default(path: &Utf8Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                debug!(target: "almanac::config", "no settings at `{path}`; using defaults");
                Ok(Self::default())
            }
            outcome => outcome,
        }
    }

    /// Parses the settings text `read` returns for `path`.
    ///
    /// [`Self::load`] reads from the file system; other readers let callers
    /// take the text from elsewhere while keeping the same error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when `read` fails and
    /// [`ConfigError::Parse`] when the text is not valid settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use almanac::Settings;
    /// use camino::Utf8Path;
    ///
    /// let settings = Settings::load_with(Utf8Path::new("almanac.toml"), |_| {
    ///     Ok(String::from("locale = \"gd\"\n"))
    /// })?;
    /// assert_eq!(settings.locale(), Some("gd"));
    /// # Ok::<(), almanac::ConfigError>(())
    /// ```
    pub fn load_with<F>(path: &Utf8Path, read: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&Utf8Path) -> io::Result<String>,
    {
        let source = read(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let settings = Self::from_toml_str(&source).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;

        debug!(target: "almanac::config", "loaded settings from `{path}`");
        Ok(settings)
    }

    /// Returns the configured locale, if present.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        normalise_locale(self.locale.as_deref())
    }
}
