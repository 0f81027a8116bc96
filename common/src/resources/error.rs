use thiserror::Error;

use super::LocaleChain;

/// Raised when no candidate locale yields a template for a key.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("resource `{key}` missing for locales [{tried}]")]
pub struct NotFoundError {
    key: String,
    tried: LocaleChain,
}

impl NotFoundError {
    pub(crate) fn new(key: impl Into<String>, tried: LocaleChain) -> Self {
        Self {
            key: key.into(),
            tried,
        }
    }

    /// The key that could not be resolved.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The candidate locales consulted, in lookup order.
    #[must_use]
    pub fn tried(&self) -> &LocaleChain {
        &self.tried
    }

    /// Split the error into its key and locale chain.
    #[must_use]
    pub fn into_parts(self) -> (String, LocaleChain) {
        (self.key, self.tried)
    }
}

/// Raised when text cannot be turned into the requested type.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    /// No converter is registered for the target type.
    #[error("no converter registered for `{target}`")]
    Unsupported {
        /// Name of the requested type.
        target: &'static str,
    },
    /// The registered converter rejected the input.
    #[error("cannot convert `{input}` to `{target}`: {reason}")]
    Rejected {
        /// The text handed to the converter.
        input: String,
        /// Name of the requested type.
        target: &'static str,
        /// Converter-supplied explanation.
        reason: String,
    },
}

impl ConversionError {
    /// Name of the type the conversion targeted.
    #[must_use]
    pub const fn target(&self) -> &'static str {
        match self {
            Self::Unsupported { target } | Self::Rejected { target, .. } => target,
        }
    }
}

/// Failure of a strict, type-converted lookup.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The key has no template in any candidate locale.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    /// The formatted template could not be converted.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl ResolveError {
    /// Whether the failure was a lookup miss rather than a conversion error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
