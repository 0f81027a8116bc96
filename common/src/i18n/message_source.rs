use thiserror::Error;

use crate::resources::{
    FluentValue, Locale, LocaleChain, NotFoundError, ResourceRequest, ResourceResolver,
};

/// Raised when a message key has no template in any candidate locale.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("message `{key}` missing for locales [{tried}]")]
pub struct NoSuchMessage {
    key: String,
    tried: LocaleChain,
}

impl NoSuchMessage {
    /// The message key that could not be resolved.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The candidate locales consulted, in lookup order.
    #[must_use]
    pub fn tried(&self) -> &LocaleChain {
        &self.tried
    }
}

impl From<NotFoundError> for NoSuchMessage {
    fn from(error: NotFoundError) -> Self {
        let (key, tried) = error.into_parts();
        Self { key, tried }
    }
}

/// String-only message lookup backed by a [`ResourceResolver`].
#[derive(Clone, Debug)]
pub struct MessageSource {
    resolver: ResourceResolver,
}

impl MessageSource {
    /// Wrap `resolver`.
    #[must_use]
    pub const fn new(resolver: ResourceResolver) -> Self {
        Self { resolver }
    }

    /// The resolver messages are read through.
    #[must_use]
    pub const fn resolver(&self) -> &ResourceResolver {
        &self.resolver
    }

    /// Fetch the message for `key` in the default locale.
    pub fn message(&self, key: &str) -> Result<String, NoSuchMessage> {
        self.request(key).get()
    }

    /// Fetch the message for `key`, returning `default` on a miss.
    #[must_use]
    pub fn message_or(&self, key: &str, default: &str) -> String {
        self.request(key).get_or(default)
    }

    /// Begin a message lookup with an optional locale and arguments.
    ///
    /// ```
    /// use common::i18n::MessageSource;
    /// use common::resources::{FluentValue, MapStore, ResourceResolver};
    /// use unic_langid::langid;
    ///
    /// let store = MapStore::builder()
    ///     .entry(langid!("cy"), "greeting", "Shwmae {0}")
    ///     .build();
    /// let messages = MessageSource::new(
    ///     ResourceResolver::new(store).with_default_locale(langid!("en")),
    /// );
    /// let args = [FluentValue::from("Dai")];
    ///
    /// let text = messages
    ///     .request("greeting")
    ///     .locale(&langid!("cy-GB"))
    ///     .args(&args)
    ///     .get();
    /// assert_eq!(text.as_deref(), Ok("Shwmae Dai"));
    /// assert!(messages.message("greeting").is_err());
    /// ```
    #[must_use]
    pub fn request<'a>(&'a self, key: &'a str) -> MessageRequest<'a> {
        MessageRequest {
            inner: self.resolver.request(key),
        }
    }
}

/// A single message lookup under construction.
#[derive(Clone, Copy, Debug)]
pub struct MessageRequest<'a> {
    inner: ResourceRequest<'a>,
}

impl<'a> MessageRequest<'a> {
    /// Look up in `locale` before falling back.
    #[must_use]
    pub fn locale(self, locale: &'a Locale) -> Self {
        Self {
            inner: self.inner.locale(locale),
        }
    }

    /// Substitute `args` into the message's `{n}` placeholders.
    #[must_use]
    pub fn args(self, args: &'a [FluentValue<'a>]) -> Self {
        Self {
            inner: self.inner.args(args),
        }
    }

    /// Resolve the message, failing on a miss.
    pub fn get(self) -> Result<String, NoSuchMessage> {
        Ok(self.inner.resolve()?)
    }

    /// Resolve the message, returning `default` unmodified on a miss.
    #[must_use]
    pub fn get_or(self, default: &str) -> String {
        self.inner.resolve_or(default)
    }
}
