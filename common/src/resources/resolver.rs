use std::sync::Arc;

use log::{debug, trace};

use super::{
    ConversionError, ConverterRegistry, FluentValue, Locale, LocaleChain, NotFoundError,
    ResolveError, ResourceStore, StoreHandle, StoreSnapshot, default_locale, format_template,
};

/// Strict resource lookup, formatting, and conversion.
///
/// Every operation walks the same algorithm: compute the candidate locale
/// chain, take the first template the store holds, substitute positional
/// arguments when any are supplied, and convert when a type is requested.
/// Misses are reported as [`NotFoundError`] unless the caller supplies a
/// default.
///
/// The resolver is cheap to clone; clones share the store handle and the
/// converter registry.
#[derive(Clone, Debug)]
pub struct ResourceResolver {
    store: StoreHandle,
    converters: Arc<ConverterRegistry>,
    default_locale: Option<Locale>,
}

impl ResourceResolver {
    /// Create a resolver over `store` with the built-in converters.
    ///
    /// Until [`with_default_locale`](Self::with_default_locale) is called the
    /// resolver follows the process-wide default locale.
    #[must_use]
    pub fn new(store: impl Into<StoreHandle>) -> Self {
        Self {
            store: store.into(),
            converters: Arc::new(ConverterRegistry::new()),
            default_locale: None,
        }
    }

    /// Replace the converter registry.
    #[must_use]
    pub fn with_converters(mut self, converters: Arc<ConverterRegistry>) -> Self {
        self.converters = converters;
        self
    }

    /// Pin the default locale instead of following the process default.
    #[must_use]
    pub fn with_default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = Some(locale);
        self
    }

    /// The store handle consulted by lookups.
    #[must_use]
    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// The converter registry used for typed lookups.
    #[must_use]
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// The default locale lookups fall back to.
    #[must_use]
    pub fn default_locale(&self) -> Locale {
        self.default_locale.clone().unwrap_or_else(default_locale)
    }

    /// Candidate locales for `requested`, ending with the default locale.
    #[must_use]
    pub fn candidates(&self, requested: Option<&Locale>) -> LocaleChain {
        LocaleChain::build(requested, &self.default_locale())
    }

    /// Begin a lookup for `key`; add a locale or arguments before resolving.
    ///
    /// ```
    /// use common::resources::{FluentValue, MapStore, ResourceResolver};
    /// use unic_langid::langid;
    ///
    /// let store = MapStore::builder()
    ///     .entry(langid!("en"), "key.proverb", "An {0} a day keeps the {1} away")
    ///     .entry(langid!("en"), "key.integer", "42")
    ///     .build();
    /// let resolver = ResourceResolver::new(store).with_default_locale(langid!("en"));
    /// let args = [FluentValue::from("apple"), FluentValue::from("doctor")];
    ///
    /// let text = resolver
    ///     .request("key.proverb")
    ///     .locale(&langid!("en-AU"))
    ///     .args(&args)
    ///     .resolve();
    /// assert_eq!(text.as_deref(), Ok("An apple a day keeps the doctor away"));
    ///
    /// assert_eq!(resolver.request("key.bogus").resolve_or("not found"), "not found");
    /// assert_eq!(resolver.request("key.integer").convert::<i32>(), Ok(42));
    /// assert_eq!(resolver.request("key.bogus").convert_or_value(21), Ok(21));
    /// ```
    #[must_use]
    pub fn request<'a>(&'a self, key: &'a str) -> ResourceRequest<'a> {
        ResourceRequest {
            resolver: self,
            key,
            locale: None,
            args: &[],
            snapshot: None,
        }
    }

    /// Resolve `key` for the default locale without substitution.
    pub fn resolve(&self, key: &str) -> Result<String, NotFoundError> {
        self.request(key).resolve()
    }

    /// Resolve `key`, returning `default` on a miss.
    #[must_use]
    pub fn resolve_or(&self, key: &str, default: &str) -> String {
        self.request(key).resolve_or(default)
    }

    /// Resolve `key` and convert it to `T`.
    pub fn resolve_converted<T: 'static>(&self, key: &str) -> Result<T, ResolveError> {
        self.request(key).convert()
    }

    /// Resolve `key` and convert it to `T`, converting `default` on a miss.
    pub fn resolve_converted_or<T: 'static>(
        &self,
        key: &str,
        default: &str,
    ) -> Result<T, ConversionError> {
        self.request(key).convert_or(default)
    }

    /// Convert `raw` with this resolver's registry.
    pub fn convert<T: 'static>(&self, raw: &str) -> Result<T, ConversionError> {
        self.converters.convert(raw)
    }
}

/// A single lookup under construction.
///
/// Requests are `Copy`, so one request can be tried strictly and then
/// retried with a default.
#[derive(Clone, Copy, Debug)]
pub struct ResourceRequest<'a> {
    resolver: &'a ResourceResolver,
    key: &'a str,
    locale: Option<&'a Locale>,
    args: &'a [FluentValue<'a>],
    snapshot: Option<&'a StoreSnapshot>,
}

impl<'a> ResourceRequest<'a> {
    /// Look up in `locale` before falling back.
    #[must_use]
    pub fn locale(mut self, locale: &'a Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Substitute `args` into the template's `{n}` placeholders.
    #[must_use]
    pub fn args(mut self, args: &'a [FluentValue<'a>]) -> Self {
        self.args = args;
        self
    }

    /// Read from `snapshot` instead of the store current at resolve time.
    ///
    /// Requests sharing one snapshot see the same store even if it is
    /// replaced between them.
    #[must_use]
    pub fn snapshot(mut self, snapshot: &'a StoreSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// The key being resolved.
    #[must_use]
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// The resolver this request runs against.
    #[must_use]
    pub fn resolver(&self) -> &'a ResourceResolver {
        self.resolver
    }

    /// Candidate locales this request will consult.
    #[must_use]
    pub fn candidates(&self) -> LocaleChain {
        self.resolver.candidates(self.locale)
    }

    /// Resolve and format the template, failing on a miss.
    pub fn resolve(self) -> Result<String, NotFoundError> {
        let chain = self.candidates();
        let current;
        let store: &dyn ResourceStore = match self.snapshot {
            Some(pinned) => pinned,
            None => {
                current = self.resolver.store.snapshot();
                &current
            }
        };
        let found = chain.iter().find_map(|locale| {
            store
                .lookup(self.key, locale)
                .map(|template| (locale.clone(), template.into_owned()))
        });

        match found {
            Some((locale, template)) => {
                trace!(
                    target: "almanac::resolver",
                    "resolved `{}` from locale `{locale}`",
                    self.key,
                );
                Ok(format_template(&template, self.args).into_owned())
            }
            None => {
                debug!(
                    target: "almanac::resolver",
                    "resource `{}` missing for locales [{chain}]",
                    self.key,
                );
                Err(NotFoundError::new(self.key, chain))
            }
        }
    }

    /// Resolve and format the template, returning `default` unmodified on a
    /// miss.
    #[must_use]
    pub fn resolve_or(self, default: &str) -> String {
        self.resolve().unwrap_or_else(|_| default.to_owned())
    }

    /// Resolve, format, and convert to `T`.
    pub fn convert<T: 'static>(self) -> Result<T, ResolveError> {
        let text = self.resolve()?;
        Ok(self.resolver.convert(&text)?)
    }

    /// Resolve, format, and convert to `T`; on a miss convert `default`.
    ///
    /// Only conversion failures surface, whether of the resolved text or of
    /// the default.
    pub fn convert_or<T: 'static>(self, default: &str) -> Result<T, ConversionError> {
        match self.resolve() {
            Ok(text) => self.resolver.convert(&text),
            Err(_) => self.resolver.convert(default),
        }
    }

    /// Resolve, format, and convert to `T`; on a miss return `default` as is.
    pub fn convert_or_value<T: 'static>(self, default: T) -> Result<T, ConversionError> {
        match self.resolve() {
            Ok(text) => self.resolver.convert(&text),
            Err(_) => Ok(default),
        }
    }
}
