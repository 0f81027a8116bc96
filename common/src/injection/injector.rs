use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, trace, warn};
use thiserror::Error;

use super::descriptor::MemberFailure;
use super::{ClassChain, Injectable};
use crate::resources::{ConversionError, FluentValue, ResourceResolver};

/// Failure reported by [`ResourceInjector::inject`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InjectionError {
    /// A member's declared default could not be converted to its type.
    #[error("default value declared on `{class}::{member}` (key `{key}`) is invalid: {source}")]
    InvalidDefault {
        /// Class declaring the member.
        class: String,
        /// Member name.
        member: String,
        /// Effective key that was missing.
        key: String,
        /// The conversion failure.
        #[source]
        source: ConversionError,
    },
}

type ChainCache = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

/// Populates [`Injectable`] values from a [`ResourceResolver`].
///
/// Ancestor chains are materialised once per type and cached.
pub struct ResourceInjector {
    resolver: ResourceResolver,
    chains: RwLock<ChainCache>,
}

impl ResourceInjector {
    /// Create an injector resolving through `resolver`.
    #[must_use]
    pub fn new(resolver: ResourceResolver) -> Self {
        Self {
            resolver,
            chains: RwLock::new(HashMap::new()),
        }
    }

    /// The resolver members are resolved through.
    #[must_use]
    pub const fn resolver(&self) -> &ResourceResolver {
        &self.resolver
    }

    /// Write every resolvable member of `target` in place.
    ///
    /// Each class in the chain is visited once and each of its members is
    /// processed once, all against the store current when the call began.
    /// Misses and conversion failures leave the member untouched. Every
    /// member is attempted before an
    /// [`InjectionError::InvalidDefault`] for the first malformed default is
    /// returned.
    ///
    /// ```
    /// use common::injection::{
    ///     ClassChain, ClassDescriptor, Injectable, InjectedResource, ResourceInjector,
    /// };
    /// use common::resources::{MapStore, ResourceResolver};
    /// use unic_langid::langid;
    ///
    /// #[derive(Default)]
    /// struct Banner {
    ///     title: String,
    ///     width: u32,
    ///     missing: String,
    /// }
    ///
    /// impl Injectable for Banner {
    ///     fn class_chain() -> ClassChain<Self> {
    ///         ClassChain::new(
    ///             ClassDescriptor::named("demo::Banner")
    ///                 .field("title", InjectedResource::new(), |b: &mut Self| &mut b.title)
    ///                 .field("width", InjectedResource::new(), |b: &mut Self| &mut b.width)
    ///                 .field("missing", InjectedResource::new(), |b: &mut Self| &mut b.missing),
    ///         )
    ///     }
    /// }
    ///
    /// let store = MapStore::builder()
    ///     .entry(langid!("en"), "demo::Banner.title", "Welcome")
    ///     .entry(langid!("en"), "demo::Banner.width", "80")
    ///     .build();
    /// let injector =
    ///     ResourceInjector::new(ResourceResolver::new(store).with_default_locale(langid!("en")));
    ///
    /// let mut banner = Banner::default();
    /// injector.inject(&mut banner)?;
    ///
    /// assert_eq!(banner.title, "Welcome");
    /// assert_eq!(banner.width, 80);
    /// assert!(banner.missing.is_empty());
    /// # Ok::<(), common::injection::InjectionError>(())
    /// ```
    pub fn inject<T: Injectable>(&self, target: &mut T) -> Result<(), InjectionError> {
        let chain = self.chain_for::<T>();
        let snapshot = self.resolver.store().snapshot();
        let mut first_invalid = None;

        for class in chain.classes() {
            for member in class.members() {
                let key = member.effective_key(class.name());
                let args: Vec<FluentValue<'_>> = member
                    .annotation()
                    .arguments()
                    .iter()
                    .map(|arg| FluentValue::from(arg.as_ref()))
                    .collect();
                let request = self
                    .resolver
                    .request(&key)
                    .args(&args)
                    .snapshot(&snapshot);

                match member.write(target, request) {
                    Ok(()) => trace!(
                        target: "almanac::injector",
                        "injected `{key}` into {} `{}::{}`",
                        member.kind(),
                        class.name(),
                        member.name(),
                    ),
                    Err(MemberFailure::Skipped(error)) => debug!(
                        target: "almanac::injector",
                        "skipping {} `{}::{}`: {error}",
                        member.kind(),
                        class.name(),
                        member.name(),
                    ),
                    Err(MemberFailure::InvalidDefault(source)) => {
                        warn!(
                            target: "almanac::injector",
                            "invalid default on {} `{}::{}` for `{key}`: {source}",
                            member.kind(),
                            class.name(),
                            member.name(),
                        );
                        if first_invalid.is_none() {
                            first_invalid = Some(InjectionError::InvalidDefault {
                                class: class.name().to_owned(),
                                member: member.name().to_owned(),
                                key: key.into_owned(),
                                source,
                            });
                        }
                    }
                }
            }
        }

        first_invalid.map_or(Ok(()), Err)
    }

    /// The cached ancestor chain for `T`, building it on first use.
    #[must_use]
    pub fn chain_for<T: Injectable>(&self) -> Arc<ClassChain<T>> {
        let id = TypeId::of::<T>();
        let cached = self
            .chains
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned();

        if let Some(chain) = cached.and_then(|entry| entry.downcast::<ClassChain<T>>().ok()) {
            return chain;
        }

        let chain = Arc::new(T::class_chain());
        debug!(
            target: "almanac::injector",
            "materialised chain for `{}`: [{}]",
            type_name::<T>(),
            chain.class_names().join(", "),
        );

        let erased: Arc<dyn Any + Send + Sync> = chain.clone();
        self.chains
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, erased);
        chain
    }
}

impl fmt::Debug for ResourceInjector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = self
            .chains
            .read()
            .map_or(0, |chains| chains.len());
        formatter
            .debug_struct("ResourceInjector")
            .field("resolver", &self.resolver)
            .field("cached_chains", &cached)
            .finish()
    }
}
