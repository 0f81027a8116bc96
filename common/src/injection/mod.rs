//! Writes resolved resources into registered members of arbitrary types.
//!
//! Types opt in by implementing [`Injectable`], which hands the injector a
//! [`ClassChain`]: the members each class in the type's ancestry declares,
//! concrete class first. Rust has no inheritance, so an "ancestor" is a value
//! embedded in the concrete type and reached through a projection.
//!
//! Injection is lenient. A member whose key is missing, or whose template
//! does not convert, is left as it was and the injector moves on. The one
//! failure reported back is a declared default that cannot be converted,
//! which is a configuration bug rather than a missing resource.

mod descriptor;
mod injector;

pub use descriptor::{ClassChain, ClassDescriptor, InjectedResource, Member, MemberKind};
pub use injector::{InjectionError, ResourceInjector};

/// Capability supplying a type's injection metadata.
///
/// ```
/// use common::injection::{ClassChain, ClassDescriptor, Injectable, InjectedResource};
///
/// #[derive(Default)]
/// struct Banner {
///     title: String,
/// }
///
/// impl Injectable for Banner {
///     fn class_chain() -> ClassChain<Self> {
///         ClassChain::new(ClassDescriptor::new().field(
///             "title",
///             InjectedResource::new().key("banner.title"),
///             |banner: &mut Self| &mut banner.title,
///         ))
///     }
/// }
///
/// assert_eq!(Banner::class_chain().member_count(), 1);
/// ```
pub trait Injectable: Sized + 'static {
    /// Descriptors for this type followed by each ancestor, each class once.
    fn class_chain() -> ClassChain<Self>;
}
