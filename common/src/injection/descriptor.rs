//! Registration tables describing injectable members.
//!
//! A [`ClassDescriptor`] lists the members one type declares itself. A
//! [`ClassChain`] strings descriptors together from the concrete type up to
//! its root ancestor; ancestors are lifted into the concrete type through a
//! projection to the embedded ancestor value.

use std::any::type_name;
use std::borrow::Cow;
use std::fmt;

use log::warn;

use crate::resources::{ConversionError, ResolveError, ResourceRequest};

/// Why a member was left untouched.
pub(crate) enum MemberFailure {
    /// The strict lookup or its conversion failed.
    Skipped(ResolveError),
    /// The declared default could not be converted.
    InvalidDefault(ConversionError),
}

type Writer<T> = Box<
    dyn Fn(&mut T, ResourceRequest<'_>, Option<&str>) -> Result<(), MemberFailure> + Send + Sync,
>;

fn writer<T, F>(write: F) -> Writer<T>
where
    F: Fn(&mut T, ResourceRequest<'_>, Option<&str>) -> Result<(), MemberFailure>
        + Send
        + Sync
        + 'static,
{
    Box::new(write)
}

/// Resolve a member value, preferring the store and then the declared default.
fn resolve_value<V: 'static>(
    request: ResourceRequest<'_>,
    default: Option<&str>,
) -> Result<V, MemberFailure> {
    match (request.convert::<V>(), default) {
        (Ok(value), _) => Ok(value),
        (Err(ResolveError::NotFound(_)), Some(default)) => request
            .resolver()
            .convert::<V>(default)
            .map_err(MemberFailure::InvalidDefault),
        (Err(error), _) => Err(MemberFailure::Skipped(error)),
    }
}

/// Injection metadata attached to a member.
///
/// ```
/// use common::injection::InjectedResource;
///
/// let annotation = InjectedResource::new()
///     .key("sample.key.with_args")
///     .args(["1", "2"])
///     .default_value("DEFAULT");
/// assert_eq!(annotation.explicit_key(), Some("sample.key.with_args"));
/// assert_eq!(annotation.arguments().len(), 2);
/// assert_eq!(annotation.declared_default(), Some("DEFAULT"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InjectedResource {
    key: Option<Cow<'static, str>>,
    args: Vec<Cow<'static, str>>,
    default_value: Option<Cow<'static, str>>,
}

impl InjectedResource {
    /// Metadata with a derived key, no arguments, and no default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `key` instead of the derived key.
    #[must_use]
    pub fn key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Substitute `args` into the resolved template.
    #[must_use]
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Cow<'static, str>>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Use `value` when the key is missing.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Cow<'static, str>>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// The explicit key, if one was declared.
    #[must_use]
    pub fn explicit_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The literal arguments.
    #[must_use]
    pub fn arguments(&self) -> &[Cow<'static, str>] {
        &self.args
    }

    /// The declared default, if any.
    #[must_use]
    pub fn declared_default(&self) -> Option<&str> {
        self.default_value.as_deref()
    }
}

/// How a member receives its value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MemberKind {
    /// Written directly through a mutable accessor.
    Field,
    /// Passed to a single-argument setter.
    Setter,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field => formatter.write_str("field"),
            Self::Setter => formatter.write_str("setter"),
        }
    }
}

/// A field or setter registered for injection on `T`.
pub struct Member<T> {
    name: Cow<'static, str>,
    kind: MemberKind,
    annotation: InjectedResource,
    value_type: &'static str,
    write: Writer<T>,
}

impl<T: 'static> Member<T> {
    /// Register a field reached through `access`.
    pub fn field<V, F>(
        name: impl Into<Cow<'static, str>>,
        annotation: InjectedResource,
        access: F,
    ) -> Self
    where
        V: 'static,
        F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: MemberKind::Field,
            annotation,
            value_type: type_name::<V>(),
            write: writer(move |target: &mut T, request, default| {
                *access(target) = resolve_value::<V>(request, default)?;
                Ok(())
            }),
        }
    }

    /// Register a setter; `name` is the setter's own name, e.g. `set_value`.
    pub fn setter<V, F>(
        name: impl Into<Cow<'static, str>>,
        annotation: InjectedResource,
        set: F,
    ) -> Self
    where
        V: 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: MemberKind::Setter,
            annotation,
            value_type: type_name::<V>(),
            write: writer(move |target: &mut T, request, default| {
                set(target, resolve_value::<V>(request, default)?);
                Ok(())
            }),
        }
    }

    /// Re-target this member at `U`, reaching `T` through `project`.
    fn lift<U: 'static>(self, project: fn(&mut U) -> &mut T) -> Member<U> {
        let write = self.write;
        Member {
            name: self.name,
            kind: self.kind,
            annotation: self.annotation,
            value_type: self.value_type,
            write: writer(move |target: &mut U, request, default| {
                write(project(target), request, default)
            }),
        }
    }

    pub(crate) fn write(
        &self,
        target: &mut T,
        request: ResourceRequest<'_>,
    ) -> Result<(), MemberFailure> {
        (self.write)(target, request, self.annotation.declared_default())
    }
}

impl<T> Member<T> {
    /// The member's declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field or setter.
    #[must_use]
    pub const fn kind(&self) -> MemberKind {
        self.kind
    }

    /// The injection metadata.
    #[must_use]
    pub const fn annotation(&self) -> &InjectedResource {
        &self.annotation
    }

    /// Name of the member's static type, used as the conversion target.
    #[must_use]
    pub const fn value_type(&self) -> &'static str {
        self.value_type
    }

    /// The member's name as used in derived keys.
    ///
    /// Fields use their own name. Setters drop a leading `set` (and the `_`
    /// after it in snake case) and lower-case the next character, so both
    /// `setValue` and `set_value` become `value`.
    #[must_use]
    pub fn logical_name(&self) -> Cow<'_, str> {
        match self.kind {
            MemberKind::Field => Cow::Borrowed(self.name.as_ref()),
            MemberKind::Setter => setter_property(&self.name),
        }
    }

    /// The explicit key, or `<class>.<logical name>`.
    #[must_use]
    pub fn effective_key(&self, class: &str) -> Cow<'_, str> {
        match self.annotation.explicit_key() {
            Some(key) => Cow::Borrowed(key),
            None => Cow::Owned(format!("{class}.{}", self.logical_name())),
        }
    }
}

impl<T> fmt::Debug for Member<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Member")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("annotation", &self.annotation)
            .field("value_type", &self.value_type)
            .finish_non_exhaustive()
    }
}

fn setter_property(name: &str) -> Cow<'_, str> {
    let Some(rest) = name.strip_prefix("set") else {
        return Cow::Borrowed(name);
    };
    let rest = rest.strip_prefix('_').unwrap_or(rest);
    let mut chars = rest.chars();

    match chars.next() {
        Some(first) => Cow::Owned(first.to_lowercase().chain(chars).collect()),
        None => Cow::Borrowed(name),
    }
}

/// The members one type declares itself, under its fully qualified name.
pub struct ClassDescriptor<T> {
    name: Cow<'static, str>,
    members: Vec<Member<T>>,
}

impl<T: 'static> ClassDescriptor<T> {
    /// Describe `T` under its fully qualified type name.
    #[must_use]
    pub fn new() -> Self {
        Self::named(type_name::<T>())
    }

    /// Describe `T` under an explicit class name.
    #[must_use]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Register a field reached through `access`.
    #[must_use]
    pub fn field<V, F>(
        self,
        name: impl Into<Cow<'static, str>>,
        annotation: InjectedResource,
        access: F,
    ) -> Self
    where
        V: 'static,
        F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.member(Member::field(name, annotation, access))
    }

    /// Register a single-argument setter.
    #[must_use]
    pub fn setter<V, F>(
        self,
        name: impl Into<Cow<'static, str>>,
        annotation: InjectedResource,
        set: F,
    ) -> Self
    where
        V: 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.member(Member::setter(name, annotation, set))
    }

    /// Register a pre-built member.
    #[must_use]
    pub fn member(mut self, member: Member<T>) -> Self {
        self.members.push(member);
        self
    }

    fn lift<U: 'static>(self, project: fn(&mut U) -> &mut T) -> ClassDescriptor<U> {
        ClassDescriptor {
            name: self.name,
            members: self
                .members
                .into_iter()
                .map(|member| member.lift(project))
                .collect(),
        }
    }
}

impl<T: 'static> Default for ClassDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ClassDescriptor<T> {
    /// The class name derived keys are scoped by.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The members this class declares.
    #[must_use]
    pub fn members(&self) -> &[Member<T>] {
        &self.members
    }
}

impl<T> fmt::Debug for ClassDescriptor<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("members", &self.members)
            .finish()
    }
}

/// Class descriptors from a concrete type up to its root ancestor.
///
/// ```
/// use common::injection::{ClassChain, ClassDescriptor, InjectedResource};
///
/// #[derive(Default)]
/// struct Base {
///     title: String,
/// }
///
/// #[derive(Default)]
/// struct Page {
///     base: Base,
///     body: String,
/// }
///
/// let base = ClassChain::new(
///     ClassDescriptor::<Base>::named("demo::Base")
///         .field("title", InjectedResource::new(), |base: &mut Base| &mut base.title),
/// );
/// let page = ClassChain::new(
///     ClassDescriptor::<Page>::named("demo::Page")
///         .field("body", InjectedResource::new(), |page: &mut Page| &mut page.body),
/// )
/// .inherit(base, |page| &mut page.base);
///
/// assert_eq!(page.class_names(), vec!["demo::Page", "demo::Base"]);
/// assert_eq!(page.member_count(), 2);
/// ```
pub struct ClassChain<T> {
    classes: Vec<ClassDescriptor<T>>,
}

impl<T: 'static> ClassChain<T> {
    /// Start a chain at the concrete class.
    #[must_use]
    pub fn new(concrete: ClassDescriptor<T>) -> Self {
        Self {
            classes: vec![concrete],
        }
    }

    /// Append an ancestor's chain, reached through `project`.
    ///
    /// Classes already present are skipped so each is visited once.
    #[must_use]
    pub fn inherit<B: 'static>(
        mut self,
        ancestors: ClassChain<B>,
        project: fn(&mut T) -> &mut B,
    ) -> Self {
        for class in ancestors.classes {
            if self.classes.iter().any(|known| known.name == class.name) {
                warn!(
                    target: "almanac::injector",
                    "class `{}` appears twice in the ancestor chain; keeping the first",
                    class.name,
                );
                continue;
            }
            self.classes.push(class.lift(project));
        }
        self
    }
}

impl<T> ClassChain<T> {
    /// The classes in visiting order, concrete first.
    #[must_use]
    pub fn classes(&self) -> &[ClassDescriptor<T>] {
        &self.classes
    }

    /// Class names in visiting order.
    #[must_use]
    pub fn class_names(&self) -> Vec<&str> {
        self.classes.iter().map(ClassDescriptor::name).collect()
    }

    /// Total members across every class.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.classes.iter().map(|class| class.members.len()).sum()
    }
}

impl<T> fmt::Debug for ClassChain<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(&self.classes).finish()
    }
}
