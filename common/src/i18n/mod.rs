//! Message lookup and default-locale selection.
//!
//! [`MessageSource`] is the String-only face of the
//! [`ResourceResolver`](crate::resources::ResourceResolver): the same lookup
//! and fallback rules, without conversion, reporting misses as
//! [`NoSuchMessage`].
//!
//! Locale selection is handled by [`resolve_locale`], which evaluates an
//! explicit override, the `ALMANAC_LOCALE` environment variable, and
//! configuration settings in priority order before falling back to `en`.

mod message_source;
mod selection;

pub use message_source::{MessageRequest, MessageSource, NoSuchMessage};
pub use selection::{LocaleSelection, LocaleSource, normalise_locale, resolve_locale};

#[cfg(test)]
mod tests;
