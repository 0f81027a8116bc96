//! Pluggable string-to-type conversion.
//!
//! Converters are keyed by the [`TypeId`] of their output so both the
//! resolver and the injector can ask for "this text as a `T`" without knowing
//! how `T` is parsed. Built-in converters are locale-independent: numbers use
//! Rust's `FromStr` grammar after trimming surrounding whitespace.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::ConversionError;

type Converter<T> = Box<dyn Fn(&str) -> Result<T, String> + Send + Sync>;

struct Registration {
    type_name: &'static str,
    converter: Box<dyn Any + Send + Sync>,
}

/// Registry of converters from resolved text to typed values.
pub struct ConverterRegistry {
    converters: HashMap<TypeId, Registration>,
}

impl ConverterRegistry {
    /// Create a registry holding the built-in converters.
    ///
    /// ```
    /// use common::resources::ConverterRegistry;
    ///
    /// let registry = ConverterRegistry::new();
    /// assert_eq!(registry.convert::<i32>("42"), Ok(42));
    /// assert_eq!(registry.convert::<String>(" text "), Ok(" text ".to_owned()));
    /// assert!(registry.convert::<i32>("forty-two").is_err());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(|raw: &str| Ok::<_, std::convert::Infallible>(raw.to_owned()));
        registry
            .register_from_str::<i8>()
            .register_from_str::<i16>()
            .register_from_str::<i32>()
            .register_from_str::<i64>()
            .register_from_str::<i128>()
            .register_from_str::<isize>()
            .register_from_str::<u8>()
            .register_from_str::<u16>()
            .register_from_str::<u32>()
            .register_from_str::<u64>()
            .register_from_str::<u128>()
            .register_from_str::<usize>()
            .register_from_str::<f32>()
            .register_from_str::<f64>()
            .register_from_str::<char>()
            .register(parse_bool);
        registry
    }

    /// Create a registry without any converters.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Register `convert` as the converter for `T`, replacing any previous one.
    ///
    /// ```
    /// use common::resources::ConverterRegistry;
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct Colour(u8, u8, u8);
    ///
    /// let mut registry = ConverterRegistry::new();
    /// registry.register(|raw: &str| {
    ///     let hex = raw.strip_prefix('#').ok_or("missing `#`")?;
    ///     let channel = |at: usize| {
    ///         hex.get(at..at + 2)
    ///             .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    ///             .ok_or("bad channel")
    ///     };
    ///     Ok::<_, &str>(Colour(channel(0)?, channel(2)?, channel(4)?))
    /// });
    ///
    /// assert_eq!(registry.convert::<Colour>("#ff8000"), Ok(Colour(255, 128, 0)));
    /// ```
    pub fn register<T, E, F>(&mut self, convert: F) -> &mut Self
    where
        T: 'static,
        E: fmt::Display,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        let converter: Converter<T> =
            Box::new(move |raw: &str| convert(raw).map_err(|error| error.to_string()));
        self.converters.insert(
            TypeId::of::<T>(),
            Registration {
                type_name: type_name::<T>(),
                converter: Box::new(converter),
            },
        );
        self
    }

    /// Register `T`'s [`FromStr`] implementation, trimming the input first.
    pub fn register_from_str<T>(&mut self) -> &mut Self
    where
        T: FromStr + 'static,
        T::Err: fmt::Display,
    {
        self.register(|raw: &str| raw.trim().parse::<T>())
    }

    /// Whether a converter is registered for `T`.
    #[must_use]
    pub fn supports<T: 'static>(&self) -> bool {
        self.converters.contains_key(&TypeId::of::<T>())
    }

    /// Convert `raw` into a `T` using the registered converter.
    pub fn convert<T: 'static>(&self, raw: &str) -> Result<T, ConversionError> {
        let target = type_name::<T>();
        let converter = self
            .converters
            .get(&TypeId::of::<T>())
            .and_then(|registration| registration.converter.downcast_ref::<Converter<T>>())
            .ok_or(ConversionError::Unsupported { target })?;

        converter(raw).map_err(|reason| ConversionError::Rejected {
            input: raw.to_owned(),
            target,
            reason,
        })
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self
            .converters
            .values()
            .map(|registration| registration.type_name)
            .collect();
        names.sort_unstable();
        formatter
            .debug_struct("ConverterRegistry")
            .field("types", &names)
            .finish()
    }
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(String::from("expected `true` or `false`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn registry() -> ConverterRegistry {
        ConverterRegistry::new()
    }

    #[rstest]
    #[case("42", 42)]
    #[case(" 42\n", 42)]
    #[case("-7", -7)]
    #[case("+3", 3)]
    fn parses_integers(registry: ConverterRegistry, #[case] raw: &str, #[case] expected: i32) {
        assert_eq!(registry.convert::<i32>(raw), Ok(expected));
    }

    #[rstest]
    #[case("1.5", 1.5)]
    #[case("1e3", 1000.0)]
    fn parses_floats_without_locale_grouping(
        registry: ConverterRegistry,
        #[case] raw: &str,
        #[case] expected: f64,
    ) {
        let value = registry
            .convert::<f64>(raw)
            .unwrap_or_else(|error| panic!("{error}"));
        assert!((value - expected).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case("1,5")]
    #[case("1 000")]
    fn rejects_locale_formatted_numbers(registry: ConverterRegistry, #[case] raw: &str) {
        assert!(matches!(
            registry.convert::<f64>(raw),
            Err(ConversionError::Rejected { .. })
        ));
    }

    #[rstest]
    #[case("true", true)]
    #[case("FALSE", false)]
    #[case(" True ", true)]
    fn parses_booleans(registry: ConverterRegistry, #[case] raw: &str, #[case] expected: bool) {
        assert_eq!(registry.convert::<bool>(raw), Ok(expected));
    }

    #[rstest]
    fn identity_keeps_whitespace(registry: ConverterRegistry) {
        assert_eq!(
            registry.convert::<String>("  padded  "),
            Ok(String::from("  padded  "))
        );
    }

    #[rstest]
    fn rejection_reports_input_and_target(registry: ConverterRegistry) {
        let error = registry.convert::<u8>("300");

        match error {
            Err(ConversionError::Rejected { input, target, .. }) => {
                assert_eq!(input, "300");
                assert_eq!(target, "u8");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[rstest]
    fn unknown_types_are_unsupported(registry: ConverterRegistry) {
        struct Unregistered;

        assert!(!registry.supports::<Unregistered>());
        assert!(matches!(
            registry.convert::<Unregistered>("anything"),
            Err(ConversionError::Unsupported { .. })
        ));
    }

    #[rstest]
    fn empty_registry_supports_nothing() {
        let registry = ConverterRegistry::empty();

        assert!(!registry.supports::<String>());
        assert_eq!(
            registry.convert::<i32>("42"),
            Err(ConversionError::Unsupported { target: "i32" })
        );
    }

    #[rstest]
    fn registrations_replace_builtins(mut registry: ConverterRegistry) {
        registry.register(|raw: &str| {
            raw.trim()
                .strip_suffix('%')
                .unwrap_or(raw)
                .parse::<i32>()
        });

        assert_eq!(registry.convert::<i32>("50%"), Ok(50));
    }

    #[rstest]
    fn debug_lists_registered_types() {
        let mut registry = ConverterRegistry::empty();
        registry.register_from_str::<u16>();

        assert_eq!(format!("{registry:?}"), "ConverterRegistry { types: [\"u16\"] }");
    }
}
