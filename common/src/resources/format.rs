use std::borrow::Cow;

use super::FluentValue;

/// Substitute `{n}` placeholders in `template` with positional `args`.
///
/// An empty argument list returns the template untouched, placeholders
/// included. Placeholders whose index is out of range, tokens that are not a
/// plain decimal index, and unbalanced braces are copied through verbatim.
///
/// ```
/// use common::resources::{FluentValue, format_template};
///
/// let args = [FluentValue::from("apple"), FluentValue::from("doctor")];
/// assert_eq!(
///     format_template("An {0} a day keeps the {1} away", &args),
///     "An apple a day keeps the doctor away",
/// );
/// assert_eq!(format_template("An {0} a day", &[]), "An {0} a day");
/// ```
#[must_use]
pub fn format_template<'t>(template: &'t str, args: &[FluentValue<'_>]) -> Cow<'t, str> {
    if args.is_empty() || !template.contains('{') {
        return Cow::Borrowed(template);
    }

    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let (literal, tail) = rest.split_at(open);
        output.push_str(literal);
        let after_brace = tail.get(1..).unwrap_or_default();

        match placeholder(after_brace, args) {
            Some((text, consumed)) => {
                output.push_str(&text);
                rest = after_brace.get(consumed..).unwrap_or_default();
            }
            None => {
                output.push('{');
                rest = after_brace;
            }
        }
    }
    output.push_str(rest);

    Cow::Owned(output)
}

/// Parse `digits}` at the start of `input`, returning the rendered argument
/// and the number of bytes consumed including the closing brace.
fn placeholder<'a>(input: &str, args: &'a [FluentValue<'_>]) -> Option<(Cow<'a, str>, usize)> {
    let digits = input.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let (index, tail) = input.split_at(digits);
    if !tail.starts_with('}') {
        return None;
    }

    let argument = args.get(index.parse::<usize>().ok()?)?;
    Some((render(argument)?, digits + 1))
}

fn render<'a>(value: &'a FluentValue<'_>) -> Option<Cow<'a, str>> {
    match value {
        FluentValue::String(text) => Some(Cow::Borrowed(text.as_ref())),
        FluentValue::Number(number) => Some(number.as_string()),
        _ => None,
    }
}
