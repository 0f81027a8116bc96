use rstest::{fixture, rstest};
use unic_langid::langid;

use super::{MessageSource, NoSuchMessage};
use crate::resources::{FluentValue, Locale, MapStore, ResourceResolver};

const KEY_PROVERB: &str = "key.proverb";
const KEY_PROVERB_BOGUS: &str = "key.proverb.bogus";
const KEY_BOGUS: &str = "key.bogus";
const PROVERB_FORMAT: &str = "An {0} a day keeps the {1} away";
const PROVERB_TEXT: &str = "An apple a day keeps the doctor away";
const DEFAULT_VALUE: &str = "not found";

fn two_args() -> Vec<FluentValue<'static>> {
    vec![FluentValue::from("apple"), FluentValue::from("doctor")]
}

fn english() -> Locale {
    langid!("en")
}

#[fixture]
fn messages() -> MessageSource {
    let store = MapStore::builder()
        .entry(english(), KEY_PROVERB, PROVERB_FORMAT)
        .build();

    MessageSource::new(ResourceResolver::new(store).with_default_locale(english()))
}

#[rstest]
fn fetches_messages_with_and_without_arguments(messages: MessageSource) {
    let locale = english();
    let args = two_args();

    assert_eq!(messages.message(KEY_PROVERB).as_deref(), Ok(PROVERB_FORMAT));
    assert_eq!(
        messages.request(KEY_PROVERB).locale(&locale).get().as_deref(),
        Ok(PROVERB_FORMAT)
    );
    assert_eq!(
        messages.request(KEY_PROVERB).args(&args).get().as_deref(),
        Ok(PROVERB_TEXT)
    );
    assert_eq!(
        messages
            .request(KEY_PROVERB)
            .args(&args)
            .locale(&locale)
            .get()
            .as_deref(),
        Ok(PROVERB_TEXT)
    );
}

#[rstest]
fn defaults_replace_missing_messages(messages: MessageSource) {
    let locale = english();
    let args = two_args();

    assert_eq!(messages.message_or(KEY_PROVERB_BOGUS, DEFAULT_VALUE), DEFAULT_VALUE);
    assert_eq!(
        messages
            .request(KEY_PROVERB_BOGUS)
            .locale(&locale)
            .get_or(DEFAULT_VALUE),
        DEFAULT_VALUE
    );
    assert_eq!(
        messages
            .request(KEY_PROVERB_BOGUS)
            .args(&args)
            .get_or(DEFAULT_VALUE),
        DEFAULT_VALUE
    );
    assert_eq!(
        messages
            .request(KEY_PROVERB_BOGUS)
            .args(&args)
            .locale(&locale)
            .get_or(DEFAULT_VALUE),
        DEFAULT_VALUE
    );
}

#[rstest]
fn unknown_keys_raise_no_such_message(messages: MessageSource) {
    let locale = english();
    let args = two_args();

    let outcomes: [Result<String, NoSuchMessage>; 4] = [
        messages.message(KEY_BOGUS),
        messages.request(KEY_BOGUS).locale(&locale).get(),
        messages.request(KEY_BOGUS).args(&args).get(),
        messages.request(KEY_BOGUS).args(&args).locale(&locale).get(),
    ];

    for outcome in outcomes {
        let error = outcome
            .err()
            .unwrap_or_else(|| panic!("`{KEY_BOGUS}` should be missing"));
        assert_eq!(error.key(), KEY_BOGUS);
        assert_eq!(error.tried().to_string(), "en");
    }
}

#[rstest]
fn agrees_with_the_resolver(messages: MessageSource) {
    let args = two_args();
    let resolver = messages.resolver();

    assert_eq!(
        messages.request(KEY_PROVERB).args(&args).get().ok(),
        resolver.request(KEY_PROVERB).args(&args).resolve().ok()
    );
    assert_eq!(
        messages.message(KEY_BOGUS).map_err(|error| error.to_string()),
        Err(String::from("message `key.bogus` missing for locales [en]"))
    );
}
