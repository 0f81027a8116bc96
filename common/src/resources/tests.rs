use rstest::{fixture, rstest};
use unic_langid::langid;

use super::{
    ConversionError, FluentValue, Locale, MapStore, ResolveError, ResourceResolver, StoreHandle,
};

const KEY_PROVERB: &str = "key.proverb";
const KEY_PROVERB_BOGUS: &str = "key.proverb.bogus";
const KEY_BOGUS: &str = "key.bogus";
const KEY_INTEGER: &str = "key.integer";
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
fn resolver() -> ResourceResolver {
    let store = MapStore::builder()
        .entries(
            english(),
            [
                (KEY_PROVERB, PROVERB_FORMAT),
                (KEY_INTEGER, "42"),
                ("key.colour", "colour"),
                ("key.greeting", "Hello"),
            ],
        )
        .entries(langid!("en-US"), [("key.colour", "color")])
        .entries(langid!("fr"), [("key.greeting", "Bonjour")])
        .build();

    ResourceResolver::new(store).with_default_locale(english())
}

#[rstest]
fn resolves_raw_templates_without_arguments(resolver: ResourceResolver) {
    let locale = english();

    assert_eq!(resolver.resolve(KEY_PROVERB).as_deref(), Ok(PROVERB_FORMAT));
    assert_eq!(
        resolver.request(KEY_PROVERB).locale(&locale).resolve().as_deref(),
        Ok(PROVERB_FORMAT)
    );
}

#[rstest]
fn formats_templates_with_arguments(resolver: ResourceResolver) {
    let locale = english();
    let args = two_args();

    assert_eq!(
        resolver.request(KEY_PROVERB).args(&args).resolve().as_deref(),
        Ok(PROVERB_TEXT)
    );
    assert_eq!(
        resolver
            .request(KEY_PROVERB)
            .args(&args)
            .locale(&locale)
            .resolve()
            .as_deref(),
        Ok(PROVERB_TEXT)
    );
}

#[rstest]
fn formatting_is_idempotent(resolver: ResourceResolver) {
    let args = two_args();
    let request = resolver.request(KEY_PROVERB).args(&args);

    assert_eq!(request.resolve(), request.resolve());
}

#[rstest]
fn swapping_arguments_swaps_slots(resolver: ResourceResolver) {
    let args = vec![FluentValue::from("doctor"), FluentValue::from("apple")];

    assert_eq!(
        resolver.request(KEY_PROVERB).args(&args).resolve().as_deref(),
        Ok("An doctor a day keeps the apple away")
    );
}

#[rstest]
fn defaults_replace_misses(resolver: ResourceResolver) {
    let locale = english();
    let args = two_args();

    assert_eq!(resolver.resolve_or(KEY_PROVERB_BOGUS, DEFAULT_VALUE), DEFAULT_VALUE);
    assert_eq!(
        resolver
            .request(KEY_PROVERB_BOGUS)
            .locale(&locale)
            .resolve_or(DEFAULT_VALUE),
        DEFAULT_VALUE
    );
    assert_eq!(
        resolver
            .request(KEY_PROVERB_BOGUS)
            .args(&args)
            .resolve_or(DEFAULT_VALUE),
        DEFAULT_VALUE
    );
    assert_eq!(
        resolver
            .request(KEY_PROVERB_BOGUS)
            .args(&args)
            .locale(&locale)
            .resolve_or("{0} is returned verbatim"),
        "{0} is returned verbatim"
    );
}

#[rstest]
fn defaults_do_not_mask_hits(resolver: ResourceResolver) {
    assert_eq!(resolver.resolve_or(KEY_PROVERB, DEFAULT_VALUE), PROVERB_FORMAT);
}

#[rstest]
fn converts_resolved_values(resolver: ResourceResolver) {
    let locale = english();
    let args = two_args();

    assert_eq!(resolver.resolve_converted::<i32>(KEY_INTEGER), Ok(42));
    assert_eq!(
        resolver.request(KEY_INTEGER).locale(&locale).convert::<i32>(),
        Ok(42)
    );
    assert_eq!(
        resolver.request(KEY_INTEGER).args(&args).convert::<i32>(),
        Ok(42)
    );
    assert_eq!(
        resolver
            .request(KEY_INTEGER)
            .args(&args)
            .locale(&locale)
            .convert::<i64>(),
        Ok(42)
    );
}

#[rstest]
fn converted_defaults_replace_misses(resolver: ResourceResolver) {
    let locale = english();
    let args = two_args();

    assert_eq!(resolver.resolve_converted_or::<i32>(KEY_BOGUS, "21"), Ok(21));
    assert_eq!(resolver.request(KEY_BOGUS).convert_or_value(21), Ok(21));
    assert_eq!(
        resolver
            .request(KEY_BOGUS)
            .locale(&locale)
            .convert_or_value(21),
        Ok(21)
    );
    assert_eq!(
        resolver.request(KEY_BOGUS).args(&args).convert_or::<i32>("21"),
        Ok(21)
    );
    assert_eq!(
        resolver
            .request(KEY_BOGUS)
            .args(&args)
            .locale(&locale)
            .convert_or::<u8>("21"),
        Ok(21)
    );
}

#[rstest]
fn misses_report_key_and_chain(resolver: ResourceResolver) {
    let locale = langid!("de-CH");

    let error = resolver
        .request(KEY_BOGUS)
        .locale(&locale)
        .resolve()
        .err()
        .unwrap_or_else(|| panic!("`{KEY_BOGUS}` should be missing"));

    assert_eq!(error.key(), KEY_BOGUS);
    assert_eq!(error.tried().to_string(), "de-CH, de, en");
    assert_eq!(
        error.to_string(),
        "resource `key.bogus` missing for locales [de-CH, de, en]"
    );
}

#[rstest]
fn strict_variants_fail_on_misses(resolver: ResourceResolver) {
    let locale = english();
    let args = two_args();

    assert!(resolver.resolve(KEY_BOGUS).is_err());
    assert!(resolver.request(KEY_BOGUS).locale(&locale).resolve().is_err());
    assert!(resolver.request(KEY_BOGUS).args(&args).resolve().is_err());
    assert!(
        resolver
            .request(KEY_BOGUS)
            .args(&args)
            .locale(&locale)
            .resolve()
            .is_err()
    );
}

#[rstest]
fn strict_conversions_fail_on_misses(resolver: ResourceResolver) {
    let locale = english();
    let args = two_args();

    let outcomes = [
        resolver.resolve_converted::<i32>(KEY_BOGUS),
        resolver.request(KEY_BOGUS).locale(&locale).convert::<i32>(),
        resolver.request(KEY_BOGUS).args(&args).convert::<i32>(),
        resolver
            .request(KEY_BOGUS)
            .args(&args)
            .locale(&locale)
            .convert::<i32>(),
    ];

    for outcome in outcomes {
        assert!(
            matches!(outcome, Err(ResolveError::NotFound(_))),
            "unexpected outcome: {outcome:?}"
        );
    }
}

#[rstest]
fn conversion_failures_surface(resolver: ResourceResolver) {
    assert!(matches!(
        resolver.resolve_converted::<i32>(KEY_PROVERB),
        Err(ResolveError::Conversion(ConversionError::Rejected { .. }))
    ));
    assert!(matches!(
        resolver.resolve_converted_or::<i32>(KEY_BOGUS, "twenty-one"),
        Err(ConversionError::Rejected { .. })
    ));
    assert!(matches!(
        resolver.resolve_converted_or::<i32>(KEY_PROVERB, "21"),
        Err(ConversionError::Rejected { .. })
    ));
}

#[rstest]
#[case(langid!("en-US"), "color")]
#[case(langid!("en-AU"), "colour")]
#[case(langid!("fr-CA"), "colour")]
fn regional_variants_fall_back_through_language(
    resolver: ResourceResolver,
    #[case] locale: Locale,
    #[case] expected: &str,
) {
    assert_eq!(
        resolver.request("key.colour").locale(&locale).resolve().as_deref(),
        Ok(expected)
    );
}

#[rstest]
fn language_candidate_precedes_default(resolver: ResourceResolver) {
    let locale = langid!("fr-BE");

    assert_eq!(
        resolver.request("key.greeting").locale(&locale).resolve().as_deref(),
        Ok("Bonjour")
    );
}

#[rstest]
fn pinned_default_locale_drives_unlocalised_requests(resolver: ResourceResolver) {
    let french = resolver.clone().with_default_locale(langid!("fr"));

    assert_eq!(french.resolve("key.greeting").as_deref(), Ok("Bonjour"));
    assert!(french.resolve(KEY_PROVERB).is_err());
}

#[rstest]
fn reloads_are_observed_by_later_calls(resolver: ResourceResolver) {
    let replacement = MapStore::builder()
        .entry(english(), KEY_PROVERB, "Reloaded")
        .build();

    resolver.store().replace(replacement);

    assert_eq!(resolver.resolve(KEY_PROVERB).as_deref(), Ok("Reloaded"));
    assert!(resolver.resolve(KEY_INTEGER).is_err());
}

#[rstest]
fn pinned_snapshots_ignore_later_reloads(resolver: ResourceResolver) {
    let snapshot = resolver.store().snapshot();

    resolver.store().replace(MapStore::default());

    assert_eq!(
        resolver
            .request(KEY_PROVERB)
            .snapshot(&snapshot)
            .resolve()
            .as_deref(),
        Ok(PROVERB_FORMAT)
    );
    assert!(resolver.request(KEY_PROVERB).resolve().is_err());
}

#[rstest]
fn resolvers_are_shareable_across_threads() {
    let handle = StoreHandle::from(
        MapStore::builder()
            .entry(english(), KEY_INTEGER, "42")
            .build(),
    );
    let resolver = ResourceResolver::new(handle).with_default_locale(english());

    std::thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| resolver.resolve_converted::<i32>(KEY_INTEGER)))
            .collect();
        for worker in workers {
            assert_eq!(worker.join().ok(), Some(Ok(42)));
        }
    });
}
