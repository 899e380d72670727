use field_recognizer::{PhraseConfig, Recognizer, RecognizerContext, build_recognizer};
use field_recognizer_core::{EnumValue, FieldKind, FieldSchema, TermMatch, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sandwich_field() -> FieldSchema {
    FieldSchema::new(
        "sandwich",
        FieldKind::enumeration(vec![
            EnumValue::new("BLT").with_terms(["blt", "bacon lettuce tomato"]),
            EnumValue::new("BlackForestHam").with_terms(["black forest ham", "ham"]),
            EnumValue::new("Veggie").with_terms(["veggie", "vegetarian", "🥕"]),
            EnumValue::new("Red").with_terms(["red", "reddish"]),
        ]),
    )
    .with_terms(["sandwich", "sub"])
}

fn build(field: &FieldSchema) -> Recognizer {
    build_recognizer(field, &RecognizerContext::default()).unwrap()
}

fn all(recognizer: &Recognizer, input: &str, default: Option<&Value>) -> Vec<TermMatch> {
    recognizer.matches(input, default).collect()
}

fn choice(name: &str) -> Option<Value> {
    Some(Value::Choice(name.into()))
}

// ---------------------------------------------------------------------------
// Enumeration properties
// ---------------------------------------------------------------------------

#[test]
fn exact_term_matches_with_full_confidence_and_span() {
    let recognizer = build(&sandwich_field());
    let field = sandwich_field();
    let FieldKind::Enumeration { values, .. } = &field.kind else {
        unreachable!()
    };

    for value in values {
        let longest = value
            .terms
            .iter()
            .max_by_key(|t| t.chars().count())
            .unwrap();
        for input in [longest.clone(), longest.to_uppercase()] {
            let found = all(&recognizer, &input, None);
            let hit = found
                .iter()
                .find(|m| m.value == choice(&value.value))
                .unwrap_or_else(|| panic!("no match for {input:?}"));
            assert_eq!(hit.confidence, 1.0, "term {input:?}");
            assert_eq!((hit.start, hit.length), (0, input.len()), "term {input:?}");
        }
    }
}

#[test]
fn descriptions_with_metacharacters_match_themselves() {
    let field = FieldSchema::new(
        "order",
        FieldKind::enumeration(vec![
            EnumValue::new("Large").with_description("Large (12 in)"),
            EnumValue::new("C++"),
            EnumValue::new("Meal").with_description("$5 meal"),
            EnumValue::new("Combo").with_description("Combo [a+b]?"),
        ]),
    );
    let recognizer = build(&field);
    let FieldKind::Enumeration { values, .. } = &field.kind else {
        unreachable!()
    };

    for value in values {
        let input = value.description();
        let found = all(&recognizer, input, None);
        assert_eq!(
            found,
            vec![TermMatch::new(0, input.len(), 1.0, choice(&value.value))],
            "description {input:?}"
        );
    }
    assert!(all(&recognizer, "CCC", None).is_empty());
    assert!(all(&recognizer, "Combo ab", None).iter().all(|m| m.length == 5));
}

#[test]
fn ordinal_shortcut_selects_value() {
    let recognizer = build(&sandwich_field());
    for (ordinal, name) in ["BLT", "BlackForestHam", "Veggie", "Red"].iter().enumerate() {
        let input = (ordinal + 1).to_string();
        let found = all(&recognizer, &input, None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, choice(name));
        assert_eq!(found[0].confidence, 1.0);
    }
}

#[test]
fn blank_input_with_default_comes_first() {
    let recognizer = build(&sandwich_field());
    let default = Value::Choice("Veggie".into());
    let found = all(&recognizer, "", Some(&default));
    assert_eq!(found[0], TermMatch::new(0, 0, 1.0, Some(default.clone())));

    let found = all(&recognizer, "  ", Some(&default));
    assert_eq!(found[0], TermMatch::new(0, 2, 1.0, Some(default)));
}

#[test]
fn no_preference_phrase_is_always_none() {
    let recognizer = build(&sandwich_field().optional());
    let default = Value::Choice("BLT".into());
    for default in [None, Some(&default)] {
        let found = all(&recognizer, "no preference", default);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, None);
    }
}

#[test]
fn longer_term_sharing_prefix_wins() {
    let recognizer = build(&sandwich_field());
    let found = all(&recognizer, "reddish", None);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].value, choice("Red"));
    assert_eq!((found[0].start, found[0].length), (0, 7));
    assert_eq!(found[0].confidence, 1.0);
}

#[test]
fn symbolic_terms_match_inside_text() {
    let recognizer = build(&sandwich_field());
    let found = all(&recognizer, "one🥕please", None);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].value, choice("Veggie"));
    assert_eq!(found[0].confidence, 1.0);
    assert_eq!(found[0].start, 3);
}

#[test]
fn ambiguous_input_yields_several_candidates_in_entry_order() {
    let recognizer = build(&sandwich_field());
    let found = all(&recognizer, "ham or a blt", None);
    let values: Vec<_> = found.iter().map(|m| m.value.clone()).collect();
    assert_eq!(values, vec![choice("BLT"), choice("BlackForestHam")]);
    // "ham" is the short term of a 16-character reference
    assert!((found[1].confidence - 3.0 / 16.0).abs() < 1e-9);
}

#[test]
fn field_terms_route_without_values() {
    let recognizer = build(&sandwich_field());
    assert!(all(&recognizer, "change my sub", None).is_empty());
    let mentions = recognizer.field_mentions("change my sub");
    assert_eq!(mentions.len(), 1);
    assert_eq!(mentions[0].value, None);
}

#[test]
fn matching_stops_early() {
    let recognizer = build(&sandwich_field());
    let mut iter = recognizer.matches("blt ham veggie red", None);
    assert_eq!(iter.next().unwrap().value, choice("BLT"));
}

#[test]
fn identical_configuration_is_deterministic() {
    let a = build(&sandwich_field().optional());
    let b = build(&sandwich_field().optional());
    let default = Value::Choice("Red".into());
    for input in ["", "c", "ham and reddish 🥕", "3", "none", "sub", "nothing here"] {
        assert_eq!(
            all(&a, input, Some(&default)),
            all(&b, input, Some(&default)),
            "input {input:?}"
        );
        assert_eq!(all(&a, input, None), all(&a, input, None));
    }
}

#[test]
fn recognizer_is_shareable_across_threads() {
    let recognizer = std::sync::Arc::new(build(&sandwich_field()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let recognizer = std::sync::Arc::clone(&recognizer);
            std::thread::spawn(move || recognizer.matches("veggie", None).count())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1);
    }
}

// ---------------------------------------------------------------------------
// Primitive properties
// ---------------------------------------------------------------------------

#[test]
fn integer_bounds_are_inclusive() {
    let recognizer = build(&FieldSchema::new("n", FieldKind::integer(Some(-2), Some(12))));
    assert_eq!(all(&recognizer, "-2", None)[0].value, Some(Value::Integer(-2)));
    assert_eq!(all(&recognizer, "12", None)[0].value, Some(Value::Integer(12)));
    assert!(all(&recognizer, "-3", None).is_empty());
    assert!(all(&recognizer, "13", None).is_empty());
}

#[test]
fn real_bounds_are_inclusive() {
    let recognizer = build(&FieldSchema::new("x", FieldKind::real(Some(1.0), Some(3.0))));
    assert_eq!(all(&recognizer, "1", None)[0].value, Some(Value::Real(1.0)));
    assert_eq!(all(&recognizer, "3.0", None)[0].value, Some(Value::Real(3.0)));
    assert!(all(&recognizer, "0", None).is_empty());
    assert!(all(&recognizer, "4", None).is_empty());
}

#[test]
fn string_matches_anything_at_zero_confidence() {
    let recognizer = build(&FieldSchema::new("note", FieldKind::Text));
    for input in ["x", "hello world", "42", "yes"] {
        let found = all(&recognizer, input, None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].confidence, 0.0);
    }
    assert!(all(&recognizer, "", None).is_empty());
    assert!(all(&recognizer, " \t ", None).is_empty());
}

#[test]
fn boolean_configured_phrases() {
    let phrases = PhraseConfig {
        yes: vec!["yes".into(), "y".into()],
        no: vec!["no".into(), "n".into()],
        ..PhraseConfig::default()
    };
    let context = RecognizerContext::new(phrases).unwrap();
    let recognizer =
        build_recognizer(&FieldSchema::new("ok", FieldKind::Boolean), &context).unwrap();
    assert_eq!(all(&recognizer, "Y", None)[0].value, Some(Value::Bool(true)));
    assert_eq!(all(&recognizer, "n", None)[0].value, Some(Value::Bool(false)));
    assert!(all(&recognizer, "maybe", None).is_empty());
    assert!(all(&recognizer, "sure", None).is_empty());
}

#[test]
fn optional_primitive_no_preference() {
    let recognizer = build(&FieldSchema::new("n", FieldKind::integer(None, None)).optional());
    let default = Value::Integer(3);
    assert_eq!(all(&recognizer, "none", Some(&default))[0].value, None);
    assert_eq!(all(&recognizer, "c", Some(&default))[0].value, Some(default.clone()));
    assert_eq!(all(&recognizer, "5", Some(&default))[0].value, Some(Value::Integer(5)));
}

#[test]
fn help_for_optional_enumeration_with_default() {
    let recognizer = build(&sandwich_field().optional());
    let default = Value::Choice("Red".into());
    assert_eq!(
        recognizer.help(Some(&default)),
        "You can enter a number 1-5 or words from the descriptions. \
         (BLT, BlackForestHam, Veggie, Red, No Preference or Current Choice or 'c')"
    );
}
