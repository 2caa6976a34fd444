use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use serde_json::json;

use super::*;

fn mixed_schema() -> Vec<Element> {
	vec![Element::Label, Element::Input, Element::Label, Element::Toggle]
}

#[test]
fn compacted_reply_is_spread_over_non_label_slots() {
	let values = reconcile(vec![json!("hello"), json!(true)], &mixed_schema()).unwrap();
	assert_eq!(values, vec![json!(null), json!("hello"), json!(null), json!(true)]);
}

#[test]
fn full_reply_is_unchanged() {
	let full = vec![json!(null), json!("hello"), json!(null), json!(true)];
	assert_eq!(reconcile(full.clone(), &mixed_schema()).unwrap(), full);
}

#[test]
fn both_layouts_validate_to_the_same_values() {
	let short = validate_modal(r#"["hello", true]"#, &mixed_schema()).unwrap();
	let full = validate_modal(r#"[null, "hello", null, true]"#, &mixed_schema()).unwrap();
	assert_eq!(short, full);
	assert_eq!(
		full,
		vec![
			FieldValue::Empty,
			FieldValue::Text("hello".into()),
			FieldValue::Empty,
			FieldValue::Flag(true),
		]
	);
}

#[test]
fn in_between_length_is_rejected() {
	let err = validate_modal(r#"[null, "hello", true]"#, &mixed_schema()).unwrap_err();
	assert_eq!(
		err,
		ValidationError::LengthMismatch {
			expected: 4,
			without_labels: 2,
			actual: 3,
		}
	);
}

#[test]
fn too_many_values_is_rejected() {
	let err = validate_modal(r#"[null, "a", null, true, 1]"#, &mixed_schema()).unwrap_err();
	assert_eq!(err, ValidationError::TooManyValues { expected: 4, actual: 5 });
}

#[test]
fn only_labels_are_compacted() {
	// Headers and dividers keep their placeholders in every client layout.
	let schema = [Element::Header, Element::Input, Element::Divider];
	let err = validate_modal(r#"["x"]"#, &schema).unwrap_err();
	assert_eq!(
		err,
		ValidationError::LengthMismatch {
			expected: 3,
			without_labels: 3,
			actual: 1,
		}
	);
}

#[test]
fn compacted_reply_still_checks_slot_types() {
	// The toggle slot receives the string, which must fail type validation.
	let err = validate_modal(r#"[true, "hello"]"#, &mixed_schema()).unwrap_err();
	assert!(matches!(
		err,
		ValidationError::TypeMismatch {
			element: "input",
			expected: "string",
			actual: "bool",
			..
		}
	));
}

#[test]
fn label_slot_must_be_null() {
	let err = validate_modal(r#"["oops", "hello", null, true]"#, &mixed_schema()).unwrap_err();
	assert_eq!(
		err,
		ValidationError::NotNull {
			element: "label",
			raw: "\"oops\"".into(),
		}
	);
}

#[test]
fn empty_schema_accepts_empty_array() {
	assert_eq!(validate_modal("[]", &[]).unwrap(), Vec::<FieldValue>::new());
}

#[test]
fn non_array_and_garbage_are_rejected() {
	assert_eq!(
		validate_modal(r#"{"a":1}"#, &mixed_schema()).unwrap_err(),
		ValidationError::NotAnArray(r#"{"a":1}"#.into())
	);
	assert!(matches!(
		validate_modal("[1,", &mixed_schema()).unwrap_err(),
		ValidationError::Decode(_)
	));
}

#[rstest]
#[case(json!(0), Ok(FieldValue::Choice(0)))]
#[case(json!(2), Ok(FieldValue::Choice(2)))]
#[case(json!(3), Err(()))]
#[case(json!(-1), Err(()))]
#[case(json!(1.5), Err(()))]
#[case(json!("1"), Err(()))]
fn dropdown_bounds(#[case] value: Value, #[case] expected: std::result::Result<FieldValue, ()>) {
	let got = validate_element(&Element::Dropdown { options: 3 }, &value).map_err(|_| ());
	assert_eq!(got, expected);
}

#[rstest]
#[case(json!(1), true)]
#[case(json!(10), true)]
#[case(json!(5.5), true)]
#[case(json!(0), false)]
#[case(json!(11), false)]
#[case(json!(10.01), false)]
#[case(json!("5"), false)]
fn slider_bounds(#[case] value: Value, #[case] accepted: bool) {
	let slider = Element::Slider { min: 1.0, max: 10.0 };
	assert_eq!(validate_element(&slider, &value).is_ok(), accepted);
}

#[test]
fn slider_reports_range() {
	let err = validate_element(&Element::Slider { min: 1.0, max: 10.0 }, &json!(11)).unwrap_err();
	assert_eq!(
		err,
		ValidationError::OutOfBounds {
			value: 11.0,
			min: 1.0,
			max: 10.0,
		}
	);
}

#[rstest]
#[case(Element::Input, json!(5), "string")]
#[case(Element::Toggle, json!(1), "bool")]
#[case(Element::Toggle, json!(null), "bool")]
#[case(Element::Dropdown { options: 2 }, json!(true), "int")]
fn type_mismatches_name_expected_type(#[case] element: Element, #[case] value: Value, #[case] want: &str) {
	match validate_element(&element, &value) {
		Err(ValidationError::TypeMismatch { expected, .. }) => assert_eq!(expected, want),
		other => panic!("expected type mismatch, got {other:?}"),
	}
}

#[rstest]
#[case("0", Some(0))]
#[case("1", Some(1))]
#[case("2", Some(2))]
#[case("3", None)]
#[case("-1", None)]
#[case("abc", None)]
#[case("", None)]
#[case("1.5", None)]
fn button_selection(#[case] raw: &str, #[case] expected: Option<usize>) {
	assert_eq!(validate_selection(raw, 3).ok(), expected);
}

#[test]
fn button_selection_errors() {
	assert_eq!(
		validate_selection("3", 3).unwrap_err(),
		ValidationError::NoSuchButton { index: 3, count: 3 }
	);
	assert_eq!(
		validate_selection("-1", 3).unwrap_err(),
		ValidationError::NoSuchButton { index: -1, count: 3 }
	);
	assert_eq!(
		validate_selection("x", 3).unwrap_err(),
		ValidationError::NotAnInteger("x".into())
	);
}

#[test]
fn action_form_without_buttons_accepts_nothing() {
	assert!(validate_selection("0", 0).is_err());
}

#[rstest]
#[case("true", Some(0))]
#[case("false", Some(1))]
#[case("True", None)]
#[case("1", None)]
#[case("", None)]
fn binary_reply(#[case] raw: &str, #[case] expected: Option<usize>) {
	assert_eq!(validate_binary(raw).ok(), expected);
}

#[test]
fn validate_dispatches_on_kind() {
	let action = Schema::action([Element::Header, Element::Button, Element::Button]);
	assert_eq!(validate(&action, "1").unwrap(), Submission::Selection(1));
	assert!(validate(&action, "2").is_err());

	assert_eq!(validate(&Schema::message(), "false").unwrap(), Submission::Selection(1));

	let modal = Schema::modal(mixed_schema());
	assert!(matches!(validate(&modal, r#"["hi", false]"#).unwrap(), Submission::Values(v) if v.len() == 4));
}

fn element_strategy() -> impl Strategy<Value = Element> {
	prop_oneof![
		Just(Element::Label),
		Just(Element::Header),
		Just(Element::Divider),
		Just(Element::Input),
		Just(Element::Toggle),
		(1usize..5).prop_map(|options| Element::Dropdown { options }),
	]
}

fn sample_value(element: &Element) -> Value {
	match element {
		Element::Input => json!("text"),
		Element::Toggle => json!(true),
		Element::Dropdown { options } => json!(options - 1),
		Element::Slider { min, .. } => json!(min),
		_ => Value::Null,
	}
}

proptest! {
	#[test]
	fn dropping_label_placeholders_never_changes_the_result(
		elements in prop::collection::vec(element_strategy(), 0..12)
	) {
		let full: Vec<Value> = elements.iter().map(sample_value).collect();
		let compact: Vec<Value> = elements
			.iter()
			.zip(&full)
			.filter(|(e, _)| !matches!(e, Element::Label))
			.map(|(_, v)| v.clone())
			.collect();

		let from_full = validate_modal(&Value::Array(full).to_string(), &elements);
		let from_compact = validate_modal(&Value::Array(compact).to_string(), &elements);
		prop_assert!(from_full.is_ok());
		prop_assert_eq!(from_full, from_compact);
	}
}
