use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::response::{FieldValue, Submission};
use crate::schema::FormKind;
use crate::validate;

#[test]
fn action_form_payload_and_schema() {
	let request = ActionForm::new()
		.title("Warps")
		.body("Pick a destination")
		.header("Worlds")
		.button("Spawn", None)
		.divider()
		.button("Arena", Some(ButtonIcon::Path("textures/items/sword".into())))
		.label("More soon")
		.build();

	assert_eq!(
		request.payload(),
		&json!({
			"type": "form",
			"title": "Warps",
			"content": "Pick a destination",
			"elements": [
				{ "text": "Worlds", "type": "header" },
				{ "image": null, "text": "Spawn", "type": "button" },
				{ "text": "", "type": "divider" },
				{
					"image": { "data": "textures/items/sword", "type": "path" },
					"text": "Arena",
					"type": "button",
				},
				{ "text": "More soon", "type": "label" },
			],
		})
	);
	assert_eq!(request.schema().kind(), FormKind::Action);
	assert_eq!(request.schema().button_count(), 2);
	assert_eq!(validate::validate(request.schema(), "1"), Ok(Submission::Selection(1)));
	assert!(validate::validate(request.schema(), "2").is_err());
}

#[test]
fn message_form_payload() {
	let request = MessageForm::new()
		.title("Confirm")
		.body("Leave the party?")
		.button1("Yes")
		.button2("No")
		.build();

	assert_eq!(
		request.payload(),
		&json!({
			"type": "modal",
			"title": "Confirm",
			"content": "Leave the party?",
			"button1": "Yes",
			"button2": "No",
		})
	);
	assert_eq!(request.schema(), &Schema::message());
}

#[test]
fn modal_form_payload_and_schema() {
	let request = ModalForm::new()
		.title("Settings")
		.label("Profile")
		.text_field(TextField::new("Nickname").placeholder("Steve").tooltip("Shown in chat"))
		.dropdown(Dropdown::new("Team", ["red", "blue"]).default(1))
		.slider(Slider::new("Volume", 0.0, 10.0).step(0.5).default(5.0))
		.toggle(Toggle::new("Music").default(true))
		.submit_button("Save")
		.build()
		.unwrap();

	assert_eq!(
		request.payload(),
		&json!({
			"type": "custom_form",
			"title": "Settings",
			"submit": "Save",
			"content": [
				{ "text": "Profile", "type": "label" },
				{
					"text": "Nickname",
					"type": "input",
					"placeholder": "Steve",
					"tooltip": "Shown in chat",
				},
				{ "options": ["red", "blue"], "text": "Team", "type": "dropdown", "default": 1 },
				{
					"max": 10.0,
					"min": 0.0,
					"step": 0.5,
					"text": "Volume",
					"type": "slider",
					"default": 5.0,
				},
				{ "text": "Music", "type": "toggle", "default": true },
			],
		})
	);
	assert_eq!(
		request.schema(),
		&Schema::modal([
			Element::Label,
			Element::Input,
			Element::Dropdown { options: 2 },
			Element::Slider { min: 0.0, max: 10.0 },
			Element::Toggle,
		])
	);
}

#[test]
fn modal_form_without_submit_omits_key() {
	let request = ModalForm::new().toggle(Toggle::new("On")).build().unwrap();
	assert!(request.payload().get("submit").is_none());
	assert_eq!(request.payload()["content"][0], json!({ "text": "On", "type": "toggle" }));
}

#[test]
fn slider_step_defaults_to_one() {
	let request = ModalForm::new().slider(Slider::new("Level", 1.0, 5.0)).build().unwrap();
	assert_eq!(request.payload()["content"][0]["step"], json!(1.0));
}

#[test]
fn built_modal_accepts_both_reply_layouts() {
	let request = ModalForm::new()
		.label("Intro")
		.text_field(TextField::new("Name"))
		.toggle(Toggle::new("Agree"))
		.build()
		.unwrap();
	let expected = Submission::Values(vec![
		FieldValue::Empty,
		FieldValue::Text("Alex".into()),
		FieldValue::Flag(false),
	]);

	assert_eq!(
		validate::validate(request.schema(), r#"[null, "Alex", false]"#),
		Ok(expected.clone())
	);
	assert_eq!(validate::validate(request.schema(), r#"["Alex", false]"#), Ok(expected));
}

#[rstest]
#[case::inverted_range(Slider::new("s", 5.0, 1.0), "SliderRange")]
#[case::nan_bound(Slider::new("s", f64::NAN, 1.0), "SliderRange")]
#[case::zero_step(Slider::new("s", 0.0, 1.0).step(0.0), "SliderStep")]
#[case::negative_step(Slider::new("s", 0.0, 1.0).step(-1.0), "SliderStep")]
#[case::default_below(Slider::new("s", 0.0, 1.0).default(-0.5), "SliderDefault")]
#[case::default_above(Slider::new("s", 0.0, 1.0).default(2.0), "SliderDefault")]
fn slider_arguments_are_checked(#[case] slider: Slider, #[case] variant: &str) {
	let err = ModalForm::new().slider(slider).build().unwrap_err();
	assert!(format!("{err:?}").starts_with(variant), "{err:?}");
}

#[test]
fn slider_default_on_bounds_is_accepted() {
	assert!(
		ModalForm::new()
			.slider(Slider::new("s", 0.0, 1.0).default(0.0))
			.slider(Slider::new("t", 0.0, 1.0).default(1.0))
			.build()
			.is_ok()
	);
}

#[test]
fn dropdown_default_must_name_an_option() {
	let err = ModalForm::new()
		.dropdown(Dropdown::new("Team", ["red", "blue"]).default(2))
		.build()
		.unwrap_err();
	assert_eq!(
		err,
		BuildError::DropdownDefault {
			label: "Team".into(),
			default: 2,
			options: 2,
		}
	);
}
