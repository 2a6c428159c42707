use onboard_core::flows::business_onboarding;
use onboard_core::gateway::{
    classify_response, first_failing_step, group_by_section, normalize, RemoteErrorBody,
    SubmitResult, GENERAL_FIELD, GENERAL_SECTION,
};
use pretty_assertions::assert_eq;

#[test]
fn field_map_error_resolves_section_label_and_message() {
    let flow = business_onboarding();
    let body = RemoteErrorBody::decode(r#"{ "errors": { "BusinessAddress": ["Required"] } }"#);
    let errors = normalize(&body, &flow);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field_key, "business_address");
    assert_eq!(errors[0].section, "Business Profile");
    assert_eq!(errors[0].label, "Business Address");
    assert_eq!(errors[0].message, "Required");
}

#[test]
fn misspelled_gateway_field_names_are_corrected() {
    let flow = business_onboarding();
    let body = RemoteErrorBody::decode(r#"{ "errors": { "BussinessAddress": ["Required"] } }"#);
    let errors = normalize(&body, &flow);
    assert_eq!(errors[0].field_key, "business_address");
    assert_eq!(errors[0].label, "Business Address");
    assert_eq!(errors[0].section, "Business Profile");
}

#[test]
fn unknown_fields_fall_back_to_the_general_section() {
    let flow = business_onboarding();
    let body = RemoteErrorBody::decode(r#"{ "errors": { "SortCode": ["Unknown branch"] } }"#);
    let errors = normalize(&body, &flow);
    assert_eq!(errors[0].section, GENERAL_SECTION);
    assert_eq!(errors[0].label, "Sort Code");
}

#[test]
fn empty_error_body_falls_back_to_required_field_set() {
    let flow = business_onboarding();
    let errors = normalize(&RemoteErrorBody::decode("{}"), &flow);
    assert!(!errors.is_empty(), "fallback list must not be empty");
    assert!(errors.iter().all(|error| error.message == "Required"));
    let business_name = errors
        .iter()
        .find(|error| error.field_key == "business_name")
        .expect("required field present in fallback");
    assert_eq!(business_name.section, "Business Profile");
    assert_eq!(business_name.label, "Business Name");
}

#[test]
fn message_list_and_single_message_use_the_general_path() {
    let flow = business_onboarding();

    let listed = normalize(
        &RemoteErrorBody::decode(r#"{ "errors": ["Duplicate registration"] }"#),
        &flow,
    );
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].field_key, GENERAL_FIELD);
    assert_eq!(listed[0].section, GENERAL_SECTION);
    assert_eq!(listed[0].message, "Duplicate registration");

    let single = normalize(
        &RemoteErrorBody::decode(r#"{ "message": "Service window closed" }"#),
        &flow,
    );
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].message, "Service window closed");
}

#[test]
fn status_401_short_circuits_every_body_shape() {
    let bodies = [
        "",
        "{}",
        r#"{ "errors": { "BusinessAddress": ["Required"] } }"#,
        r#"{ "message": "Token expired" }"#,
        "<html>not json</html>",
    ];
    for body in bodies {
        assert_eq!(
            classify_response(401, body),
            SubmitResult::AuthRequired,
            "401 with body {body:?} must take the authentication path"
        );
    }
}

#[test]
fn first_failing_field_resolves_its_owning_step() {
    let flow = business_onboarding();
    let body = RemoteErrorBody::decode(
        r#"{ "errors": { "DirectorEmail": ["Invalid"], "BusinessName": ["Required"] } }"#,
    );
    let errors = normalize(&body, &flow);
    // Field-map keys are decoded in sorted order, so BusinessName comes first.
    assert_eq!(first_failing_step(&errors, &flow), Some(1));
}

#[test]
fn grouping_preserves_section_order_of_first_appearance() {
    let flow = business_onboarding();
    let body = RemoteErrorBody::decode(
        r#"{ "errors": { "BusinessName": ["Required"], "DirectorEmail": ["Invalid"] } }"#,
    );
    let errors = normalize(&body, &flow);
    let grouped = group_by_section(&errors);
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[0].0, "Business Profile");
    assert_eq!(grouped[1].0, "Directors");
    assert_eq!(grouped[0].1.len(), 1);
}
