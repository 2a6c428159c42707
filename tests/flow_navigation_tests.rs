use onboard_core::flow::{Draft, FieldValue, FlowController, NavigationOutcome, ResumeQuery};
use onboard_core::flows::individual_onboarding;
use onboard_core::storage::{DraftStore, JsonDraftStore};
use tempfile::TempDir;

fn store_with_temp_dir() -> (JsonDraftStore, TempDir) {
    let temp = TempDir::new().expect("temp dir");
    let store = JsonDraftStore::new(Some(temp.path().to_path_buf())).expect("draft store");
    (store, temp)
}

fn personal_details() -> Draft {
    let mut input = Draft::new();
    input.insert("first_name", FieldValue::Text("Ada".into()));
    input.insert("last_name", FieldValue::Text("Lovelace".into()));
    input.insert("date_of_birth", FieldValue::Text("1990-12-10".into()));
    input
}

fn contact_details() -> Draft {
    let mut input = Draft::new();
    input.insert("email", FieldValue::Text("ada@example.com".into()));
    input.insert("phone_number", FieldValue::Text("+441234567890".into()));
    input.insert(
        "residential_address",
        FieldValue::Text("12 Analytical Way, London".into()),
    );
    input
}

#[test]
fn valid_next_calls_increase_cursor_by_one() {
    let flow = individual_onboarding();
    let (store, _guard) = store_with_temp_dir();
    let mut controller = FlowController::resume(&flow, &store).expect("resume");
    assert_eq!(controller.cursor(), 1);

    let outcome = controller.next(&personal_details()).expect("next");
    assert_eq!(outcome, NavigationOutcome::Advanced { to: 2 });
    assert_eq!(controller.cursor(), 2);

    let outcome = controller.next(&contact_details()).expect("next");
    assert_eq!(outcome, NavigationOutcome::Advanced { to: 3 });
    assert_eq!(controller.cursor(), 3);
}

#[test]
fn invalid_next_leaves_cursor_unchanged_and_reports_violations() {
    let flow = individual_onboarding();
    let (store, _guard) = store_with_temp_dir();
    let mut controller = FlowController::resume(&flow, &store).expect("resume");

    let outcome = controller.next(&Draft::new()).expect("next");
    let NavigationOutcome::Blocked(violations) = outcome else {
        panic!("expected a blocked outcome");
    };
    assert!(!violations.is_empty());
    assert_eq!(controller.cursor(), 1);
}

#[test]
fn next_never_exceeds_the_terminal_step() {
    let flow = individual_onboarding();
    let (store, _guard) = store_with_temp_dir();
    let mut controller = FlowController::resume(&flow, &store).expect("resume");
    controller.jump_to(flow.terminal_index()).expect("jump");

    let outcome = controller.next(&Draft::new()).expect("next");
    assert_eq!(outcome, NavigationOutcome::AtTerminal);
    assert_eq!(controller.cursor(), flow.terminal_index());
}

#[test]
fn previous_decrements_without_revalidation() {
    let flow = individual_onboarding();
    let (store, _guard) = store_with_temp_dir();
    let mut controller = FlowController::resume(&flow, &store).expect("resume");
    controller.next(&personal_details()).expect("next");

    assert_eq!(controller.previous().expect("previous"), 1);
    // Backing past step 1 stays on step 1.
    assert_eq!(controller.previous().expect("previous"), 1);
}

#[test]
fn skip_is_rejected_on_required_steps() {
    let flow = individual_onboarding();
    let (store, _guard) = store_with_temp_dir();
    let mut controller = FlowController::resume(&flow, &store).expect("resume");
    assert!(controller.skip().is_err());
    assert_eq!(controller.cursor(), 1);
}

#[test]
fn skippable_step_advances_without_validation() {
    let flow = individual_onboarding();
    let (store, _guard) = store_with_temp_dir();
    let mut controller = FlowController::resume(&flow, &store).expect("resume");
    controller.jump_to(4).expect("jump to preferences");
    assert!(controller.current_step().skippable);
    assert_eq!(controller.skip().expect("skip"), 5);
}

#[test]
fn transitions_record_resumable_state() {
    let flow = individual_onboarding();
    let (store, _guard) = store_with_temp_dir();
    let mut controller = FlowController::resume(&flow, &store).expect("resume");
    controller.set_flag("customer_type", "individual").expect("flag");
    controller.next(&personal_details()).expect("next");
    drop(controller);

    let resumed = FlowController::resume(&flow, &store).expect("resume again");
    assert_eq!(resumed.cursor(), 2);
    assert_eq!(resumed.flag("customer_type"), Some("individual"));
    assert_eq!(
        resumed.draft().get("first_name"),
        Some(&FieldValue::Text("Ada".into()))
    );
}

#[test]
fn out_of_range_cursor_is_clamped() {
    let flow = individual_onboarding();
    let (store, _guard) = store_with_temp_dir();
    store
        .record_resume(flow.key, "step=99")
        .expect("record tampered state");
    let controller = FlowController::resume(&flow, &store).expect("resume");
    assert_eq!(controller.cursor(), flow.terminal_index());

    let low = ResumeQuery::parse("step=0");
    let controller = FlowController::with_query(&flow, &store, &low).expect("resume");
    assert_eq!(controller.cursor(), 1);
}
