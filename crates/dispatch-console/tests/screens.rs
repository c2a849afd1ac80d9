//! Integration tests for the console screens against the in-memory service

#![allow(clippy::unwrap_used, clippy::indexing_slicing, missing_docs)]

mod common;

use common::{CallFixtures, ConfigFixtures, init_test_logging, plain};
use dispatch_client::{ConsoleApi, MockApi, MockRealtimeSdk, Operation, SessionError};
use dispatch_console::Toaster;
use dispatch_console::pages::agent_config::{DELETE_PROMPT, NO_CONFIGS};
use dispatch_console::pages::call_trigger::NO_CONFIGS_GUIDANCE;
use dispatch_console::pages::{
    AgentConfigPage, CallResultsPage, CallTriggerPage, DashboardPage, DetailState, EditorMode,
};
use dispatch_core::{CallCounts, CallStatus, DashboardStats};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Mutex;
use std::time::Duration;

const FORMAT: &str = "%b %d, %Y %H:%M";

// Agent configuration screen

#[tokio::test]
async fn test_empty_name_issues_no_request() {
    init_test_logging();
    let api = MockApi::new();
    let mut toaster = Toaster::default();
    let mut page = AgentConfigPage::new(FORMAT);
    page.load(&api, &mut toaster).await;

    page.open_create();
    let draft = page.editor_mut().unwrap().draft_mut();
    draft.system_prompt = "Be brief.".to_string();
    draft.conversation_flow = "Greet".to_string();

    assert!(!page.submit(&api, &mut toaster).await);
    assert_eq!(api.requests(), vec!["GET /agent-configs".to_string()]);
    assert_eq!(toaster.messages(), vec!["Configuration name is required"]);
    assert!(page.editor().is_some());
}

#[tokio::test]
async fn test_create_closes_editor_and_reloads() {
    init_test_logging();
    let api = MockApi::new();
    let mut toaster = Toaster::default();
    let mut page = AgentConfigPage::new(FORMAT);
    page.load(&api, &mut toaster).await;

    page.open_create();
    let editor = page.editor_mut().unwrap();
    let draft = editor.draft_mut();
    draft.name = "Night Shift".to_string();
    draft.system_prompt = "Be brief.".to_string();
    draft.conversation_flow = "Greet".to_string();
    editor.set_trigger_input("  jackknife  ");
    assert!(editor.add_trigger());

    assert!(page.submit(&api, &mut toaster).await);
    assert!(page.editor().is_none());
    assert_eq!(page.configs().len(), 1);
    assert_eq!(page.configs()[0].emergency_triggers, vec!["jackknife"]);
    assert_eq!(toaster.messages(), vec!["Configuration created successfully"]);
    assert_eq!(
        api.requests(),
        vec![
            "GET /agent-configs".to_string(),
            "POST /agent-configs".to_string(),
            "GET /agent-configs".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_failed_update_keeps_draft() {
    init_test_logging();
    let api = MockApi::new()
        .with_configs(vec![ConfigFixtures::check_in("cfg-1")])
        .failing_on(Operation::UpdateAgentConfig, 500, None);
    let mut toaster = Toaster::default();
    let mut page = AgentConfigPage::new(FORMAT);
    page.load(&api, &mut toaster).await;

    assert!(page.open_edit("cfg-1"));
    page.editor_mut().unwrap().draft_mut().name = "Renamed".to_string();

    assert!(!page.submit(&api, &mut toaster).await);
    let editor = page.editor().unwrap();
    assert_eq!(editor.mode(), &EditorMode::Edit("cfg-1".to_string()));
    assert_eq!(editor.draft().name, "Renamed");
    assert_eq!(toaster.messages(), vec!["Failed to update configuration"]);
    assert_eq!(page.configs()[0].name, "Standard Check-in");
}

#[tokio::test]
async fn test_declined_delete_changes_nothing() {
    init_test_logging();
    let api = MockApi::new().with_configs(vec![ConfigFixtures::check_in("cfg-1")]);
    let mut toaster = Toaster::default();
    let mut page = AgentConfigPage::new(FORMAT);
    page.load(&api, &mut toaster).await;

    let asked = Mutex::new(Vec::new());
    let decline = |prompt: &str| {
        asked.lock().unwrap().push(prompt.to_string());
        false
    };

    assert!(!page.delete("cfg-1", &api, &decline, &mut toaster).await);
    assert_eq!(asked.into_inner().unwrap(), vec![DELETE_PROMPT.to_string()]);
    assert_eq!(page.configs().len(), 1);
    assert_eq!(api.configs().len(), 1);
    assert_eq!(api.request_count(), 1);
    assert!(toaster.is_empty());
}

#[tokio::test]
async fn test_confirmed_delete_reloads_list() {
    init_test_logging();
    let api = MockApi::new().with_configs(vec![ConfigFixtures::check_in("cfg-1")]);
    let mut toaster = Toaster::default();
    let mut page = AgentConfigPage::new(FORMAT);
    page.load(&api, &mut toaster).await;

    assert!(page.delete("cfg-1", &api, &|_: &str| true, &mut toaster).await);
    assert!(page.configs().is_empty());
    assert_eq!(toaster.messages(), vec!["Configuration deleted successfully"]);
    assert!(plain(&page.render()).contains(NO_CONFIGS));
}

#[tokio::test]
async fn test_emergency_triggers_render_once_in_order() {
    init_test_logging();
    let api = MockApi::new().with_configs(vec![ConfigFixtures::emergency("cfg-9")]);
    let mut toaster = Toaster::default();

    let mut configs = AgentConfigPage::new(FORMAT);
    configs.load(&api, &mut toaster).await;
    let listing = plain(&configs.render());
    assert!(listing.contains("Emergency Triggers: accident, breakdown, medical"));

    let mut trigger = CallTriggerPage::new();
    trigger.load(&api, &mut toaster).await;
    trigger.set_driver_name("Ana");
    trigger.set_load_number("L-77");
    let screen = plain(&trigger.render());

    let positions: Vec<usize> = ["accident", "breakdown", "medical"]
        .iter()
        .map(|phrase| {
            assert_eq!(screen.matches(phrase).count(), 1, "{phrase} rendered once");
            screen.find(phrase).unwrap()
        })
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(trigger.preview().is_some());
}

// Call trigger screen

#[tokio::test]
async fn test_zero_configs_disables_submission() {
    init_test_logging();
    let api = MockApi::new();
    let sdk = MockRealtimeSdk::new();
    let mut toaster = Toaster::default();
    let mut page = CallTriggerPage::new();
    page.load(&api, &mut toaster).await;

    page.set_driver_name("Ana");
    page.set_load_number("L-77");

    assert!(!page.can_submit());
    assert_eq!(page.guidance(), Some(NO_CONFIGS_GUIDANCE));
    assert!(plain(&page.render()).contains(NO_CONFIGS_GUIDANCE));
    assert!(!page.submit(&api, &sdk, &mut toaster).await);
    assert!(api.started_calls().is_empty());
    assert!(sdk.connections().is_empty());
}

#[tokio::test]
async fn test_first_config_is_preselected() {
    init_test_logging();
    let api = MockApi::new().with_configs(vec![
        ConfigFixtures::check_in("cfg-1"),
        ConfigFixtures::emergency("cfg-2"),
    ]);
    let mut toaster = Toaster::default();
    let mut page = CallTriggerPage::new();
    page.load(&api, &mut toaster).await;

    assert_eq!(page.selected_config().unwrap().id, "cfg-1");
    assert!(page.select("cfg-2"));
    assert!(!page.select("missing"));
    assert_eq!(page.selected_config().unwrap().id, "cfg-2");
}

#[rstest]
#[case("", "L-1", "Driver name is required")]
#[case("Ana", "", "Load number is required")]
#[case("   ", "L-1", "Driver name is required")]
#[tokio::test]
async fn test_missing_call_fields_issue_no_request(
    #[case] driver: &str,
    #[case] load: &str,
    #[case] message: &str,
) {
    init_test_logging();
    let api = MockApi::new().with_configs(vec![ConfigFixtures::check_in("cfg-1")]);
    let sdk = MockRealtimeSdk::new();
    let mut toaster = Toaster::default();
    let mut page = CallTriggerPage::new();
    page.load(&api, &mut toaster).await;

    page.set_driver_name(driver);
    page.set_load_number(load);

    assert!(!page.submit(&api, &sdk, &mut toaster).await);
    assert_eq!(toaster.messages(), vec![message]);
    assert!(api.started_calls().is_empty());
}

#[tokio::test]
async fn test_started_call_joins_session_and_resets_form() {
    init_test_logging();
    let api = MockApi::new().with_configs(vec![ConfigFixtures::check_in("cfg-1")]);
    let sdk = MockRealtimeSdk::new();
    let mut toaster = Toaster::default();
    let mut page = CallTriggerPage::new();
    page.load(&api, &mut toaster).await;

    page.set_driver_name("Mike Johnson");
    page.set_load_number("7891-B");
    page.set_driver_phone(Some("  ".to_string()));
    assert_eq!(
        page.preview().unwrap(),
        "Hi Mike Johnson, this is Dispatch with a check call on load 7891-B. \
         Can you give me an update on your status?"
    );

    assert!(page.submit(&api, &sdk, &mut toaster).await);

    let started = api.started_calls();
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].agent_config_id, "cfg-1");
    assert_eq!(started[0].driver_phone, None);

    let grant = page.last_grant().unwrap();
    assert_eq!(
        sdk.connections(),
        vec![(grant.token.clone(), "mock-agent-cfg-1".to_string())]
    );
    assert!(page.session().is_some());
    assert_eq!(toaster.messages(), vec!["Call started successfully!"]);

    assert_eq!(page.driver_name(), "");
    assert_eq!(page.load_number(), "");
    assert!(page.preview().is_none());
    assert_eq!(page.selected_config().unwrap().id, "cfg-1");
}

#[tokio::test]
async fn test_session_failure_is_reported() {
    init_test_logging();
    let api = MockApi::new().with_configs(vec![
        ConfigFixtures::check_in("cfg-1"),
        ConfigFixtures::emergency("cfg-2"),
    ]);
    let sdk = MockRealtimeSdk::new().with_failure(SessionError::unavailable("no microphone"));
    let mut toaster = Toaster::default();
    let mut page = CallTriggerPage::new();
    page.load(&api, &mut toaster).await;

    assert!(page.select("cfg-2"));
    page.set_driver_name("Ana");
    page.set_load_number("L-1");

    assert!(page.submit(&api, &sdk, &mut toaster).await);
    assert!(page.session().is_none());
    // The service already holds the call, so the form still resets
    assert_eq!(page.driver_name(), "");
    assert_eq!(page.load_number(), "");
    assert_eq!(page.selected_config().unwrap().id, "cfg-2");
    assert_eq!(
        toaster.messages(),
        vec![
            "Call started successfully!",
            "Failed to join call session: real-time SDK unavailable: no microphone",
        ]
    );
    assert!(plain(&page.render()).contains("Session: not joined"));
}

#[tokio::test]
async fn test_call_without_session_grant_is_not_reported_as_failed() {
    init_test_logging();
    let api = MockApi::new()
        .with_configs(vec![ConfigFixtures::check_in("cfg-1")])
        .without_session_grant();
    let sdk = MockRealtimeSdk::new();
    let mut toaster = Toaster::default();
    let mut page = CallTriggerPage::new();
    page.load(&api, &mut toaster).await;

    page.set_driver_name("Ana");
    page.set_load_number("L-1");

    assert!(page.submit(&api, &sdk, &mut toaster).await);
    assert_eq!(api.started_calls().len(), 1);
    assert!(sdk.connections().is_empty());
    assert_eq!(page.driver_name(), "");
    assert_eq!(
        toaster.messages(),
        vec!["Call started but no session token was returned"]
    );
}

#[tokio::test]
async fn test_start_failure_shows_service_detail() {
    init_test_logging();
    let api = MockApi::new()
        .with_configs(vec![ConfigFixtures::check_in("cfg-1")])
        .failing_on(Operation::StartCall, 502, Some("Voice provider unreachable"));
    let sdk = MockRealtimeSdk::new();
    let mut toaster = Toaster::default();
    let mut page = CallTriggerPage::new();
    page.load(&api, &mut toaster).await;

    page.set_driver_name("Ana");
    page.set_load_number("L-1");

    assert!(!page.submit(&api, &sdk, &mut toaster).await);
    assert_eq!(toaster.messages(), vec!["Voice provider unreachable"]);
    assert_eq!(page.driver_name(), "Ana");
    assert!(sdk.connections().is_empty());
}

// Call results screen

#[rstest]
#[case::newer_arrives_last(false)]
#[case::stale_arrives_last(true)]
#[tokio::test]
async fn test_latest_detail_request_wins(#[case] stale_last: bool) {
    init_test_logging();
    let api = MockApi::new()
        .with_detail(CallFixtures::detail("a"))
        .with_detail(CallFixtures::detail("b"));
    let mut toaster = Toaster::default();
    let mut page = CallResultsPage::new(FORMAT);

    let first = page.begin_detail("a");
    let second = page.begin_detail("b");
    let (response_a, response_b) = tokio::join!(api.get_call("a"), api.get_call("b"));

    if stale_last {
        assert!(page.finish_detail(&second, response_b, &mut toaster));
        assert!(!page.finish_detail(&first, response_a, &mut toaster));
    } else {
        assert!(!page.finish_detail(&first, response_a, &mut toaster));
        assert!(page.finish_detail(&second, response_b, &mut toaster));
    }

    assert_eq!(page.detail().unwrap().call_info.id, "b");
    assert!(toaster.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_slow_stale_response_is_discarded() {
    init_test_logging();
    let api = MockApi::new()
        .with_detail(CallFixtures::detail("a"))
        .with_detail(CallFixtures::detail("b"))
        .with_detail_delay("a", Duration::from_secs(2));
    let mut toaster = Toaster::default();
    let mut page = CallResultsPage::new(FORMAT);

    let first = page.begin_detail("a");
    let slow = api.get_call("a");
    let second = page.begin_detail("b");
    let fast = api.get_call("b");

    let response_b = fast.await;
    assert!(page.finish_detail(&second, response_b, &mut toaster));
    let response_a = slow.await;
    assert!(!page.finish_detail(&first, response_a, &mut toaster));

    assert_eq!(page.detail().unwrap().call_info.id, "b");
}

#[tokio::test]
async fn test_detail_failure_clears_selection() {
    init_test_logging();
    let api = MockApi::new()
        .with_calls(vec![CallFixtures::call("a", CallStatus::Completed, 5)])
        .with_detail(CallFixtures::detail("a"));
    let mut toaster = Toaster::default();
    let mut page = CallResultsPage::new(FORMAT);
    page.load(&api, &mut toaster).await;

    assert!(page.open_detail("a", &api, &mut toaster).await);
    assert!(page.detail().is_some());

    assert!(page.open_detail("missing", &api, &mut toaster).await);
    assert_eq!(
        page.detail_state(),
        &DetailState::Failed {
            call_id: "missing".to_string()
        }
    );
    assert_eq!(toaster.messages(), vec!["Failed to fetch call details"]);
}

#[tokio::test]
async fn test_detail_renders_results_and_transcript() {
    init_test_logging();
    let api = MockApi::new()
        .with_calls(vec![CallFixtures::call("a", CallStatus::Completed, 5)])
        .with_detail(CallFixtures::detail("a"));
    let mut toaster = Toaster::default();
    let mut page = CallResultsPage::new(FORMAT);
    page.load(&api, &mut toaster).await;
    page.open_detail("a", &api, &mut toaster).await;

    let screen = plain(&page.render());
    assert!(screen.contains("Driver a - Load #LOAD-a"));
    assert!(screen.contains("Outcome: [In-Transit Update]"));
    assert!(screen.contains("Current Location: I-10 near Indio"));
    assert!(screen.contains("Driver: On my way"));
    assert!(screen.contains("\"load\": \"a\""));

    page.close_detail();
    assert!(!plain(&page.render()).contains("Call Details"));
}

#[tokio::test]
async fn test_failed_call_list_notifies() {
    init_test_logging();
    let api = MockApi::new().failing_on(Operation::ListCalls, 500, None);
    let mut toaster = Toaster::default();
    let mut page = CallResultsPage::new(FORMAT);
    page.load(&api, &mut toaster).await;

    assert!(page.calls().is_empty());
    assert_eq!(toaster.messages(), vec!["Failed to fetch calls"]);
}

// Dashboard screen

#[rstest]
#[case(0, 0, 0)]
#[case(4, 3, 75)]
#[case(3, 2, 67)]
#[tokio::test]
async fn test_dashboard_success_rate(#[case] total: u64, #[case] completed: u64, #[case] rate: u32) {
    init_test_logging();
    let api = MockApi::new().with_stats(DashboardStats {
        stats: CallCounts {
            total_calls: total,
            completed_calls: completed,
            in_progress_calls: 0,
            failed_calls: total - completed,
        },
        recent_calls: Vec::new(),
    });
    let mut toaster = Toaster::default();
    let mut page = DashboardPage::new(FORMAT);
    page.load(&api, &mut toaster).await;

    assert_eq!(page.success_rate(), rate);
    assert!(plain(&page.render()).contains(&format!("{rate}% of total calls")));
}

#[tokio::test]
async fn test_dashboard_lists_recent_calls_newest_first() {
    init_test_logging();
    let api = MockApi::new().with_calls(vec![
        CallFixtures::call("old", CallStatus::Completed, 90),
        CallFixtures::call("new", CallStatus::InProgress, 1),
    ]);
    let mut toaster = Toaster::default();
    let mut page = DashboardPage::new(FORMAT);
    page.load(&api, &mut toaster).await;

    let ids: Vec<&str> = page.recent_calls().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "old"]);
    assert_eq!(page.stats().in_progress_calls, 1);
}

#[tokio::test]
async fn test_dashboard_failure_notifies() {
    init_test_logging();
    let api = MockApi::new().failing_on(Operation::DashboardStats, 503, None);
    let mut toaster = Toaster::default();
    let mut page = DashboardPage::new(FORMAT);
    page.load(&api, &mut toaster).await;

    assert_eq!(toaster.messages(), vec!["Failed to fetch dashboard data"]);
    assert_eq!(page.success_rate(), 0);
}
