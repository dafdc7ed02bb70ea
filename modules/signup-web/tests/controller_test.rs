//! View controller scenarios against MockActivitiesApi.
//! No network: every API call is recorded by the mock and asserted on.

use std::sync::Arc;
use std::time::Duration;

use signup_web::controller::LOAD_FAILED;
use signup_web::messages::MessageKind;
use signup_web::templates::{render_list, render_regions};
use signup_web::testing::{activity, chess_club_catalog, Call, MockActivitiesApi, MockReply};
use signup_web::{ActivityDraft, ListState, Session, UiEvent, ViewController, ViewMode};
use signup_common::ActivityCatalog;

const TTL: Duration = Duration::from_secs(5);

fn controller(api: &Arc<MockActivitiesApi>, session: Session) -> ViewController<MockActivitiesApi> {
    ViewController::new(api.clone(), session, TTL)
}

fn admin_session() -> Session {
    Session::admin(Some("tok".to_string()))
}

fn message(c: &ViewController<MockActivitiesApi>) -> Option<(String, MessageKind)> {
    c.page()
        .message
        .visible()
        .map(|m| (m.text.clone(), m.kind))
}

fn admin_message(c: &ViewController<MockActivitiesApi>) -> Option<(String, MessageKind)> {
    c.page()
        .admin_message
        .visible()
        .map(|m| (m.text.clone(), m.kind))
}

fn public_html(c: &ViewController<MockActivitiesApi>) -> String {
    render_list(&c.page().public_list, ViewMode::Public, None)
}

fn admin_html(c: &ViewController<MockActivitiesApi>) -> String {
    render_list(
        &c.page().admin_list,
        ViewMode::Admin,
        c.page().edit_form.as_ref(),
    )
}

fn tok() -> Option<String> {
    Some("tok".to_string())
}

// =========================================================================
// Loading
// =========================================================================

#[tokio::test]
async fn chess_club_public_view() {
    let api = Arc::new(MockActivitiesApi::new().with_catalog(chess_club_catalog()));
    let mut c = controller(&api, Session::public());

    c.load_catalog(ViewMode::Public).await;

    let html = public_html(&c);
    assert_eq!(html.matches(r#"class="activity-card""#).count(), 1);
    assert!(html.contains(r#"<span class="spots-left">9</span>"#));
    assert_eq!(html.matches("<li>").count(), 1);
    assert!(html.contains("a@x.com"));
    assert!(!html.contains("data-action"));
    assert_eq!(c.page().activity_options, vec!["Chess Club".to_string()]);
    assert_eq!(api.calls(), vec![Call::List]);
}

#[tokio::test]
async fn admin_load_refreshes_public_list() {
    let api = Arc::new(MockActivitiesApi::new().with_catalog(chess_club_catalog()));
    let mut c = controller(&api, admin_session());

    c.load_catalog(ViewMode::Public).await;
    api.set_catalog(ActivityCatalog::new());
    c.load_catalog(ViewMode::Admin).await;

    assert_eq!(c.page().admin_list, ListState::Loaded(ActivityCatalog::new()));
    assert_eq!(c.page().public_list, ListState::Loaded(ActivityCatalog::new()));
    assert!(c.page().activity_options.is_empty());
}

#[tokio::test]
async fn deleted_activity_leaves_public_list_and_selector() {
    let api = Arc::new(MockActivitiesApi::new().with_catalog(chess_club_catalog()));
    let mut c = controller(&api, admin_session());
    c.load_catalog(ViewMode::Public).await;
    assert!(public_html(&c).contains("Chess Club"));

    api.set_catalog(ActivityCatalog::new());
    c.delete_activity("Chess Club", true).await;

    assert!(!public_html(&c).contains("Chess Club"));
    assert!(c.page().activity_options.is_empty());
    let regions = render_regions(c.page(), tokio::time::Instant::now());
    let (_, form) = regions.iter().find(|(id, _)| *id == "signup-form").unwrap();
    assert!(!form.contains("Chess Club"));
}

#[tokio::test]
async fn repeated_loads_replace_content() {
    let api = Arc::new(MockActivitiesApi::new().with_catalog(chess_club_catalog()));
    let mut c = controller(&api, Session::public());

    c.load_catalog(ViewMode::Public).await;
    c.load_catalog(ViewMode::Public).await;
    let html = public_html(&c);
    assert_eq!(html.matches(r#"class="activity-card""#).count(), 1);
    assert_eq!(c.page().activity_options.len(), 1);

    let mut next = ActivityCatalog::new();
    next.insert("Art", activity("paint", "Mon", 4, &[]));
    next.insert("Drama", activity("act", "Tue", 6, &["b@x.com", "c@x.com"]));
    api.set_catalog(next);
    c.load_catalog(ViewMode::Public).await;

    let html = public_html(&c);
    assert_eq!(html.matches(r#"class="activity-card""#).count(), 2);
    assert!(!html.contains("Chess Club"));
    assert_eq!(
        c.page().activity_options,
        vec!["Art".to_string(), "Drama".to_string()]
    );
    assert_eq!(api.list_count(), 3);
}

#[tokio::test]
async fn failed_load_shows_fixed_text() {
    let api = Arc::new(MockActivitiesApi::new().failing_catalog());
    let mut c = controller(&api, Session::public());

    c.load_catalog(ViewMode::Public).await;

    assert_eq!(c.page().public_list, ListState::Failed);
    let html = public_html(&c);
    assert!(html.contains(LOAD_FAILED));
    assert!(!html.contains("activity-card"));
}

#[tokio::test]
async fn failed_load_replaces_previous_cards() {
    let api = Arc::new(MockActivitiesApi::new().with_catalog(chess_club_catalog()));
    let mut c = controller(&api, admin_session());

    c.load_catalog(ViewMode::Admin).await;
    assert!(admin_html(&c).contains("Chess Club"));

    api.drop_catalog();
    c.load_catalog(ViewMode::Admin).await;
    assert_eq!(c.page().admin_list, ListState::Failed);
    assert!(!admin_html(&c).contains("Chess Club"));
    assert!(admin_html(&c).contains(LOAD_FAILED));
}

// =========================================================================
// Admin login
// =========================================================================

#[tokio::test]
async fn login_success_switches_to_admin_panel() {
    let api = Arc::new(MockActivitiesApi::new().with_catalog(chess_club_catalog()));
    let mut c = controller(&api, Session::public());
    assert!(c.page().login_visible);
    assert!(!c.page().admin_panel_visible);

    c.dispatch(UiEvent::Login {
        username: "admin".to_string(),
        password: "secret".to_string(),
    })
    .await;

    assert!(c.session().is_admin());
    assert_eq!(c.session().token(), Some("mock_token"));
    assert!(!c.page().login_visible);
    assert!(c.page().admin_panel_visible);
    assert_eq!(c.page().admin_list, ListState::Loaded(chess_club_catalog()));
    assert_eq!(
        api.calls(),
        vec![
            Call::Login {
                username: "admin".to_string()
            },
            Call::List
        ]
    );
}

#[tokio::test]
async fn login_rejection_shows_server_detail() {
    let api = Arc::new(MockActivitiesApi::new().on_login(MockReply::reject(401, "bad credentials")));
    let mut c = controller(&api, Session::public());

    c.login_admin("admin", "wrong").await;

    assert_eq!(
        admin_message(&c),
        Some(("bad credentials".to_string(), MessageKind::Error))
    );
    assert!(!c.session().is_admin());
    assert!(c.page().login_visible);
    assert_eq!(c.page().login_username, "admin");
    assert_eq!(api.list_count(), 0);
}

#[tokio::test]
async fn login_transport_failure_uses_fallback() {
    let api = Arc::new(MockActivitiesApi::new().on_login(MockReply::network()));
    let mut c = controller(&api, Session::public());

    c.login_admin("admin", "secret").await;

    assert_eq!(
        admin_message(&c).map(|(t, _)| t),
        Some("An error occurred while logging in".to_string())
    );
}

#[tokio::test]
async fn login_rejection_without_detail_uses_generic_text() {
    let api = Arc::new(MockActivitiesApi::new().on_login(MockReply::reject_without_detail(500)));
    let mut c = controller(&api, Session::public());

    c.login_admin("admin", "secret").await;

    assert_eq!(admin_message(&c).map(|(t, _)| t), Some("Login failed".to_string()));
}

// =========================================================================
// Sign-up and withdrawal
// =========================================================================

#[tokio::test]
async fn signup_success_resets_form_and_refreshes() {
    let api = Arc::new(
        MockActivitiesApi::new()
            .with_catalog(chess_club_catalog())
            .on_signup(MockReply::message("signed up")),
    );
    let mut c = controller(&api, Session::public());

    c.dispatch(UiEvent::Signup {
        email: "new@x.com".to_string(),
        activity: "Chess Club".to_string(),
    })
    .await;

    assert_eq!(message(&c), Some(("signed up".to_string(), MessageKind::Success)));
    assert_eq!(c.page().signup_form.email, "");
    assert_eq!(c.page().signup_form.activity, "");
    assert_eq!(
        api.calls(),
        vec![
            Call::Signup {
                name: "Chess Club".to_string(),
                email: "new@x.com".to_string()
            },
            Call::List
        ]
    );
}

#[tokio::test]
async fn signup_rejection_keeps_form() {
    let api = Arc::new(
        MockActivitiesApi::new()
            .with_catalog(chess_club_catalog())
            .on_signup(MockReply::reject(400, "activity full")),
    );
    let mut c = controller(&api, Session::public());

    c.submit_signup("new@x.com", "Chess Club").await;

    assert_eq!(message(&c), Some(("activity full".to_string(), MessageKind::Error)));
    assert_eq!(c.page().signup_form.email, "new@x.com");
    assert_eq!(c.page().signup_form.activity, "Chess Club");
    assert_eq!(api.list_count(), 0);

    let regions = render_regions(c.page(), tokio::time::Instant::now());
    let (_, form) = regions.iter().find(|(id, _)| *id == "signup-form").unwrap();
    assert!(form.contains(r#"value="new@x.com""#));
}

#[tokio::test]
async fn signup_without_activity_issues_no_call() {
    let api = Arc::new(MockActivitiesApi::new());
    let mut c = controller(&api, Session::public());

    c.submit_signup("new@x.com", "").await;

    assert!(api.calls().is_empty());
    assert_eq!(message(&c).map(|(_, k)| k), Some(MessageKind::Error));
}

#[tokio::test]
async fn unregister_refreshes_view_matching_session() {
    let api = Arc::new(
        MockActivitiesApi::new()
            .with_catalog(chess_club_catalog())
            .on_unregister(MockReply::message("a@x.com removed")),
    );

    let mut public = controller(&api, Session::public());
    public.unregister_participant("Chess Club", "a@x.com").await;
    assert_eq!(
        message(&public),
        Some(("a@x.com removed".to_string(), MessageKind::Success))
    );
    assert!(matches!(public.page().public_list, ListState::Loaded(_)));
    assert_eq!(public.page().admin_list, ListState::Loading);

    let mut admin = controller(&api, admin_session());
    admin.dispatch(UiEvent::Unregister {
        activity: "Chess Club".to_string(),
        email: "a@x.com".to_string(),
    })
    .await;
    assert!(matches!(admin.page().admin_list, ListState::Loaded(_)));
    assert!(matches!(admin.page().public_list, ListState::Loaded(_)));

    assert!(api.calls().contains(&Call::Unregister {
        name: "Chess Club".to_string(),
        email: "a@x.com".to_string(),
        token: tok(),
    }));
}

#[tokio::test]
async fn unregister_failure_uses_detail_or_fallback() {
    let api = Arc::new(MockActivitiesApi::new().on_unregister(MockReply::reject_without_detail(400)));
    let mut c = controller(&api, Session::public());
    c.unregister_participant("Chess Club", "a@x.com").await;
    assert_eq!(message(&c).map(|(t, _)| t), Some("Operation failed".to_string()));

    let api = Arc::new(MockActivitiesApi::new().on_unregister(MockReply::network()));
    let mut c = controller(&api, Session::public());
    c.unregister_participant("Chess Club", "a@x.com").await;
    assert_eq!(
        message(&c).map(|(t, _)| t),
        Some("Failed to unregister, please try again".to_string())
    );
    assert_eq!(api.list_count(), 0);
}

// =========================================================================
// Delete
// =========================================================================

#[tokio::test]
async fn declined_delete_issues_no_call() {
    let api = Arc::new(MockActivitiesApi::new().with_catalog(chess_club_catalog()));
    let mut c = controller(&api, admin_session());

    c.dispatch(UiEvent::DeleteActivity {
        activity: "Chess Club".to_string(),
        confirmed: false,
    })
    .await;

    assert!(api.calls().is_empty());
    assert!(admin_message(&c).is_none());
}

#[tokio::test]
async fn confirmed_delete_refreshes_admin_view() {
    let api = Arc::new(MockActivitiesApi::new().with_catalog(chess_club_catalog()));
    let mut c = controller(&api, admin_session());

    c.delete_activity("Chess Club", true).await;

    assert_eq!(
        api.calls(),
        vec![
            Call::Delete {
                name: "Chess Club".to_string(),
                token: tok()
            },
            Call::List
        ]
    );
    assert_eq!(
        admin_message(&c),
        Some(("Activity deleted successfully".to_string(), MessageKind::Success))
    );
}

#[tokio::test]
async fn delete_rejection_shows_server_error() {
    let api = Arc::new(MockActivitiesApi::new().on_delete(MockReply::reject(404, "Activity not found")));
    let mut c = controller(&api, admin_session());

    c.delete_activity("Gone", true).await;

    assert_eq!(
        admin_message(&c),
        Some(("Activity not found".to_string(), MessageKind::Error))
    );
    assert_eq!(api.list_count(), 0);
}

#[tokio::test]
async fn admin_events_are_ignored_in_public_session() {
    let api = Arc::new(MockActivitiesApi::new().with_catalog(chess_club_catalog()));
    let mut c = controller(&api, Session::public());

    c.dispatch(UiEvent::DeleteActivity {
        activity: "Chess Club".to_string(),
        confirmed: true,
    })
    .await;
    c.dispatch(UiEvent::OpenCreateForm).await;

    assert!(api.calls().is_empty());
    assert!(c.page().create_form.is_none());
}

// =========================================================================
// Create
// =========================================================================

fn robotics(max: &str) -> ActivityDraft {
    ActivityDraft {
        name: "Robotics".to_string(),
        description: "build robots".to_string(),
        schedule: "Wed 4pm".to_string(),
        max_participants: max.to_string(),
    }
}

#[tokio::test]
async fn create_success_closes_form_and_refreshes() {
    let api = Arc::new(MockActivitiesApi::new().with_catalog(chess_club_catalog()));
    let mut c = controller(&api, admin_session());

    c.dispatch(UiEvent::OpenCreateForm).await;
    assert_eq!(c.page().create_form, Some(ActivityDraft::default()));

    c.dispatch(UiEvent::CreateActivity {
        name: "Robotics".to_string(),
        description: "build robots".to_string(),
        schedule: "Wed 4pm".to_string(),
        max_participants: "8".to_string(),
    })
    .await;

    assert!(c.page().create_form.is_none());
    assert_eq!(
        api.calls(),
        vec![
            Call::Create {
                name: "Robotics".to_string(),
                token: tok()
            },
            Call::List
        ]
    );
    assert_eq!(
        admin_message(&c),
        Some(("Activity created successfully".to_string(), MessageKind::Success))
    );
}

#[tokio::test]
async fn create_with_invalid_capacity_stays_local() {
    let api = Arc::new(MockActivitiesApi::new());
    let mut c = controller(&api, admin_session());

    c.submit_new_activity(robotics("0")).await;

    assert!(api.calls().is_empty());
    assert_eq!(c.page().create_form, Some(robotics("0")));
    assert_eq!(admin_message(&c).map(|(_, k)| k), Some(MessageKind::Error));
}

#[tokio::test]
async fn create_rejection_keeps_form_open() {
    let api = Arc::new(MockActivitiesApi::new().on_create(MockReply::reject(400, "Activity already exists")));
    let mut c = controller(&api, admin_session());

    c.submit_new_activity(robotics("8")).await;

    assert_eq!(c.page().create_form, Some(robotics("8")));
    assert_eq!(
        admin_message(&c),
        Some(("Activity already exists".to_string(), MessageKind::Error))
    );
    assert_eq!(api.list_count(), 0);
}

#[tokio::test]
async fn cancel_create_form_discards_draft() {
    let api = Arc::new(MockActivitiesApi::new());
    let mut c = controller(&api, admin_session());

    c.open_create_form();
    c.cancel_create_form();

    assert!(c.page().create_form.is_none());
}

// =========================================================================
// Edit
// =========================================================================

#[tokio::test]
async fn begin_edit_prefills_and_hides_card() {
    let api = Arc::new(MockActivitiesApi::new().with_catalog(chess_club_catalog()));
    let mut c = controller(&api, admin_session());
    c.load_catalog(ViewMode::Admin).await;

    c.dispatch(UiEvent::Edit {
        activity: "Chess Club".to_string(),
    })
    .await;

    let edit = c.page().edit_form.as_ref().unwrap();
    assert_eq!(edit.activity, "Chess Club");
    assert_eq!(edit.draft.schedule, "Fri 3pm");
    assert_eq!(edit.draft.max_participants, "10");

    let html = admin_html(&c);
    assert!(html.contains(r#"class="activity-card" hidden"#));
    assert!(html.contains(r#"data-action="save-edit""#));

    c.dispatch(UiEvent::CancelEdit).await;
    assert!(c.page().edit_form.is_none());
    let html = admin_html(&c);
    assert!(!html.contains(" hidden"));
    assert!(html.contains("Chess Club"));
}

#[tokio::test]
async fn begin_edit_for_missing_activity_shows_error() {
    let api = Arc::new(MockActivitiesApi::new());
    let mut c = controller(&api, admin_session());

    c.begin_edit("Nope").await;

    assert!(c.page().edit_form.is_none());
    assert_eq!(
        admin_message(&c).map(|(t, _)| t),
        Some("Failed to load activity details".to_string())
    );
}

#[tokio::test]
async fn save_edit_success_refreshes_admin_view() {
    let api = Arc::new(MockActivitiesApi::new().with_catalog(chess_club_catalog()));
    let mut c = controller(&api, admin_session());
    c.begin_edit("Chess Club").await;

    c.dispatch(UiEvent::SaveEdit {
        activity: "Chess Club".to_string(),
        description: "d".to_string(),
        schedule: "Sat 10am".to_string(),
        max_participants: "12".to_string(),
    })
    .await;

    assert!(c.page().edit_form.is_none());
    assert_eq!(
        api.calls(),
        vec![
            Call::Get {
                name: "Chess Club".to_string()
            },
            Call::Update {
                name: "Chess Club".to_string(),
                token: tok()
            },
            Call::List
        ]
    );
    assert_eq!(
        admin_message(&c).map(|(t, _)| t),
        Some("Activity updated successfully".to_string())
    );
}

#[tokio::test]
async fn save_edit_rejection_keeps_form() {
    let api = Arc::new(
        MockActivitiesApi::new()
            .with_catalog(chess_club_catalog())
            .on_update(MockReply::reject(400, "Cannot set capacity below current participants")),
    );
    let mut c = controller(&api, admin_session());
    c.begin_edit("Chess Club").await;

    let mut draft = ActivityDraft::from_activity(
        "Chess Club",
        chess_club_catalog().get("Chess Club").unwrap(),
    );
    draft.max_participants = "1".to_string();
    c.submit_edit("Chess Club", draft).await;

    let edit = c.page().edit_form.as_ref().unwrap();
    assert_eq!(edit.draft.max_participants, "1");
    assert_eq!(
        admin_message(&c).map(|(t, _)| t),
        Some("Cannot set capacity below current participants".to_string())
    );
}

// =========================================================================
// Transient messages
// =========================================================================

#[tokio::test(start_paused = true)]
async fn status_message_hides_after_five_seconds() {
    let api = Arc::new(
        MockActivitiesApi::new()
            .with_catalog(chess_club_catalog())
            .on_signup(MockReply::message("signed up")),
    );
    let mut c = controller(&api, Session::public());

    c.submit_signup("new@x.com", "Chess Club").await;
    assert!(message(&c).is_some());

    tokio::time::advance(Duration::from_secs(5)).await;
    assert!(message(&c).is_none());

    let regions = render_regions(c.page(), tokio::time::Instant::now());
    let (_, html) = regions.iter().find(|(id, _)| *id == "message").unwrap();
    assert!(html.is_empty());
}
