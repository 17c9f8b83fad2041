//! Action bindings: page events in, authenticated requests and feedback out.
//!
//! The `Dispatcher` sits at the page root. Each registered binding is an
//! (event kind, selector, action) triple, and every incoming event is matched
//! against the selectors when it arrives. Elements added to the page after
//! start-up are therefore handled without registering anything again.

pub mod actions;

use tracing::debug;

use crate::context::SessionContext;
use crate::models::AttendanceKind;
use crate::page::{Element, Page, Selector, SelectorError};

/// Kind of page event a binding listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Submit,
}

/// A page event and the element it targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Click(Element),
    Submit(Element),
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            UiEvent::Click(_) => EventKind::Click,
            UiEvent::Submit(_) => EventKind::Submit,
        }
    }

    pub fn target(&self) -> &Element {
        match self {
            UiEvent::Click(element) | UiEvent::Submit(element) => element,
        }
    }
}

/// What a binding does when its selector matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    DeleteItem,
    SubmitForm,
    CheckIn,
    CheckOut,
    Logout,
    EditEmployee,
}

/// How a dispatched event ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// No binding matched the event target
    Ignored,
    /// The user declined the confirmation prompt
    Cancelled,
    Completed,
    RedirectedToLogin,
    Denied,
    Failed,
}

#[derive(Debug, Clone)]
struct Binding {
    event: EventKind,
    selector: Selector,
    action: Action,
}

/// Root-level event delegation over the registered bindings.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    bindings: Vec<Binding>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher wired for the portal's page contract.
    pub fn standard() -> Result<Self, SelectorError> {
        let mut dispatcher = Self::new();
        dispatcher.register(EventKind::Submit, r#"form[action*="delete"]"#, Action::DeleteItem)?;
        dispatcher.register(EventKind::Click, r#"button[data-action*="delete"]"#, Action::DeleteItem)?;
        dispatcher.register(EventKind::Submit, r#"form[data-requires-auth="true"]"#, Action::SubmitForm)?;
        dispatcher.register(EventKind::Click, "#check-in-btn", Action::CheckIn)?;
        dispatcher.register(EventKind::Click, "#check-out-btn", Action::CheckOut)?;
        dispatcher.register(EventKind::Click, "#logout-btn", Action::Logout)?;
        dispatcher.register(EventKind::Click, r#"button[data-action*="edit"]"#, Action::EditEmployee)?;
        Ok(dispatcher)
    }

    /// Register a binding. Returns `Ok(false)` if the identical binding is
    /// already present; each binding is attached exactly once.
    pub fn register(
        &mut self,
        event: EventKind,
        selector: &str,
        action: Action,
    ) -> Result<bool, SelectorError> {
        let selector = Selector::parse(selector)?;
        let duplicate = self
            .bindings
            .iter()
            .any(|b| b.event == event && b.action == action && b.selector == selector);
        if duplicate {
            return Ok(false);
        }
        self.bindings.push(Binding {
            event,
            selector,
            action,
        });
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn binding_for(&self, event: &UiEvent) -> Option<&Binding> {
        let kind = event.kind();
        self.bindings
            .iter()
            .find(|b| b.event == kind && b.selector.matches(event.target()))
    }

    /// First registered action whose selector matches the event target.
    pub fn resolve(&self, event: &UiEvent) -> Option<Action> {
        self.binding_for(event).map(|b| b.action)
    }

    pub async fn dispatch<P: Page + ?Sized>(
        &self,
        ctx: &SessionContext,
        page: &mut P,
        event: &UiEvent,
    ) -> ActionOutcome {
        let Some(binding) = self.binding_for(event) else {
            debug!(tag = %event.target().tag, "No binding for event target");
            return ActionOutcome::Ignored;
        };
        let action = binding.action;
        debug!(?action, selector = binding.selector.as_str(), "Dispatching event");

        let target = event.target();
        match action {
            Action::DeleteItem => actions::delete_item(ctx, page, target).await,
            Action::SubmitForm => actions::submit_form(ctx, page, target).await,
            Action::CheckIn => {
                actions::record_attendance(ctx, page, target, AttendanceKind::CheckIn).await
            }
            Action::CheckOut => {
                actions::record_attendance(ctx, page, target, AttendanceKind::CheckOut).await
            }
            Action::Logout => actions::logout(ctx, page).await,
            Action::EditEmployee => actions::edit_employee(ctx, page, target),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockito::{Matcher, Server};
    use reqwest::Client;

    use super::*;
    use crate::auth::{SessionToken, TokenStore};
    use crate::config::Config;
    use crate::page::{Notice, NoticeKind};

    #[derive(Default)]
    struct RecordingPage {
        confirm_answer: bool,
        prompts: Vec<String>,
        notices: Vec<Notice>,
        alerts: Vec<String>,
        navigations: Vec<String>,
        reloads: usize,
        rows: Vec<String>,
        storage_cleared: bool,
    }

    impl RecordingPage {
        fn accepting() -> Self {
            Self {
                confirm_answer: true,
                rows: vec!["41".to_string(), "42".to_string()],
                ..Self::default()
            }
        }
    }

    impl Page for RecordingPage {
        fn confirm(&mut self, prompt: &str) -> bool {
            self.prompts.push(prompt.to_string());
            self.confirm_answer
        }

        fn notify(&mut self, notice: Notice) {
            self.notices.push(notice);
        }

        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }

        fn navigate(&mut self, url: &str) {
            self.navigations.push(url.to_string());
        }

        fn reload(&mut self) {
            self.reloads += 1;
        }

        fn remove_row(&mut self, employee_id: &str) -> bool {
            let before = self.rows.len();
            self.rows.retain(|r| r != employee_id);
            self.rows.len() != before
        }

        fn clear_storage(&mut self) {
            self.storage_cleared = true;
        }
    }

    fn context_for(server: &Server) -> SessionContext {
        let config = Config {
            base_url: server.url(),
            ..Config::default()
        };
        SessionContext::new(config).unwrap()
    }

    async fn context_with_token(server: &Server, token: &str) -> SessionContext {
        let config = Config {
            base_url: server.url(),
            ..Config::default()
        };
        let client = Client::new();
        let tokens = TokenStore::new(client.clone(), config.token_url())
            .with_token(SessionToken::new(token))
            .await;
        SessionContext::with_tokens(config, client, Arc::new(tokens))
    }

    fn delete_button(id: &str) -> UiEvent {
        UiEvent::Click(
            Element::new("button")
                .with_attr("data-action", format!("/api/employees/{}/delete", id))
                .with_attr("data-employee-id", id)
                .with_attr("data-employee-name", "Sara Haddad"),
        )
    }

    // -------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------

    #[test]
    fn test_standard_resolution() {
        let dispatcher = Dispatcher::standard().unwrap();
        assert_eq!(dispatcher.resolve(&delete_button("1")), Some(Action::DeleteItem));
        assert_eq!(
            dispatcher.resolve(&UiEvent::Submit(
                Element::new("form").with_attr("action", "/admin/employees/delete/3")
            )),
            Some(Action::DeleteItem)
        );
        assert_eq!(
            dispatcher.resolve(&UiEvent::Submit(
                Element::new("form")
                    .with_attr("action", "/api/leave")
                    .with_attr("data-requires-auth", "true")
            )),
            Some(Action::SubmitForm)
        );
        assert_eq!(
            dispatcher.resolve(&UiEvent::Click(Element::new("button").with_id("check-in-btn"))),
            Some(Action::CheckIn)
        );
        assert_eq!(
            dispatcher.resolve(&UiEvent::Click(Element::new("a").with_id("logout-btn"))),
            Some(Action::Logout)
        );
        // Submitting something that only matches a click binding does nothing
        assert_eq!(
            dispatcher.resolve(&UiEvent::Submit(Element::new("button").with_id("check-in-btn"))),
            None
        );
    }

    #[test]
    fn test_register_is_exactly_once() {
        let mut dispatcher = Dispatcher::standard().unwrap();
        let count = dispatcher.len();
        assert!(!dispatcher
            .register(EventKind::Click, "#logout-btn", Action::Logout)
            .unwrap());
        assert_eq!(dispatcher.len(), count);
        assert!(dispatcher
            .register(EventKind::Click, "#logout-link", Action::Logout)
            .unwrap());
        assert!(dispatcher.register(EventKind::Click, "a b", Action::Logout).is_err());
    }

    #[tokio::test]
    async fn test_unmatched_event_is_ignored() {
        let server = Server::new_async().await;
        let ctx = context_for(&server);
        let mut page = RecordingPage::accepting();
        let outcome = Dispatcher::standard()
            .unwrap()
            .dispatch(&ctx, &mut page, &UiEvent::Click(Element::new("div")))
            .await;
        assert_eq!(outcome, ActionOutcome::Ignored);
        assert!(page.notices.is_empty());
    }

    // -------------------------------------------------------------------------
    // Delete
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_delete_with_fetched_token() {
        let mut server = Server::new_async().await;
        let token = server
            .mock("GET", "/api/get-token")
            .with_status(200)
            .with_body(r#"{"access_token": "abc", "refresh_token": ""}"#)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/api/employees/42")
            .match_header("authorization", "Bearer abc")
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;

        let ctx = context_for(&server);
        let mut page = RecordingPage::accepting();
        let event = UiEvent::Submit(
            Element::new("form")
                .with_attr("action", "/api/employees/42")
                .with_attr("data-action", "delete")
                .with_attr("data-employee-id", "42"),
        );
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register(EventKind::Submit, "form[data-action*=delete]", Action::DeleteItem)
            .unwrap();

        let outcome = dispatcher.dispatch(&ctx, &mut page, &event).await;
        assert_eq!(outcome, ActionOutcome::Completed);
        assert_eq!(ctx.tokens().cached().await.unwrap().access_token, "abc");
        assert_eq!(page.rows, vec!["41".to_string()]);
        assert_eq!(page.notices, vec![Notice::success("Employee deleted successfully")]);
        token.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let mut server = Server::new_async().await;
        let delete = server
            .mock("DELETE", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let ctx = context_with_token(&server, "abc").await;
        let mut page = RecordingPage {
            confirm_answer: false,
            ..RecordingPage::accepting()
        };
        let outcome = Dispatcher::standard()
            .unwrap()
            .dispatch(&ctx, &mut page, &delete_button("42"))
            .await;

        assert_eq!(outcome, ActionOutcome::Cancelled);
        assert_eq!(page.prompts, vec!["Are you sure you want to delete Sara Haddad?".to_string()]);
        assert_eq!(page.rows.len(), 2);
        assert!(page.notices.is_empty());
        assert_eq!(page.reloads, 0);
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_reported_failure_keeps_row() {
        let mut server = Server::new_async().await;
        let _delete = server
            .mock("DELETE", "/api/employees/42/delete")
            .with_status(200)
            .with_body(r#"{"success": false}"#)
            .create_async()
            .await;

        let ctx = context_with_token(&server, "abc").await;
        let mut page = RecordingPage::accepting();
        let outcome = Dispatcher::standard()
            .unwrap()
            .dispatch(&ctx, &mut page, &delete_button("42"))
            .await;

        assert_eq!(outcome, ActionOutcome::Failed);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.notices.len(), 1);
        assert_eq!(page.notices[0].kind, NoticeKind::Error);
        assert_eq!(page.notices[0].message, "Failed to delete employee");
    }

    #[tokio::test]
    async fn test_delete_custom_confirm_and_reload_without_row() {
        let mut server = Server::new_async().await;
        let _delete = server
            .mock("DELETE", "/admin/departments/delete/5")
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;

        let ctx = context_with_token(&server, "abc").await;
        let mut page = RecordingPage::accepting();
        let event = UiEvent::Submit(
            Element::new("form")
                .with_attr("action", "/admin/departments/delete/5")
                .with_attr("data-confirm", "Remove department?"),
        );
        let outcome = Dispatcher::standard().unwrap().dispatch(&ctx, &mut page, &event).await;

        assert_eq!(outcome, ActionOutcome::Completed);
        assert_eq!(page.prompts, vec!["Remove department?".to_string()]);
        assert_eq!(page.reloads, 1);
    }

    #[tokio::test]
    async fn test_delete_requires_explicit_success() {
        let mut server = Server::new_async().await;
        let ctx = context_with_token(&server, "abc").await;
        let dispatcher = Dispatcher::standard().unwrap();

        for body in ["{}", r#"{"success": null}"#] {
            let _delete = server
                .mock("DELETE", "/api/employees/42/delete")
                .with_status(200)
                .with_body(body)
                .create_async()
                .await;
            let mut page = RecordingPage::accepting();
            let outcome = dispatcher.dispatch(&ctx, &mut page, &delete_button("42")).await;

            assert_eq!(outcome, ActionOutcome::Failed, "body {}", body);
            assert_eq!(page.rows.len(), 2);
            assert_eq!(page.notices, vec![Notice::error("Failed to delete employee")]);
        }
    }

    #[tokio::test]
    async fn test_delete_non_json_reply_is_an_error() {
        let mut server = Server::new_async().await;
        let _delete = server
            .mock("DELETE", "/api/employees/42/delete")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html>login</html>")
            .create_async()
            .await;

        let ctx = context_with_token(&server, "abc").await;
        let mut page = RecordingPage::accepting();
        let outcome = Dispatcher::standard()
            .unwrap()
            .dispatch(&ctx, &mut page, &delete_button("42"))
            .await;

        assert_eq!(outcome, ActionOutcome::Failed);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.reloads, 0);
        assert_eq!(
            page.notices,
            vec![Notice::error("An error occurred while trying to delete this item")]
        );
    }

    #[tokio::test]
    async fn test_delete_sends_json_content_type() {
        let mut server = Server::new_async().await;
        let delete = server
            .mock("DELETE", "/api/employees/42/delete")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;

        let ctx = context_with_token(&server, "abc").await;
        let mut page = RecordingPage::accepting();
        let outcome = Dispatcher::standard()
            .unwrap()
            .dispatch(&ctx, &mut page, &delete_button("42"))
            .await;
        assert_eq!(outcome, ActionOutcome::Completed);
        delete.assert_async().await;
    }

    // -------------------------------------------------------------------------
    // Authorization failures
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_no_token_redirects_without_calling_target() {
        let mut server = Server::new_async().await;
        let _token = server
            .mock("GET", "/api/get-token")
            .with_status(401)
            .create_async()
            .await;
        let delete = server.mock("DELETE", Matcher::Any).expect(0).create_async().await;
        let attendance = server
            .mock("POST", "/api/attendance")
            .expect(0)
            .create_async()
            .await;

        let ctx = context_for(&server);
        let dispatcher = Dispatcher::standard().unwrap();

        let mut page = RecordingPage::accepting();
        let outcome = dispatcher.dispatch(&ctx, &mut page, &delete_button("42")).await;
        assert_eq!(outcome, ActionOutcome::RedirectedToLogin);
        assert_eq!(page.navigations, vec!["/login".to_string()]);
        assert_eq!(page.rows.len(), 2);

        let mut page = RecordingPage::accepting();
        let check_in = UiEvent::Click(
            Element::new("button")
                .with_id("check-in-btn")
                .with_attr("data-employee-id", "42"),
        );
        let outcome = dispatcher.dispatch(&ctx, &mut page, &check_in).await;
        assert_eq!(outcome, ActionOutcome::RedirectedToLogin);
        assert_eq!(page.navigations, vec!["/login".to_string()]);

        delete.assert_async().await;
        attendance.assert_async().await;
    }

    #[tokio::test]
    async fn test_401_redirects_for_every_action() {
        let mut server = Server::new_async().await;
        let _delete = server.mock("DELETE", Matcher::Any).with_status(401).create_async().await;
        let _post = server.mock("POST", Matcher::Any).with_status(401).create_async().await;

        let ctx = context_with_token(&server, "expired").await;
        let dispatcher = Dispatcher::standard().unwrap();
        let events = vec![
            delete_button("42"),
            UiEvent::Submit(
                Element::new("form")
                    .with_attr("action", "/api/leave")
                    .with_attr("data-requires-auth", "true"),
            ),
            UiEvent::Click(
                Element::new("button")
                    .with_id("check-out-btn")
                    .with_attr("data-employee-id", "42"),
            ),
        ];
        for event in &events {
            let mut page = RecordingPage::accepting();
            let outcome = dispatcher.dispatch(&ctx, &mut page, event).await;
            assert_eq!(outcome, ActionOutcome::RedirectedToLogin);
            assert_eq!(page.navigations, vec!["/login".to_string()]);
        }
    }

    #[tokio::test]
    async fn test_403_alerts_without_navigation() {
        let mut server = Server::new_async().await;
        let _delete = server
            .mock("DELETE", "/api/employees/42/delete")
            .with_status(403)
            .with_body(r#"{"error": "Access denied"}"#)
            .create_async()
            .await;

        let ctx = context_with_token(&server, "abc").await;
        let mut page = RecordingPage::accepting();
        let outcome = Dispatcher::standard()
            .unwrap()
            .dispatch(&ctx, &mut page, &delete_button("42"))
            .await;

        assert_eq!(outcome, ActionOutcome::Denied);
        assert_eq!(page.alerts.len(), 1);
        assert!(page.navigations.is_empty());
        assert_eq!(page.reloads, 0);
        assert_eq!(page.rows.len(), 2);
    }

    #[tokio::test]
    async fn test_403_on_attendance_is_generic_error() {
        let mut server = Server::new_async().await;
        let _post = server
            .mock("POST", "/api/attendance")
            .with_status(403)
            .create_async()
            .await;

        let ctx = context_with_token(&server, "abc").await;
        let mut page = RecordingPage::accepting();
        let event = UiEvent::Click(
            Element::new("button")
                .with_id("check-in-btn")
                .with_attr("data-employee-id", "42"),
        );
        let outcome = Dispatcher::standard().unwrap().dispatch(&ctx, &mut page, &event).await;
        assert_eq!(outcome, ActionOutcome::Failed);
        assert!(page.alerts.is_empty());
        assert_eq!(page.notices[0].kind, NoticeKind::Error);
    }

    #[tokio::test]
    async fn test_server_error_shows_generic_notice() {
        let mut server = Server::new_async().await;
        let _delete = server
            .mock("DELETE", "/api/employees/42/delete")
            .with_status(500)
            .create_async()
            .await;

        let ctx = context_with_token(&server, "abc").await;
        let mut page = RecordingPage::accepting();
        let outcome = Dispatcher::standard()
            .unwrap()
            .dispatch(&ctx, &mut page, &delete_button("42"))
            .await;
        assert_eq!(outcome, ActionOutcome::Failed);
        assert_eq!(
            page.notices,
            vec![Notice::error("An error occurred while trying to delete this item")]
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_not_a_login_redirect() {
        let config = Config {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        let dispatcher = Dispatcher::standard().unwrap();

        // Token cached, target unreachable
        let ctx = SessionContext::with_seeded_token(config.clone(), SessionToken::new("abc"))
            .await
            .unwrap();
        let mut page = RecordingPage::accepting();
        let outcome = dispatcher.dispatch(&ctx, &mut page, &delete_button("42")).await;
        assert_eq!(outcome, ActionOutcome::Failed);
        assert_eq!(page.notices, vec![Notice::error(actions::UNREACHABLE_MESSAGE)]);
        assert!(page.navigations.is_empty());
        assert_eq!(page.rows.len(), 2);

        // No token yet, token endpoint unreachable
        let ctx = SessionContext::new(config).unwrap();
        let mut page = RecordingPage::accepting();
        let check_in = UiEvent::Click(
            Element::new("button")
                .with_id("check-in-btn")
                .with_attr("data-employee-id", "42"),
        );
        let outcome = dispatcher.dispatch(&ctx, &mut page, &check_in).await;
        assert_eq!(outcome, ActionOutcome::Failed);
        assert_eq!(page.notices, vec![Notice::error(actions::UNREACHABLE_MESSAGE)]);
        assert!(page.navigations.is_empty());
        assert_eq!(page.reloads, 0);
    }

    // -------------------------------------------------------------------------
    // Forms, attendance, navigation
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_auth_form_submit_redirects() {
        let mut server = Server::new_async().await;
        let post = server
            .mock("POST", "/api/leave")
            .match_header("authorization", "Bearer abc")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("leave_type".into(), "annual".into()),
                Matcher::UrlEncoded("start_date".into(), "2026-11-01".into()),
            ]))
            .with_status(201)
            .with_body(r#"{"message": "Leave requested"}"#)
            .create_async()
            .await;

        let ctx = context_with_token(&server, "abc").await;
        let mut page = RecordingPage::accepting();
        let event = UiEvent::Submit(
            Element::new("form")
                .with_attr("action", "/api/leave")
                .with_attr("method", "post")
                .with_attr("data-requires-auth", "true")
                .with_attr("data-redirect", "/leaves")
                .with_field("leave_type", "annual")
                .with_field("start_date", "2026-11-01"),
        );
        let outcome = Dispatcher::standard().unwrap().dispatch(&ctx, &mut page, &event).await;

        assert_eq!(outcome, ActionOutcome::Completed);
        assert_eq!(page.navigations, vec!["/leaves".to_string()]);
        assert_eq!(page.notices, vec![Notice::success("Leave requested")]);
        assert_eq!(page.reloads, 0);
        post.assert_async().await;
    }

    #[tokio::test]
    async fn test_auth_form_without_redirect_reloads() {
        let mut server = Server::new_async().await;
        let _put = server
            .mock("PUT", "/api/employees/42")
            .with_status(200)
            .create_async()
            .await;

        let ctx = context_with_token(&server, "abc").await;
        let mut page = RecordingPage::accepting();
        let event = UiEvent::Submit(
            Element::new("form")
                .with_attr("action", "/api/employees/42")
                .with_attr("method", "PUT")
                .with_attr("data-requires-auth", "true"),
        );
        let outcome = Dispatcher::standard().unwrap().dispatch(&ctx, &mut page, &event).await;
        assert_eq!(outcome, ActionOutcome::Completed);
        assert_eq!(page.reloads, 1);
    }

    #[tokio::test]
    async fn test_get_form_sends_fields_as_query() {
        let mut server = Server::new_async().await;
        let get = server
            .mock("GET", "/api/employees/search")
            .match_header("authorization", "Bearer abc")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "sara".into()),
                Matcher::UrlEncoded("department".into(), "sales".into()),
            ]))
            .match_body(Matcher::Exact(String::new()))
            .with_status(200)
            .create_async()
            .await;

        let ctx = context_with_token(&server, "abc").await;
        let mut page = RecordingPage::accepting();
        let event = UiEvent::Submit(
            Element::new("form")
                .with_attr("action", "/api/employees/search")
                .with_attr("method", "get")
                .with_attr("data-requires-auth", "true")
                .with_field("q", "sara")
                .with_field("department", "sales"),
        );
        let outcome = Dispatcher::standard().unwrap().dispatch(&ctx, &mut page, &event).await;
        assert_eq!(outcome, ActionOutcome::Completed);
        get.assert_async().await;
    }

    #[tokio::test]
    async fn test_check_in_shows_server_message() {
        let mut server = Server::new_async().await;
        let post = server
            .mock("POST", "/api/attendance")
            .match_header("authorization", "Bearer abc")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "employee_id": "42",
                "status": "present"
            })))
            .with_status(201)
            .with_body(r#"{"message": "Attendance recorded"}"#)
            .create_async()
            .await;

        let ctx = context_with_token(&server, "abc").await;
        let mut page = RecordingPage::accepting();
        let event = UiEvent::Click(
            Element::new("button")
                .with_id("check-in-btn")
                .with_attr("data-employee-id", "42"),
        );
        let outcome = Dispatcher::standard().unwrap().dispatch(&ctx, &mut page, &event).await;

        assert_eq!(outcome, ActionOutcome::Completed);
        assert_eq!(page.notices, vec![Notice::success("Attendance recorded")]);
        assert_eq!(page.reloads, 1);
        post.assert_async().await;
    }

    #[tokio::test]
    async fn test_logout_clears_and_leaves_through_idp() {
        let server = Server::new_async().await;
        let ctx = context_with_token(&server, "abc").await;
        let mut page = RecordingPage::accepting();
        let outcome = Dispatcher::standard()
            .unwrap()
            .dispatch(&ctx, &mut page, &UiEvent::Click(Element::new("a").with_id("logout-btn")))
            .await;

        assert_eq!(outcome, ActionOutcome::Completed);
        assert!(page.storage_cleared);
        assert!(ctx.tokens().cached().await.is_none());
        assert_eq!(page.navigations.len(), 1);
        assert!(page.navigations[0].starts_with(
            "http://localhost:8080/realms/HR-System/protocol/openid-connect/logout?redirect_uri="
        ));
    }

    #[tokio::test]
    async fn test_edit_navigates_to_edit_page() {
        let server = Server::new_async().await;
        let ctx = context_for(&server);
        let mut page = RecordingPage::accepting();
        let event = UiEvent::Click(
            Element::new("button")
                .with_attr("data-action", "edit")
                .with_attr("data-employee-id", "7"),
        );
        let outcome = Dispatcher::standard().unwrap().dispatch(&ctx, &mut page, &event).await;
        assert_eq!(outcome, ActionOutcome::Completed);
        assert_eq!(page.navigations, vec!["/admin/employees/edit/7".to_string()]);
    }

    #[tokio::test]
    async fn test_elements_created_after_start_are_handled() {
        let mut server = Server::new_async().await;
        let _delete = server
            .mock("DELETE", "/api/employees/99/delete")
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;

        let ctx = context_with_token(&server, "abc").await;
        let dispatcher = Dispatcher::standard().unwrap();

        // Row inserted after the dispatcher was built
        let mut page = RecordingPage::accepting();
        page.rows.push("99".to_string());
        let outcome = dispatcher.dispatch(&ctx, &mut page, &delete_button("99")).await;
        assert_eq!(outcome, ActionOutcome::Completed);
        assert!(!page.rows.contains(&"99".to_string()));
    }
}
