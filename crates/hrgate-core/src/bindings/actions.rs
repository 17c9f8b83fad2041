use reqwest::Method;
use tracing::{error, info, warn};

use crate::api::{Classification, GatewayError, RequestDescriptor};
use crate::context::SessionContext;
use crate::models::{ActionResult, AttendanceKind, AttendanceRequest};
use crate::page::{Element, Notice, Page};

use super::ActionOutcome;

/// Row attribute identifying the employee a control acts on
pub const EMPLOYEE_ID_ATTR: &str = "data-employee-id";

const ACCESS_DENIED_MESSAGE: &str = "Access denied: you do not have permission to perform this action.";
pub(crate) const UNREACHABLE_MESSAGE: &str = "Could not reach the server. Please try again.";

fn delete_prompt(target: &Element) -> String {
    if let Some(prompt) = target.attr_non_empty("data-confirm") {
        return prompt.to_string();
    }
    let subject = target.attr_non_empty("data-employee-name").unwrap_or("this item");
    format!("Are you sure you want to delete {}?", subject)
}

/// Map a failed request onto the page: login redirect, access-denied alert,
/// or a generic error notice. Every path is visible to the user.
pub(crate) fn react_to_failure<P: Page + ?Sized>(
    ctx: &SessionContext,
    page: &mut P,
    action: &str,
    err: &GatewayError,
    forbidden_is_error: bool,
) -> ActionOutcome {
    if err.requires_login() {
        warn!(action, error = %err, "Not authenticated, redirecting to login");
        page.navigate(ctx.login_path());
        return ActionOutcome::RedirectedToLogin;
    }
    match err.classification() {
        Classification::Forbidden if !forbidden_is_error => {
            warn!(action, "Access denied");
            page.alert(ACCESS_DENIED_MESSAGE);
            ActionOutcome::Denied
        }
        Classification::TransportFailure => {
            error!(action, error = %err, "Server unreachable");
            page.notify(Notice::error(UNREACHABLE_MESSAGE));
            ActionOutcome::Failed
        }
        _ => {
            error!(action, error = %err, "Action failed");
            page.notify(Notice::error(format!("An error occurred while trying to {}", action)));
            ActionOutcome::Failed
        }
    }
}

/// DELETE the item behind a form `action` or button `data-action`, after
/// confirmation.
pub(crate) async fn delete_item<P: Page + ?Sized>(
    ctx: &SessionContext,
    page: &mut P,
    target: &Element,
) -> ActionOutcome {
    let Some(url) = target
        .attr_non_empty("action")
        .or_else(|| target.attr_non_empty("data-action"))
    else {
        warn!(tag = %target.tag, "Delete control has no target URL");
        page.notify(Notice::error("Nothing to delete: missing target URL"));
        return ActionOutcome::Failed;
    };

    if !page.confirm(&delete_prompt(target)) {
        info!(url, "Delete cancelled by user");
        return ActionOutcome::Cancelled;
    }

    let request = RequestDescriptor::delete(url).header("Content-Type", "application/json");
    let reply = match ctx.gateway().send(&request).await {
        Ok(reply) => reply,
        Err(e) => return react_to_failure(ctx, page, "delete this item", &e, false),
    };

    // A delete only counts once the server confirms it with `"success": true`
    let result: ActionResult = match reply.json() {
        Ok(result) => result,
        Err(e) => return react_to_failure(ctx, page, "delete this item", &e, false),
    };
    if !result.is_confirmed() {
        warn!(url, "Server rejected delete");
        page.notify(Notice::error(result.text().unwrap_or("Failed to delete employee")));
        return ActionOutcome::Failed;
    }

    match target.attr_non_empty(EMPLOYEE_ID_ATTR) {
        Some(id) if page.remove_row(id) => {}
        _ => page.reload(),
    }
    page.notify(Notice::success(result.text().unwrap_or("Employee deleted successfully")));
    info!(url, "Item deleted");
    ActionOutcome::Completed
}

/// Submit a form marked `data-requires-auth="true"` through the gateway.
pub(crate) async fn submit_form<P: Page + ?Sized>(
    ctx: &SessionContext,
    page: &mut P,
    form: &Element,
) -> ActionOutcome {
    let Some(url) = form.attr_non_empty("action") else {
        warn!("Authenticated form has no action");
        page.notify(Notice::error("This form cannot be submitted: missing action"));
        return ActionOutcome::Failed;
    };
    let method = match RequestDescriptor::parse_method(form.attr("method").unwrap_or_default()) {
        Ok(method) => method,
        Err(e) => return react_to_failure(ctx, page, "submit this form", &e, false),
    };

    if let Some(prompt) = form.attr_non_empty("data-confirm") {
        if !page.confirm(prompt) {
            info!(url, "Form submission cancelled by user");
            return ActionOutcome::Cancelled;
        }
    }

    // GET forms carry their fields in the query string, like a browser submit
    let request = if method == Method::GET {
        RequestDescriptor::new(method, url).query(form.fields.clone())
    } else {
        RequestDescriptor::new(method, url).form(form.fields.clone())
    };
    let reply = match ctx.gateway().send(&request).await {
        Ok(reply) => reply,
        Err(e) => return react_to_failure(ctx, page, "submit this form", &e, false),
    };

    let result = ActionResult::from_body(&reply.body);
    if !result.is_success() {
        page.notify(Notice::error(result.text().unwrap_or("Submission failed")));
        return ActionOutcome::Failed;
    }

    if let Some(text) = result.text() {
        page.notify(Notice::success(text));
    }
    match form.attr_non_empty("data-redirect") {
        Some(target) => page.navigate(target),
        None => page.reload(),
    }
    ActionOutcome::Completed
}

/// POST a check-in or check-out for the employee on the button.
pub(crate) async fn record_attendance<P: Page + ?Sized>(
    ctx: &SessionContext,
    page: &mut P,
    button: &Element,
    kind: AttendanceKind,
) -> ActionOutcome {
    let Some(employee_id) = button.attr_non_empty(EMPLOYEE_ID_ATTR) else {
        warn!(kind = kind.label(), "Attendance button has no employee id");
        page.notify(Notice::error(format!("{} failed: no employee selected", kind.label())));
        return ActionOutcome::Failed;
    };

    let payload = AttendanceRequest::now(kind, employee_id);
    let request = match RequestDescriptor::post(&ctx.config().attendance_path).json(&payload) {
        Ok(request) => request,
        Err(e) => return react_to_failure(ctx, page, "record attendance", &e, true),
    };

    // 403 is not expected here and is reported like any other error
    let reply = match ctx.gateway().send(&request).await {
        Ok(reply) => reply,
        Err(e) => return react_to_failure(ctx, page, "record attendance", &e, true),
    };

    let result = ActionResult::from_body(&reply.body);
    if !result.is_success() {
        page.notify(Notice::error(
            result.text().unwrap_or("Attendance could not be recorded"),
        ));
        return ActionOutcome::Failed;
    }

    let message = result
        .text()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} recorded", kind.label()));
    page.notify(Notice::success(message));
    page.reload();
    ActionOutcome::Completed
}

/// Clear the token cache and page storage, then leave through the identity
/// provider so its session ends too.
pub(crate) async fn logout<P: Page + ?Sized>(ctx: &SessionContext, page: &mut P) -> ActionOutcome {
    page.clear_storage();
    match ctx.logout().await {
        Ok(url) => page.navigate(&url),
        Err(e) => {
            // Local state is already gone; fall back to the portal's login page
            error!(error = %e, "Could not build identity provider logout URL");
            page.navigate(ctx.login_path());
        }
    }
    ActionOutcome::Completed
}

/// Open the edit page for the employee on the control.
pub(crate) fn edit_employee<P: Page + ?Sized>(
    ctx: &SessionContext,
    page: &mut P,
    target: &Element,
) -> ActionOutcome {
    match target.attr_non_empty(EMPLOYEE_ID_ATTR) {
        Some(id) => {
            info!(employee_id = id, "Editing employee");
            page.navigate(&ctx.config().edit_path(id));
            ActionOutcome::Completed
        }
        None => {
            page.notify(Notice::error("No employee selected to edit"));
            ActionOutcome::Failed
        }
    }
}
