use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::models::{AppState, CurrentUser};

pub fn session_id_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get("session_id").map(|c| c.value().to_string())
}

pub fn current_username_from_jar(state: &AppState, jar: &CookieJar) -> Option<String> {
    let sid = session_id_from_jar(jar)?;
    state.sessions.lock().unwrap().get(&sid).cloned()
}

pub fn build_current_user(state: &AppState, jar: &CookieJar) -> Option<CurrentUser> {
    let username = current_username_from_jar(state, jar)?;
    let users = state.users.lock().unwrap();
    let rec = users.get(&username)?;
    Some(CurrentUser {
        username: username.clone(),
        role: rec.role.clone(),
    })
}

pub fn take_flash_messages(state: &AppState, jar: &CookieJar) -> Vec<String> {
    let sid = match session_id_from_jar(jar) {
        Some(s) => s,
        None => return vec![],
    };
    let mut fs = state.flash_store.lock().unwrap();
    fs.remove(&sid).unwrap_or_default()
}

pub fn push_flash(state: &AppState, jar: &CookieJar, message: impl Into<String>) {
    if let Some(sid) = session_id_from_jar(jar) {
        state
            .flash_store
            .lock()
            .unwrap()
            .entry(sid)
            .or_default()
            .push(message.into());
    }
}

#[derive(Default)]
pub struct TemplateGlobals {
    pub current_user: Option<CurrentUser>,
    pub site_host: String,
    pub base_url: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
}

pub fn build_template_globals(state: &AppState, jar: &CookieJar) -> TemplateGlobals {
    let current_user = build_current_user(state, jar);
    let flash_messages = take_flash_messages(state, jar);
    let has_flash_messages = !flash_messages.is_empty();
    TemplateGlobals {
        current_user,
        site_host: crate::utils::hostname_from_url(&state.public_base_url),
        base_url: state.public_base_url.clone(),
        flash_messages,
        has_flash_messages,
    }
}

pub fn inject_context(state: &AppState, jar: &CookieJar, mut html: String) -> Response {
    // Global context object for the small amount of client-side JS.
    let current_user = build_current_user(state, jar);
    let context = serde_json::json!({
        "baseUrl": state.public_base_url,
        "currentUser": current_user,
    });
    let context_str = serde_json::to_string(&context).unwrap_or_default();
    let inject = format!(
        r#"<script>window.__APP_CONTEXT__ = {};</script></body>"#,
        context_str
    );
    html = html.replace("</body>", &inject);
    Html(html).into_response()
}

pub fn render_template<T: askama::Template>(state: &AppState, jar: &CookieJar, t: T) -> Response {
    match t.render() {
        Ok(body) => inject_context(state, jar, body),
        Err(e) => {
            tracing::error!(%e, "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

pub fn plain_html<S: AsRef<str>>(s: S) -> Response {
    Html(format!(
        "<!DOCTYPE html><html><body><p>{}</p></body></html>",
        s.as_ref()
    ))
    .into_response()
}

pub fn not_found<S: AsRef<str>>(s: S) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(format!(
            "<!DOCTYPE html><html><body><p>{}</p></body></html>",
            s.as_ref()
        )),
    )
        .into_response()
}

pub fn ensure_logged_in(state: &AppState, jar: &CookieJar) -> Option<Redirect> {
    if current_username_from_jar(state, jar).is_none() {
        return Some(Redirect::to("/login"));
    }
    None
}

pub fn ensure_owner(state: &AppState, jar: &CookieJar) -> Option<Redirect> {
    match build_current_user(state, jar) {
        Some(user) if user.is_owner() => None,
        Some(_) => Some(Redirect::to("/venues")),
        None => Some(Redirect::to("/login")),
    }
}

pub fn ensure_editor_or_owner(state: &AppState, jar: &CookieJar) -> Option<Redirect> {
    match build_current_user(state, jar) {
        Some(user) if user.can_edit() => None,
        Some(_) => Some(Redirect::to("/venues")),
        None => Some(Redirect::to("/login")),
    }
}

/// JSON API variant of the auth checks: 401/403 instead of a redirect.
pub fn require_api_editor(state: &AppState, jar: &CookieJar) -> Result<CurrentUser, Response> {
    match build_current_user(state, jar) {
        Some(user) if user.can_edit() => Ok(user),
        Some(_) => Err((
            StatusCode::FORBIDDEN,
            axum::Json(serde_json::json!({"error": "editor role required"})),
        )
            .into_response()),
        None => Err((
            StatusCode::UNAUTHORIZED,
            axum::Json(serde_json::json!({"error": "authentication required"})),
        )
            .into_response()),
    }
}

pub fn absolute_url_from_state(state: &AppState, path: &str) -> String {
    crate::utils::absolute_url(&state.public_base_url, path)
}
