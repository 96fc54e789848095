use axum::{
    extract::{Form, Path, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::models::{AppState, UserRecord, UserRow};
use crate::services::{generate_password_hash, persist_users_file};
use crate::templates::UsersTemplate;

use super::helpers::{build_template_globals, ensure_owner, push_flash, render_template, TemplateGlobals};

pub async fn users_list(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(r) = ensure_owner(&state, &jar) {
        return r.into_response();
    }
    let users = state.users.lock().unwrap();
    let mut rows: Vec<UserRow> = users
        .iter()
        .map(|(k, v)| UserRow {
            username: k.clone(),
            role: v.role.clone(),
        })
        .collect();
    rows.sort_by(|a, b| a.username.cmp(&b.username));
    drop(users);
    let TemplateGlobals {
        current_user,
        site_host,
        base_url,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    render_template(
        &state,
        &jar,
        UsersTemplate {
            current_user,
            site_host,
            base_url,
            flash_messages,
            has_flash_messages,
            rows: &rows,
        },
    )
}

#[derive(Deserialize)]
pub struct CreateUserForm {
    pub username: String,
    pub password: String,
    pub role: String,
}

pub async fn users_create(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CreateUserForm>,
) -> impl IntoResponse {
    if let Some(r) = ensure_owner(&state, &jar) {
        return r.into_response();
    }
    let uname = form.username.trim().to_lowercase();
    let role = if form.role == "owner" { "owner" } else { "editor" };
    let mut users = state.users.lock().unwrap();
    if uname.is_empty() || users.contains_key(&uname) {
        drop(users);
        push_flash(&state, &jar, "User already exists or the name is empty");
        return Redirect::to("/users").into_response();
    }
    users.insert(
        uname.clone(),
        UserRecord {
            password: generate_password_hash(&form.password),
            role: role.to_string(),
        },
    );
    drop(users);
    if let Err(e) = persist_users_file(&state.users) {
        tracing::error!(%e, "Failed to persist users.json");
        push_flash(&state, &jar, "Failed to write users.json");
    } else {
        push_flash(&state, &jar, format!("User '{}' added", uname));
    }
    Redirect::to("/users").into_response()
}

#[derive(Deserialize)]
pub struct ResetPasswordForm {
    pub username: String,
    pub password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ResetPasswordForm>,
) -> impl IntoResponse {
    if let Some(r) = ensure_owner(&state, &jar) {
        return r.into_response();
    }
    let uname = form.username.trim().to_lowercase();
    let mut users = state.users.lock().unwrap();
    match users.get_mut(&uname) {
        Some(rec) => rec.password = generate_password_hash(&form.password),
        None => {
            drop(users);
            push_flash(&state, &jar, "User not found");
            return Redirect::to("/users").into_response();
        }
    }
    drop(users);
    if let Err(e) = persist_users_file(&state.users) {
        tracing::error!(%e, "Failed to persist users.json");
        push_flash(&state, &jar, "Failed to write users.json");
    } else {
        push_flash(&state, &jar, format!("Password for '{}' updated", uname));
    }
    Redirect::to("/users").into_response()
}

#[derive(Deserialize)]
pub struct UpdateRoleForm {
    pub role: String,
}

pub async fn update_role(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(username): Path<String>,
    Form(form): Form<UpdateRoleForm>,
) -> impl IntoResponse {
    if let Some(r) = ensure_owner(&state, &jar) {
        return r.into_response();
    }
    let uname = username.to_lowercase();
    let role = if form.role == "owner" { "owner" } else { "editor" };
    let mut users = state.users.lock().unwrap();
    match users.get_mut(&uname) {
        Some(rec) => rec.role = role.to_string(),
        None => {
            drop(users);
            push_flash(&state, &jar, "User not found");
            return Redirect::to("/users").into_response();
        }
    }
    drop(users);
    if let Err(e) = persist_users_file(&state.users) {
        tracing::error!(%e, "Failed to persist users.json");
    }
    push_flash(&state, &jar, format!("Role for '{}' set to {}", uname, role));
    Redirect::to("/users").into_response()
}

pub async fn delete_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(username): Path<String>,
) -> impl IntoResponse {
    if let Some(r) = ensure_owner(&state, &jar) {
        return r.into_response();
    }
    let uname = username.to_lowercase();
    let mut users = state.users.lock().unwrap();
    // The last owner cannot be deleted, or nobody could administer the site.
    let owner_count = users.values().filter(|r| r.role == "owner").count();
    let is_owner = users.get(&uname).map(|r| r.role == "owner").unwrap_or(false);
    if is_owner && owner_count <= 1 {
        drop(users);
        push_flash(&state, &jar, "Cannot delete the last owner");
        return Redirect::to("/users").into_response();
    }
    if users.remove(&uname).is_none() {
        drop(users);
        push_flash(&state, &jar, "User not found");
        return Redirect::to("/users").into_response();
    }
    drop(users);
    if let Err(e) = persist_users_file(&state.users) {
        tracing::error!(%e, "Failed to persist users.json");
    }
    push_flash(&state, &jar, format!("User '{}' deleted", uname));
    Redirect::to("/users").into_response()
}
