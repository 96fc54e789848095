use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;

use crate::models::AppState;
use crate::templates::AboutTemplate;

use super::helpers::{build_template_globals, render_template, TemplateGlobals};

pub async fn about_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
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
        AboutTemplate {
            current_user,
            site_host,
            base_url,
            flash_messages,
            has_flash_messages,
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

pub async fn health_get(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "venues": state.venues.len(),
    }))
}
