use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::models::{AppState, CacheStats};
use crate::services::enrich_venues;
use crate::templates::AdminTemplate;

use super::helpers::{build_template_globals, ensure_owner, push_flash, render_template, TemplateGlobals};

pub fn gather_cache_stats(state: &AppState) -> CacheStats {
    CacheStats {
        cities_loaded: state.geo.cities.is_loaded(),
        cities_count: state.geo.cities.len(),
        index_built: state.geo.cities.index_built(),
        admin1_count: state.geo.admin1.len(),
        slugs_count: state.geo.slugs.len(),
        venues_count: state.venues.len(),
        hidden_count: state.hidden_venues.lock().unwrap().len(),
    }
}

pub async fn admin_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(r) = ensure_owner(&state, &jar) {
        return r.into_response();
    }
    let stats = gather_cache_stats(&state);
    let mut hidden: Vec<String> = state.hidden_venues.lock().unwrap().iter().cloned().collect();
    hidden.sort();

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
        AdminTemplate {
            current_user,
            site_host,
            base_url,
            flash_messages,
            has_flash_messages,
            stats,
            hidden,
        },
    )
}

pub async fn admin_reload_post(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(r) = ensure_owner(&state, &jar) {
        return r.into_response();
    }
    state.geo.reload();
    state.venues.clear();
    tracing::info!("Caches cleared; next access reloads from disk");
    push_flash(&state, &jar, "Caches reloaded");
    Redirect::to("/admin").into_response()
}

pub async fn admin_enrich_post(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(r) = ensure_owner(&state, &jar) {
        return r.into_response();
    }
    match enrich_venues(&state) {
        Ok(stats) => push_flash(
            &state,
            &jar,
            format!("Enriched {} of {} venues", stats.enriched, stats.scanned),
        ),
        Err(e) => {
            tracing::error!(%e, "Enrichment failed");
            push_flash(&state, &jar, format!("Enrichment failed: {}", e));
        }
    }
    Redirect::to("/admin").into_response()
}

#[derive(Deserialize)]
pub struct HiddenForm {
    pub venue_id: String,
    pub action: String,
}

pub async fn admin_hidden_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<HiddenForm>,
) -> impl IntoResponse {
    if let Some(r) = ensure_owner(&state, &jar) {
        return r.into_response();
    }
    let id = form.venue_id.trim().to_string();
    if id.is_empty() {
        return Redirect::to("/admin").into_response();
    }
    let mut hidden = state.hidden_venues.lock().unwrap();
    let message = if form.action == "show" {
        hidden.remove(&id);
        format!("Venue '{}' is visible again", id)
    } else {
        hidden.insert(id.clone());
        format!("Venue '{}' hidden from listings", id)
    };
    drop(hidden);
    push_flash(&state, &jar, message);
    Redirect::to("/admin").into_response()
}
