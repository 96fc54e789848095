use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::collections::HashMap;

use crate::geo::valid_coordinates;
use crate::models::{AppState, Venue, VenueRow, VenueView};
use crate::services::venue_service::{parse_tag_lines, tag_lines};
use crate::services::{allocate_venue_id, search_venues, SearchFilter};
use crate::templates::{VenueDetailTemplate, VenueEditTemplate, VenuesPageTemplate};
use crate::utils::{build_query_string, parse_flag, parse_optional_int};

use super::helpers::{
    build_current_user, build_template_globals, ensure_editor_or_owner, not_found, push_flash,
    render_template, require_api_editor, TemplateGlobals,
};

const DEFAULT_PER_PAGE: usize = 25;

fn filter_from_query(q: &HashMap<String, String>) -> SearchFilter {
    SearchFilter {
        q: q.get("q").cloned().unwrap_or_default(),
        category: q.get("category").cloned().unwrap_or_default(),
        country: q.get("country").cloned().unwrap_or_default(),
        limit: None,
    }
}

fn visible_venues(state: &AppState, filter: &SearchFilter, include_hidden: bool) -> Vec<Venue> {
    search_venues(&state.venues, filter)
        .into_iter()
        .filter(|v| include_hidden || !state.is_venue_hidden(&v.id))
        .collect()
}

fn distinct_categories(venues: &[Venue]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for v in venues {
        let c = v.category_or_tag().to_lowercase();
        if !c.is_empty() && !categories.contains(&c) {
            categories.push(c);
        }
    }
    categories.sort();
    categories
}

fn page_query_string(filter: &SearchFilter, page: usize) -> String {
    let mut pairs: Vec<(String, String)> = Vec::new();
    if !filter.q.is_empty() {
        pairs.push(("q".into(), filter.q.clone()));
    }
    if !filter.category.is_empty() {
        pairs.push(("category".into(), filter.category.clone()));
    }
    if !filter.country.is_empty() {
        pairs.push(("country".into(), filter.country.clone()));
    }
    pairs.push(("page".into(), page.to_string()));
    build_query_string(&pairs)
}

pub async fn venues_list(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let filter = filter_from_query(&query);
    let editor = build_current_user(&state, &jar).map(|u| u.can_edit()).unwrap_or(false);
    let venues = visible_venues(&state, &filter, editor);
    let categories = distinct_categories(&state.venues.all());

    let total_count = venues.len();
    let per_page = parse_optional_int(query.get("per_page"))
        .filter(|n| *n > 0)
        .map(|n| n as usize)
        .unwrap_or(DEFAULT_PER_PAGE);
    let total_pages = total_count.div_ceil(per_page).max(1);
    let current_page = parse_optional_int(query.get("page"))
        .filter(|n| *n > 0)
        .map(|n| n as usize)
        .unwrap_or(1)
        .min(total_pages);
    let start = (current_page - 1) * per_page;
    let rows: Vec<VenueRow> = venues
        .iter()
        .skip(start)
        .take(per_page)
        .map(VenueRow::from_venue)
        .collect();

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
        VenuesPageTemplate {
            current_user,
            site_host,
            base_url,
            flash_messages,
            has_flash_messages,
            rows: &rows,
            q: filter.q.clone(),
            category: filter.category.clone(),
            country: filter.country.clone(),
            categories,
            total_count,
            current_page,
            total_pages,
            prev_qs: page_query_string(&filter, current_page.saturating_sub(1).max(1)),
            next_qs: page_query_string(&filter, (current_page + 1).min(total_pages)),
        },
    )
}

pub async fn venue_detail(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let current = build_current_user(&state, &jar);
    let can_edit = current.as_ref().map(|u| u.can_edit()).unwrap_or(false);
    let venue = match state.venues.get(&id) {
        Some(v) if can_edit || !state.is_venue_hidden(&v.id) => v,
        _ => return not_found("Venue not found"),
    };
    let admin1_name = venue
        .tag("addr:country")
        .zip(venue.tag("addr:state"))
        .and_then(|(country, state_code)| state.geo.admin1.name_for(country, state_code));
    let address = crate::utils::format_address(&venue.tags, admin1_name.as_deref());
    let view = VenueView::from_venue(&venue, address);

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
        VenueDetailTemplate {
            current_user,
            site_host,
            base_url,
            flash_messages,
            has_flash_messages,
            view: &view,
            can_edit,
        },
    )
}

#[derive(Deserialize)]
pub struct VenueForm {
    pub latitude: String,
    pub longitude: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub tags: String,
}

fn edit_template(
    state: &AppState,
    jar: &CookieJar,
    is_new: bool,
    venue_id: String,
    form: &VenueForm,
    error: Option<String>,
) -> Response {
    let TemplateGlobals {
        current_user,
        site_host,
        base_url,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(state, jar);
    render_template(
        state,
        jar,
        VenueEditTemplate {
            current_user,
            site_host,
            base_url,
            flash_messages,
            has_flash_messages,
            is_new,
            venue_id,
            latitude: form.latitude.clone(),
            longitude: form.longitude.clone(),
            category: form.category.clone(),
            subcategory: form.subcategory.clone(),
            tags_text: form.tags.clone(),
            error,
        },
    )
}

fn apply_form(venue: &mut Venue, form: &VenueForm) -> Result<(), String> {
    let latitude: f64 = form
        .latitude
        .trim()
        .parse()
        .map_err(|_| "Latitude must be a number".to_string())?;
    let longitude: f64 = form
        .longitude
        .trim()
        .parse()
        .map_err(|_| "Longitude must be a number".to_string())?;
    if !valid_coordinates(latitude, longitude) {
        return Err("Coordinates are out of range".into());
    }
    venue.latitude = latitude;
    venue.longitude = longitude;
    venue.category = form.category.trim().to_lowercase();
    venue.subcategory = {
        let s = form.subcategory.trim().to_lowercase();
        if s.is_empty() {
            None
        } else {
            Some(s)
        }
    };
    venue.tags = parse_tag_lines(&form.tags);
    Ok(())
}

fn persist_or_flash(state: &AppState, jar: &CookieJar) {
    if let Err(e) = state.venues.persist() {
        tracing::error!(%e, "Failed to persist venues.json");
        push_flash(state, jar, "Warning: venue saved in memory but not written to disk");
    }
}

fn spawn_announce(state: &AppState, venue: &Venue) {
    if let Some(webhook) = state.announcer_webhook_url.clone() {
        let client = state.client.clone();
        let base_url = state.public_base_url.clone();
        let venue = venue.clone();
        tokio::spawn(async move {
            crate::api::announce_venue(&client, &webhook, &venue, &base_url).await;
        });
    }
}

pub async fn venue_new_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(r) = ensure_editor_or_owner(&state, &jar) {
        return r.into_response();
    }
    let empty = VenueForm {
        latitude: String::new(),
        longitude: String::new(),
        category: String::new(),
        subcategory: String::new(),
        tags: String::new(),
    };
    edit_template(&state, &jar, true, String::new(), &empty, None)
}

pub async fn venue_new_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> impl IntoResponse {
    if let Some(r) = ensure_editor_or_owner(&state, &jar) {
        return r.into_response();
    }
    let mut venue = Venue::new(allocate_venue_id(&state.venues), 0.0, 0.0);
    if let Err(msg) = apply_form(&mut venue, &form) {
        return edit_template(&state, &jar, true, String::new(), &form, Some(msg));
    }
    let id = venue.id.clone();
    state.venues.upsert(venue.clone());
    persist_or_flash(&state, &jar);
    spawn_announce(&state, &venue);
    push_flash(&state, &jar, "Venue created");
    Redirect::to(&format!("/venue/{}", id)).into_response()
}

pub async fn venue_edit_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if let Some(r) = ensure_editor_or_owner(&state, &jar) {
        return r.into_response();
    }
    let venue = match state.venues.get(&id) {
        Some(v) => v,
        None => return not_found("Venue not found"),
    };
    let form = VenueForm {
        latitude: venue.latitude.to_string(),
        longitude: venue.longitude.to_string(),
        category: venue.category.clone(),
        subcategory: venue.subcategory.clone().unwrap_or_default(),
        tags: tag_lines(&venue),
    };
    edit_template(&state, &jar, false, id, &form, None)
}

pub async fn venue_edit_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    Form(form): Form<VenueForm>,
) -> impl IntoResponse {
    if let Some(r) = ensure_editor_or_owner(&state, &jar) {
        return r.into_response();
    }
    let mut venue = match state.venues.get(&id) {
        Some(v) => v,
        None => return not_found("Venue not found"),
    };
    if let Err(msg) = apply_form(&mut venue, &form) {
        return edit_template(&state, &jar, false, id, &form, Some(msg));
    }
    state.venues.upsert(venue);
    persist_or_flash(&state, &jar);
    push_flash(&state, &jar, "Venue updated");
    Redirect::to(&format!("/venue/{}", id)).into_response()
}

pub async fn venue_delete_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if let Some(r) = ensure_editor_or_owner(&state, &jar) {
        return r.into_response();
    }
    match state.venues.remove(&id) {
        Some(_) => {
            persist_or_flash(&state, &jar);
            push_flash(&state, &jar, "Venue deleted");
        }
        None => push_flash(&state, &jar, "Venue not found"),
    }
    Redirect::to("/venues").into_response()
}

// --- JSON API ---

pub async fn api_venues_list(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let mut filter = filter_from_query(&query);
    filter.limit = parse_optional_int(query.get("limit"))
        .filter(|n| *n > 0)
        .map(|n| n as usize);
    // Editors see hidden venues by default; `hidden=0` gives them the public view.
    let editor = build_current_user(&state, &jar).map(|u| u.can_edit()).unwrap_or(false);
    let include_hidden = editor && parse_flag(query.get("hidden"), true);
    Json(visible_venues(&state, &filter, include_hidden))
}

pub async fn api_venue_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Response {
    let editor = build_current_user(&state, &jar).map(|u| u.can_edit()).unwrap_or(false);
    match state.venues.get(&id) {
        Some(v) if editor || !state.is_venue_hidden(&v.id) => Json(v).into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "venue not found"})),
        )
            .into_response(),
    }
}

fn bad_request(msg: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": msg})),
    )
        .into_response()
}

pub async fn api_venue_create(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut venue): Json<Venue>,
) -> Response {
    if let Err(resp) = require_api_editor(&state, &jar) {
        return resp;
    }
    if !valid_coordinates(venue.latitude, venue.longitude) {
        return bad_request("invalid coordinates");
    }
    if venue.id.trim().is_empty() {
        venue.id = allocate_venue_id(&state.venues);
    } else if state.venues.contains(&venue.id) {
        return bad_request("venue id already exists");
    }
    state.venues.upsert(venue.clone());
    if let Err(e) = state.venues.persist() {
        tracing::error!(%e, "Failed to persist venues.json");
    }
    spawn_announce(&state, &venue);
    (StatusCode::CREATED, Json(venue)).into_response()
}

pub async fn api_venue_update(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    Json(mut venue): Json<Venue>,
) -> Response {
    if let Err(resp) = require_api_editor(&state, &jar) {
        return resp;
    }
    if !state.venues.contains(&id) {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "venue not found"})),
        )
            .into_response();
    }
    if !valid_coordinates(venue.latitude, venue.longitude) {
        return bad_request("invalid coordinates");
    }
    // The path id is authoritative.
    venue.id = id;
    state.venues.upsert(venue.clone());
    if let Err(e) = state.venues.persist() {
        tracing::error!(%e, "Failed to persist venues.json");
    }
    Json(venue).into_response()
}

pub async fn api_venue_delete(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = require_api_editor(&state, &jar) {
        return resp;
    }
    match state.venues.remove(&id) {
        Some(v) => {
            if let Err(e) = state.venues.persist() {
                tracing::error!(%e, "Failed to persist venues.json");
            }
            Json(v).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "venue not found"})),
        )
            .into_response(),
    }
}
