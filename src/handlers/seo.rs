use axum::{
    extract::{Path, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::models::{AppState, VenueRow};
use crate::services::{build_sitemap, region_title, venues_for_region};
use crate::templates::RegionPageTemplate;

use super::helpers::{
    absolute_url_from_state, build_template_globals, not_found, render_template, TemplateGlobals,
};

/// `GET /d/:slug`: SEO region page resolved through the slugs cache.
pub async fn region_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(slug): Path<String>,
) -> Response {
    let canonical = crate::utils::slugify(&slug);
    let query = match state.geo.slugs.resolve(&canonical) {
        Some(q) => q,
        None => return not_found("Unknown page"),
    };
    let rows: Vec<VenueRow> = venues_for_region(&state.venues, &query)
        .iter()
        .filter(|v| !state.is_venue_hidden(&v.id))
        .map(|v| VenueRow::from_venue(v))
        .collect();
    let title = region_title(&query, &canonical);

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
        RegionPageTemplate {
            current_user,
            site_host,
            base_url,
            flash_messages,
            has_flash_messages,
            title,
            slug: canonical,
            rows: &rows,
        },
    )
}

pub async fn sitemap_xml(State(state): State<AppState>) -> impl IntoResponse {
    let venues: Vec<_> = state
        .venues
        .all()
        .into_iter()
        .filter(|v| !state.is_venue_hidden(&v.id))
        .collect();
    let xml = build_sitemap(&state.public_base_url, &venues, &state.geo.slugs);
    ([(CONTENT_TYPE, "application/xml")], xml)
}

pub async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    let sitemap = absolute_url_from_state(&state, "/sitemap.xml");
    format!("User-agent: *\nAllow: /\nSitemap: {}\n", sitemap)
}
