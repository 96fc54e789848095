use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashMap;

use crate::geo::valid_coordinates;
use crate::models::AppState;

/// `GET /api/nearest?lat=..&lng=..`: nearest city to a coordinate pair.
pub async fn api_nearest(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let lat = query.get("lat").and_then(|v| v.trim().parse::<f64>().ok());
    let lng = query.get("lng").and_then(|v| v.trim().parse::<f64>().ok());
    let (lat, lng) = match (lat, lng) {
        (Some(lat), Some(lng)) if valid_coordinates(lat, lng) => (lat, lng),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "lat and lng must be valid coordinates"})),
            )
                .into_response();
        }
    };
    match state.geo.nearest_city_resolved(lat, lng) {
        Some(city) => Json(city).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "no cities loaded"})),
        )
            .into_response(),
    }
}
