use crate::models::Venue;

/// Post a newly created venue to the configured announcement webhook.
/// Failures are logged and swallowed; announcements must never block a create.
pub async fn announce_venue(client: &reqwest::Client, webhook_url: &str, venue: &Venue, base_url: &str) {
    let payload = serde_json::json!({
        "id": venue.id,
        "name": venue.name(),
        "category": venue.category_or_tag(),
        "latitude": venue.latitude,
        "longitude": venue.longitude,
        "url": crate::utils::absolute_url(base_url, &format!("/venue/{}", venue.id)),
    });
    match client.post(webhook_url).json(&payload).send().await {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!(venue = %venue.id, "Announced new venue");
        }
        Ok(resp) => {
            tracing::warn!(venue = %venue.id, status = %resp.status(), "Announcement webhook rejected the payload");
        }
        Err(e) => {
            tracing::warn!(venue = %venue.id, %e, "Announcement webhook unreachable");
        }
    }
}
