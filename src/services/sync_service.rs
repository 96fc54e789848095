use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use thiserror::Error;

use crate::geo::MergeStats;
use crate::models::{AppState, Venue};

/// Errors from the remote-sync and enrichment pipeline
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Sync API is not configured (set SYNC_API_BASE_URL)")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote API returned HTTP {0}")]
    Status(u16),

    #[error("Failed to parse remote payload: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnrichStats {
    pub scanned: usize,
    pub enriched: usize,
}

/// Fetch venue updates from the remote directory API and merge them into the
/// local store by id. The payload is streamed to a temp file with a progress
/// bar before parsing so large exports do not sit in memory twice.
pub async fn sync_venues(
    state: &AppState,
    since: Option<DateTime<Utc>>,
) -> Result<MergeStats, SyncError> {
    if state.sync_api_base_url.is_empty() {
        return Err(SyncError::NotConfigured);
    }
    let mut url = format!("{}/v1/venues", state.sync_api_base_url);
    if let Some(since) = since {
        url = format!("{}?updated_since={}", url, since.to_rfc3339());
    }
    tracing::info!(%url, "Syncing venues from remote");

    let mut req = state.client.get(&url);
    if !state.sync_api_token.is_empty() {
        req = req.header("Authorization", format!("Bearer {}", state.sync_api_token));
    }
    let response = req
        .send()
        .await
        .map_err(|e| SyncError::Network(e.to_string()))?;
    if !response.status().is_success() {
        return Err(SyncError::Status(response.status().as_u16()));
    }

    let total_size = response.content_length();
    let pb = if let Some(size) = total_size {
        let pb = ProgressBar::new(size);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .map_err(|e| SyncError::Parse(format!("Failed to set progress style: {}", e)))?
                .progress_chars("#>-"),
        );
        pb
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} Downloaded {bytes}")
                .map_err(|e| SyncError::Parse(format!("Failed to set progress style: {}", e)))?,
        );
        pb
    };

    let mut tmp = tempfile::NamedTempFile::new()?;
    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| SyncError::Network(e.to_string()))?;
        tmp.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }
    pb.finish_and_clear();

    let text = std::fs::read_to_string(tmp.path())?;
    let incoming = parse_venue_payload(&text)?;
    tracing::info!(count = incoming.len(), "Fetched remote venues");

    let stats = state.venues.merge(incoming);
    state.venues.persist()?;
    tracing::info!(created = stats.created, updated = stats.updated, "Venue sync complete");
    Ok(stats)
}

/// Parse a local venue export, for `waypost venues import`.
pub fn parse_venue_payload_file(path: &str) -> Result<Vec<Venue>, SyncError> {
    let text = std::fs::read_to_string(path)?;
    parse_venue_payload(&text)
}

/// The remote export is either a bare venue array or `{"data": [...]}`.
/// Entries that fail to deserialize are skipped, matching the loaders.
pub fn parse_venue_payload(text: &str) -> Result<Vec<Venue>, SyncError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| SyncError::Parse(e.to_string()))?;
    let entries = match &value {
        serde_json::Value::Array(a) => a.clone(),
        serde_json::Value::Object(o) => o
            .get("data")
            .and_then(|d| d.as_array())
            .cloned()
            .ok_or_else(|| SyncError::Parse("expected an array or a data array".into()))?,
        _ => return Err(SyncError::Parse("expected an array or a data array".into())),
    };
    let mut venues = Vec::with_capacity(entries.len());
    let mut skipped = 0usize;
    for entry in entries {
        match serde_json::from_value::<Venue>(entry) {
            Ok(v) if !v.id.is_empty() && crate::geo::valid_coordinates(v.latitude, v.longitude) => {
                venues.push(v)
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, "Skipped malformed remote venue entries");
    }
    Ok(venues)
}

/// Reverse-geocode venues that have no address yet: nearest city fills
/// `addr:city` / `addr:state` / `addr:country`, and the record is stamped.
pub fn enrich_venues(state: &AppState) -> Result<EnrichStats, SyncError> {
    let mut stats = EnrichStats::default();
    for mut venue in state.venues.all() {
        stats.scanned += 1;
        if venue.has_address() {
            continue;
        }
        let Some(city) = state.geo.nearest_city(venue.latitude, venue.longitude) else {
            continue;
        };
        venue.tags.insert("addr:city".into(), city.name.clone());
        if let Some(name) = state.geo.admin1.name_for(&city.country, &city.admin1) {
            venue.tags.insert("addr:state".into(), name);
        }
        venue.tags.insert("addr:country".into(), city.country.clone());
        venue.enriched_at = Some(Utc::now());
        state.venues.upsert(venue);
        stats.enriched += 1;
    }
    if stats.enriched > 0 {
        state.venues.persist()?;
    }
    tracing::info!(scanned = stats.scanned, enriched = stats.enriched, "Enrichment pass complete");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array_payload() {
        let venues = parse_venue_payload(
            r#"[{"id":"a","latitude":1.0,"longitude":2.0},{"id":"","latitude":0,"longitude":0}]"#,
        )
        .unwrap();
        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].id, "a");
    }

    #[test]
    fn parses_enveloped_payload() {
        let venues = parse_venue_payload(
            r#"{"data":[{"id":"b","latitude":-10.5,"longitude":30.25,"category":"cafe"}]}"#,
        )
        .unwrap();
        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].category, "cafe");
    }

    #[test]
    fn rejects_non_array_payload() {
        assert!(parse_venue_payload("42").is_err());
        assert!(parse_venue_payload(r#"{"items":[]}"#).is_err());
    }

    #[test]
    fn skips_entries_with_invalid_coordinates() {
        let venues = parse_venue_payload(
            r#"[{"id":"a","latitude":91.0,"longitude":0.0},{"id":"b","latitude":0.0,"longitude":0.0}]"#,
        )
        .unwrap();
        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].id, "b");
    }
}
