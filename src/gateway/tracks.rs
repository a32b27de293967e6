//! Track catalog operations.

use tracing::{debug, info};

use crate::error::Result;
use crate::library::{Track, TrackId};

use super::client::{ApiClient, expect_json, expect_success};

/// CRUD access to `/tracks`.
///
/// Every call is one request/response round trip: no retry, batching or
/// caching.
#[derive(Debug, Clone)]
pub struct RemoteTrackGateway {
    api: ApiClient,
}

impl RemoteTrackGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /tracks`
    pub async fn list_tracks(&self) -> Result<Vec<Track>> {
        let url = self.api.url("tracks");
        debug!(url = %url, "Fetching all tracks");

        let response = self.api.http().get(&url).send().await?;
        let tracks: Vec<Track> = expect_json(response, "track list").await?;
        debug!(count = tracks.len(), "Fetched tracks");
        Ok(tracks)
    }

    /// `GET /tracks/search?title=...`
    pub async fn search_tracks(&self, title: &str) -> Result<Vec<Track>> {
        let url = self.api.url("tracks/search");
        debug!(url = %url, title = %title, "Searching tracks");

        let response = self
            .api
            .http()
            .get(&url)
            .query(&[("title", title)])
            .send()
            .await?;
        expect_json(response, "search results").await
    }

    /// `GET /tracks/{id}`
    pub async fn get_track(&self, id: TrackId) -> Result<Track> {
        let url = self.api.url(&format!("tracks/{id}"));
        debug!(url = %url, "Fetching track");

        let response = self.api.http().get(&url).send().await?;
        expect_json(response, "track").await
    }

    /// `POST /tracks`; returns the stored track carrying the server's id.
    pub async fn create_track(&self, track: &Track) -> Result<Track> {
        let url = self.api.url("tracks");
        debug!(url = %url, title = %track.title, "Creating track");

        let response = self.api.http().post(&url).json(track).send().await?;
        let created: Track = expect_json(response, "created track").await?;
        info!(id = created.id, title = %created.title, "Track created");
        Ok(created)
    }

    /// `PUT /tracks/{id}` with the full track object.
    pub async fn update_track(&self, id: TrackId, track: &Track) -> Result<()> {
        let url = self.api.url(&format!("tracks/{id}"));
        debug!(url = %url, "Updating track");

        let response = self.api.http().put(&url).json(track).send().await?;
        expect_success(response).await
    }

    /// `DELETE /tracks/{id}`
    pub async fn delete_track(&self, id: TrackId) -> Result<()> {
        let url = self.api.url(&format!("tracks/{id}"));
        debug!(url = %url, "Deleting track");

        let response = self.api.http().delete(&url).send().await?;
        expect_success(response).await?;
        info!(id, "Track deleted");
        Ok(())
    }

    /// Download raw audio. Relative locations are resolved against the server.
    pub async fn fetch_audio(&self, location: &str) -> Result<Vec<u8>> {
        let url = if crate::library::is_http_url(location) {
            location.trim().to_string()
        } else {
            self.api.url(location)
        };
        debug!(url = %url, "Fetching audio");

        let response = self.api.http().get(&url).send().await?;
        if !response.status().is_success() {
            return Err(super::client::server_error(response).await);
        }
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
