use crate::{
    error::Result,
    types::{
        Artist, AudioFeatures, AudioFeaturesResponse, Paging, RecentlyPlayed, SearchResults,
        TimeRange, Track, UserProfile,
    },
    utils,
};

use super::SpotifyClient;

impl SpotifyClient {
    /// `GET /me` - the current user's profile.
    pub async fn get_profile(&self, token: &str) -> Result<UserProfile> {
        self.spotify_api("/me", token).await
    }

    /// Retrieves the user's most listened artists.
    ///
    /// # Arguments
    ///
    /// * `token` - Valid access token with the `user-top-read` scope
    /// * `range` - Period the ranking is computed over
    /// * `limit` - Number of artists (1-50)
    pub async fn get_top_artists(
        &self,
        token: &str,
        range: TimeRange,
        limit: u32,
    ) -> Result<Paging<Artist>> {
        let endpoint = format!(
            "/me/top/artists?limit={limit}&time_range={range}",
            limit = limit.clamp(1, 50),
            range = range
        );
        self.spotify_api(&endpoint, token).await
    }

    /// Retrieves the user's most listened tracks. Same arguments as
    /// [`get_top_artists`](Self::get_top_artists).
    pub async fn get_top_tracks(
        &self,
        token: &str,
        range: TimeRange,
        limit: u32,
    ) -> Result<Paging<Track>> {
        let endpoint = format!(
            "/me/top/tracks?limit={limit}&time_range={range}",
            limit = limit.clamp(1, 50),
            range = range
        );
        self.spotify_api(&endpoint, token).await
    }

    /// Retrieves the most recently played tracks (at most 50, newest first).
    pub async fn get_recently_played(&self, token: &str, limit: u32) -> Result<RecentlyPlayed> {
        let endpoint = format!(
            "/me/player/recently-played?limit={limit}",
            limit = limit.clamp(1, 50)
        );
        self.spotify_api(&endpoint, token).await
    }

    /// Retrieves audio features for up to 100 tracks.
    ///
    /// Tracks Spotify has no analysis for are left out of the result. An
    /// empty id list returns an empty result without calling the API.
    pub async fn get_audio_features(
        &self,
        token: &str,
        ids: &[&str],
    ) -> Result<Vec<AudioFeatures>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let endpoint = format!(
            "/audio-features?ids={ids}",
            ids = utils::join_ids(ids.iter().copied())
        );
        let res: AudioFeaturesResponse = self.spotify_api(&endpoint, token).await?;

        Ok(res.audio_features.into_iter().flatten().collect())
    }

    /// Searches tracks, artists and albums (20 results per type).
    pub async fn search(&self, token: &str, query: &str) -> Result<SearchResults> {
        let endpoint = format!(
            "/search?q={q}&type=track,artist,album&limit=20",
            q = url::form_urlencoded::byte_serialize(query.as_bytes()).collect::<String>()
        );
        self.spotify_api(&endpoint, token).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use super::*;
    use crate::config::Config;

    async fn setup() -> (MockServer, SpotifyClient) {
        let server = MockServer::start().await;
        let config = Config::new("id", "secret").with_api_url(format!("{}/v1", server.uri()));
        (server, SpotifyClient::new(Arc::new(config)))
    }

    #[tokio::test]
    async fn top_artists_sends_range_and_limit() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/v1/me/top/artists"))
            .and(query_param("limit", "5"))
            .and(query_param("time_range", "short_term"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": "a1", "name": "Artist One", "genres": ["indie"]}],
                "total": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client
            .get_top_artists("t", TimeRange::ShortTerm, 5)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Artist One");
        assert!(page.items[0].images.is_empty());
    }

    #[tokio::test]
    async fn limit_is_clamped_to_api_maximum() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/v1/me/player/recently-played"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .expect(1)
            .mount(&server)
            .await;

        let recent = client.get_recently_played("t", 500).await.unwrap();
        assert!(recent.items.is_empty());
    }

    #[tokio::test]
    async fn search_encodes_query() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("q", "daft punk & friends"))
            .and(query_param("type", "track,artist,album"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {"items": [{"id": "t1", "name": "One More Time"}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = client.search("t", "daft punk & friends").await.unwrap();
        assert_eq!(results.tracks.items[0].name, "One More Time");
        assert!(results.artists.items.is_empty());
    }

    #[tokio::test]
    async fn audio_features_skip_missing_entries() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/v1/audio-features"))
            .and(query_param("ids", "t1,t2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "audio_features": [{"id": "t1", "energy": 0.8}, null]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let features = client.get_audio_features("t", &["t1", "t2"]).await.unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].id, "t1");
    }

    #[tokio::test]
    async fn audio_features_without_ids_skip_the_call() {
        let (_server, client) = setup().await;
        // no mock mounted: any request would fail with 404
        let features = client.get_audio_features("t", &[]).await.unwrap();
        assert!(features.is_empty());
    }
}
