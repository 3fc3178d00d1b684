use serde::de::DeserializeOwned;

use crate::{
    error::{Error, Result},
    utils,
};

use super::SpotifyClient;

impl SpotifyClient {
    /// Performs an authorized GET against the Web API.
    ///
    /// `endpoint` is appended to the configured API base, e.g. `/me` or
    /// `/me/top/artists?limit=5`. The body is decoded into `T`; use
    /// `serde_json::Value` to get it back unchanged.
    ///
    /// # Errors
    ///
    /// - Non-success status: [`Error::Api`] classified by status code, with
    ///   the status text as message (`Spotify API error: Unauthorized`)
    /// - No response at all: [`Error::Api`] with
    ///   [`ApiErrorKind::NetworkFailure`](crate::error::ApiErrorKind::NetworkFailure)
    /// - A success body that does not decode into `T`: [`Error::Http`]
    pub async fn spotify_api<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        access_token: &str,
    ) -> Result<T> {
        let url = utils::join_endpoint(&self.config().api_url, endpoint);

        let res = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(Error::network)?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(endpoint, status = status.as_u16(), "Spotify API call failed");
            return Err(Error::api_status(status));
        }

        res.json::<T>().await.map_err(|e| {
            tracing::warn!(endpoint, error = %e, "unexpected Spotify API response body");
            Error::Http(e)
        })
    }
}
