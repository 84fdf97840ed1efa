use serde::de::DeserializeOwned;

use crate::{Client, ClientError, ClientResult};

/// Making requests to the API.
impl Client {
    /// Make a request to an `/api/v1/` endpoint and deserialize the JSON
    /// response into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not valid.
    pub async fn request<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<T> {
        let url = format!("{}/api/v1/{endpoint}", self.base_url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                message: extract_error_message(&bytes),
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fetch raw bytes from an arbitrary URL. Relative URLs are resolved
    /// against the instance base URL; thumbnail URLs come back from the API
    /// in both forms.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server responds with a
    /// non-success status.
    pub async fn fetch_bytes(&self, url: &str) -> ClientResult<Vec<u8>> {
        let url = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{url}", self.base_url)
        } else {
            format!("{}/{url}", self.base_url)
        };

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                message: extract_error_message(&bytes),
            });
        }
        Ok(bytes.into())
    }
}

/// Error responses carry a JSON body of the form `{"error": "..."}`; anything
/// else is left unreported.
fn extract_error_message(bytes: &[u8]) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: String,
    }
    serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .map(|b| b.error)
}
