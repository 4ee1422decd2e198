//! Google Cloud Storage backend over the JSON API.
//!
//! - Download: `GET {endpoint}/storage/v1/b/{bucket}/o/{object}?alt=media`
//! - Upload:   `POST {endpoint}/upload/storage/v1/b/{bucket}/o?uploadType=media&name={object}`
//!
//! GCS answers 404 for a missing bucket as well as a missing object. A 404
//! on download is followed by `GET {endpoint}/storage/v1/b/{bucket}`, and only
//! a bucket that exists turns the miss into `DocumentNotFound`.
//!
//! Authentication is a bearer token (for example the output of
//! `gcloud auth print-access-token`). Without a token requests are sent
//! unauthenticated, which is what local emulators expect.

use async_trait::async_trait;
use qbank_core::blob::{BlobBackend, DocumentLocation};
use qbank_core::error::StoreError;
use reqwest::{RequestBuilder, Response, Url};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";

/// A Google Cloud Storage blob backend.
pub struct GcsBackend {
    endpoint: String,
    access_token: Option<String>,
    client: reqwest::Client,
}

impl GcsBackend {
    /// Create a backend talking to `endpoint` (see [`DEFAULT_ENDPOINT`]).
    pub fn new(
        endpoint: impl Into<String>,
        access_token: Option<String>,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| StoreError::BackendUnavailable(format!("HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            access_token,
            client,
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| StoreError::BackendUnavailable(format!("invalid GCS endpoint: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::BackendUnavailable("GCS endpoint cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn download_url(&self, location: &DocumentLocation) -> Result<Url, StoreError> {
        let mut url = self.url(&["storage", "v1", "b", &location.bucket, "o", &location.key])?;
        url.query_pairs_mut().append_pair("alt", "media");
        Ok(url)
    }

    fn bucket_url(&self, bucket: &str) -> Result<Url, StoreError> {
        self.url(&["storage", "v1", "b", bucket])
    }

    fn upload_url(&self, location: &DocumentLocation) -> Result<Url, StoreError> {
        let mut url = self.url(&["upload", "storage", "v1", "b", &location.bucket, "o"])?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", &location.key);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Tell a missing object apart from a missing bucket after a 404.
    async fn missing_document(&self, location: &DocumentLocation) -> StoreError {
        let not_found = StoreError::DocumentNotFound {
            bucket: location.bucket.clone(),
            key: location.key.clone(),
        };
        let url = match self.bucket_url(&location.bucket) {
            Ok(url) => url,
            Err(e) => return e,
        };
        let status = match self.authorize(self.client.get(url)).send().await {
            Ok(response) => response.status().as_u16(),
            Err(e) => return StoreError::BackendUnavailable(e.to_string()),
        };
        match status {
            404 => {
                warn!(bucket = %location.bucket, "GCS bucket does not exist");
                StoreError::BackendUnavailable(format!(
                    "GCS bucket '{}' does not exist",
                    location.bucket
                ))
            }
            200..=299 => not_found,
            // Token may lack bucket metadata access; the object miss stands
            _ => {
                debug!(status, bucket = %location.bucket, "Bucket check inconclusive");
                not_found
            }
        }
    }

    /// Map a non-success response to a store error.
    async fn status_error(response: Response, location: &DocumentLocation) -> StoreError {
        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            return StoreError::BackendUnavailable(format!(
                "GCS rejected credentials for {location} (status {status})"
            ));
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status, body = %body, %location, "GCS returned error");
        StoreError::BackendUnavailable(format!("GCS request for {location} failed ({status}): {body}"))
    }
}

#[async_trait]
impl BlobBackend for GcsBackend {
    fn name(&self) -> &str {
        "gcs"
    }

    async fn get_document(&self, location: &DocumentLocation) -> Result<Vec<u8>, StoreError> {
        let url = self.download_url(location)?;
        debug!(%location, "Downloading corpus from GCS");

        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| StoreError::BackendUnavailable(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Err(self.missing_document(location).await);
        }
        if !response.status().is_success() {
            return Err(Self::status_error(response, location).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StoreError::BackendUnavailable(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn put_document(
        &self,
        location: &DocumentLocation,
        bytes: Vec<u8>,
    ) -> Result<(), StoreError> {
        let url = self.upload_url(location)?;
        debug!(%location, bytes = bytes.len(), "Uploading corpus to GCS");

        let response = self
            .authorize(self.client.post(url))
            .header("Content-Type", "application/json")
            .body(bytes)
            .send()
            .await
            .map_err(|e| StoreError::BackendUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response, location).await);
        }
        Ok(())
    }
}
