use crate::error::ArtForgeError;
use crate::models::{DataTable, GeneratedArt, GenerateReply, GenerateRequest, LoadReply, Row};
use log::debug;
use std::path::Path;
use time::OffsetDateTime;

const USER_AGENT: &str = "artforge-core/0.1";
const ACCEPT: &str = "*/*";

/// Fixed filename served by the backend's download endpoint.
pub const DOWNLOAD_FILENAME: &str = "generated_art.png";

pub const DEFAULT_SERVER: &str = "http://localhost:5000";

/// Thin client for the backend HTTP contract. No retries and no client-side
/// timeout: a failed call surfaces once and the caller decides what to show.
#[derive(Debug, Clone)]
pub struct ForgeClient {
    client: reqwest::Client,
    base_url: String,
}

impl ForgeClient {
    pub fn new(base_url: &str) -> Result<Self, ArtForgeError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(ForgeClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/load-data`: the initial dataset and column order.
    pub async fn load_data(&self) -> Result<DataTable, ArtForgeError> {
        let uri = format!("{}/api/load-data", self.base_url);
        debug!("loading data from {}", uri);
        let reply: LoadReply = self.client.get(&uri).send().await?.json().await?;
        reply.into_table()
    }

    /// `POST /api/generate-art` with the collected rows as payload.
    pub async fn generate_art(&self, rows: Vec<Row>) -> Result<GeneratedArt, ArtForgeError> {
        let uri = format!("{}/api/generate-art", self.base_url);
        debug!("generating art from {} rows via {}", rows.len(), uri);
        let reply: GenerateReply = self
            .client
            .post(&uri)
            .json(&GenerateRequest { data: rows })
            .send()
            .await?
            .json()
            .await?;
        reply.into_art()
    }

    /// Fetch the generated image for display. The url comes from the
    /// generate reply and may be server-relative; a cache-busting timestamp
    /// is appended so an overwritten file is never served stale.
    pub async fn fetch_image(&self, image_url: &str) -> Result<Vec<u8>, ArtForgeError> {
        let t = OffsetDateTime::now_utc().unix_timestamp();
        let uri = busting_url(&self.base_url, image_url, t);
        debug!("fetching image {}", uri);
        let bytes = self.client.get(&uri).send().await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// `GET /api/download-image/generated_art.png`, saved to `dest`. The
    /// backend owns the question of whether anything has been generated yet.
    pub async fn download_image(&self, dest: &Path) -> Result<(), ArtForgeError> {
        let uri = format!("{}/api/download-image/{}", self.base_url, DOWNLOAD_FILENAME);
        debug!("downloading image {} to {}", uri, dest.display());
        let bytes = self.client.get(&uri).send().await?.bytes().await?;
        std::fs::write(dest, &bytes)?;
        Ok(())
    }
}

/// Resolve `image_url` against `base` if it is server-relative and append a
/// cache-busting `t=` parameter.
pub fn busting_url(base: &str, image_url: &str, t: i64) -> String {
    let absolute = if image_url.starts_with("http://") || image_url.starts_with("https://") {
        image_url.to_string()
    } else {
        format!("{}/{}", base, image_url.trim_start_matches('/'))
    };
    if absolute.contains('?') {
        format!("{}&t={}", absolute, t)
    } else {
        format!("{}?t={}", absolute, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busting_relative_url() {
        assert_eq!(
            busting_url("http://localhost:5000", "/api/get-image/generated_art.png", 42),
            "http://localhost:5000/api/get-image/generated_art.png?t=42"
        );
    }

    #[test]
    fn busting_absolute_url() {
        assert_eq!(
            busting_url("http://localhost:5000", "http://art.example/img.png", 7),
            "http://art.example/img.png?t=7"
        );
    }

    #[test]
    fn busting_url_with_existing_query() {
        assert_eq!(
            busting_url("http://localhost:5000", "/img.png?v=2", 7),
            "http://localhost:5000/img.png?v=2&t=7"
        );
    }

    #[test]
    fn client_strips_trailing_slash() {
        let client = ForgeClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }
}
