//! Read access to the headless content store.

use async_trait::async_trait;
use reqwest::Client;

use crate::config::Config;
use crate::error::ContentStoreError;
use crate::models::Organization;
use crate::schema::organization_list_query;

const IMAGE_CDN: &str = "https://cdn.sanity.io/images";

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// All organization documents, ordered by name.
    async fn fetch_organizations(&self) -> Result<Vec<Organization>, ContentStoreError>;

    /// Public URL for an image asset reference.
    fn image_url(&self, asset_ref: &str) -> Result<String, ContentStoreError>;
}

/// Turns `image-<id>-<w>x<h>-<format>` asset references into CDN URLs.
#[derive(Clone, Debug)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    pub fn url(&self, asset_ref: &str) -> Result<String, ContentStoreError> {
        let invalid = || ContentStoreError::InvalidImageRef(asset_ref.to_string());

        let rest = asset_ref.strip_prefix("image-").ok_or_else(invalid)?;
        let mut parts = rest.rsplitn(3, '-');
        let format = parts.next().ok_or_else(invalid)?;
        let dimensions = parts.next().ok_or_else(invalid)?;
        let id = parts.next().ok_or_else(invalid)?;

        let valid_dimensions = dimensions
            .split_once('x')
            .map(|(w, h)| is_digits(w) && is_digits(h))
            .unwrap_or(false);
        if id.is_empty() || format.is_empty() || !valid_dimensions {
            return Err(invalid());
        }

        Ok(format!(
            "{}/{}/{}/{}-{}.{}",
            IMAGE_CDN, self.project_id, self.dataset, id, dimensions, format
        ))
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[derive(serde::Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// HTTP client for the Sanity query API.
#[derive(Clone)]
pub struct SanityClient {
    client: Client,
    query_url: String,
    images: ImageUrlBuilder,
}

impl SanityClient {
    pub fn new(config: &Config) -> Self {
        let host = match &config.sanity_api_host {
            Some(host) => host.trim_end_matches('/').to_string(),
            None => format!(
                "https://{}.{}.sanity.io",
                config.sanity_project_id,
                if config.sanity_use_cdn { "apicdn" } else { "api" }
            ),
        };

        Self {
            client: Client::new(),
            query_url: format!(
                "{}/{}/data/query/{}",
                host, config.sanity_api_version, config.sanity_dataset
            ),
            images: ImageUrlBuilder::new(&config.sanity_project_id, &config.sanity_dataset),
        }
    }

    pub fn query_url(&self) -> &str {
        &self.query_url
    }
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn fetch_organizations(&self) -> Result<Vec<Organization>, ContentStoreError> {
        let query = organization_list_query();
        tracing::debug!("querying {}: {}", self.query_url, query);

        let response = self
            .client
            .get(&self.query_url)
            .query(&[("query", query.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ContentStoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: QueryResponse<Vec<Organization>> = serde_json::from_str(&body)?;
        Ok(parsed.result)
    }

    fn image_url(&self, asset_ref: &str) -> Result<String, ContentStoreError> {
        self.images.url(asset_ref)
    }
}
