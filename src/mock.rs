//! In-memory collaborators for exercising the handlers without network access.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::content::{ContentStore, ImageUrlBuilder};
use crate::error::{ContentStoreError, PaymentError};
use crate::models::Organization;
use crate::payments::{CheckoutProvider, CheckoutSessionParams};

/// Content store that serves a fixed list of organizations.
pub struct MockContentStore {
    organizations: Vec<Organization>,
    images: ImageUrlBuilder,
    fail_with_status: Option<u16>,
}

impl MockContentStore {
    /// Serves `organizations` sorted by name, the way the list query orders them.
    pub fn new(mut organizations: Vec<Organization>) -> Self {
        organizations.sort_by(|a, b| a.name.cmp(&b.name));
        Self::in_order(organizations)
    }

    /// Serves `organizations` exactly in the order given.
    pub fn in_order(organizations: Vec<Organization>) -> Self {
        Self {
            organizations,
            images: ImageUrlBuilder::new("mock-project", "mock-dataset"),
            fail_with_status: None,
        }
    }

    /// Every query fails with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Self::new(Vec::new())
        }
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    async fn fetch_organizations(&self) -> Result<Vec<Organization>, ContentStoreError> {
        if let Some(status) = self.fail_with_status {
            return Err(ContentStoreError::Status {
                status,
                body: "mock failure".to_string(),
            });
        }
        Ok(self.organizations.clone())
    }

    fn image_url(&self, asset_ref: &str) -> Result<String, ContentStoreError> {
        self.images.url(asset_ref)
    }
}

/// Checkout provider that records every session request.
#[derive(Clone, Default)]
pub struct MockCheckoutProvider {
    captured: Arc<Mutex<Vec<CheckoutSessionParams>>>,
    error: Arc<Mutex<Option<PaymentError>>>,
}

impl MockCheckoutProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next call fails with `error`.
    pub async fn fail_next(&self, error: PaymentError) {
        *self.error.lock().await = Some(error);
    }

    pub async fn captured(&self) -> Vec<CheckoutSessionParams> {
        self.captured.lock().await.clone()
    }
}

#[async_trait]
impl CheckoutProvider for MockCheckoutProvider {
    async fn create_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<String, PaymentError> {
        if let Some(err) = self.error.lock().await.take() {
            return Err(err);
        }
        let mut captured = self.captured.lock().await;
        captured.push(params.clone());
        Ok(format!("cs_test_{}", captured.len()))
    }
}
