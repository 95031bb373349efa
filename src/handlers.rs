use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::content::ContentStore;
use crate::dtos::{CreateCheckoutRequest, CreateCheckoutResponse};
use crate::error::{AppResult, ContentStoreError, PaymentError};
use crate::models::{CheckoutLineItem, Organization, OrganizationView, CHECKOUT_CURRENCY};
use crate::payments::{CheckoutProvider, CheckoutSessionParams, PaymentMethodType};

pub const GET_ORGS_PATH: &str = "/.netlify/functions/getOrgs";
pub const CREATE_CHECKOUT_PATH: &str = "/.netlify/functions/createCheckout";
pub const HELLO_PATH: &str = "/.netlify/functions/hello";

const HELLO_BODY: &str = "This function is totes working, Yay!";

#[derive(Clone)]
pub struct AppState {
    pub organizations: Arc<OrganizationListHandler>,
    pub checkout: Arc<CheckoutHandler>,
}

impl AppState {
    pub fn new(
        config: &Config,
        store: Arc<dyn ContentStore>,
        provider: Arc<dyn CheckoutProvider>,
    ) -> Self {
        Self {
            organizations: Arc::new(OrganizationListHandler::new(store)),
            checkout: Arc::new(CheckoutHandler::new(config, provider)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(GET_ORGS_PATH, get(get_orgs))
        .route(CREATE_CHECKOUT_PATH, post(create_checkout))
        .route(HELLO_PATH, get(hello))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Lists organizations from the content store as view models.
pub struct OrganizationListHandler {
    store: Arc<dyn ContentStore>,
}

impl OrganizationListHandler {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> Result<Vec<OrganizationView>, ContentStoreError> {
        let organizations = self.store.fetch_organizations().await?;
        let views = organizations
            .iter()
            .map(|org| project_organization(org, self.store.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = views.len(), organizations = ?views, "listed organizations");
        Ok(views)
    }
}

/// Flattens a stored organization, resolving its first image to a public URL.
pub fn project_organization(
    org: &Organization,
    store: &dyn ContentStore,
) -> Result<OrganizationView, ContentStoreError> {
    let image = org
        .first_image_ref()
        .map(|asset_ref| store.image_url(asset_ref))
        .transpose()?;

    Ok(OrganizationView {
        name: org.name.clone(),
        website: org.website.clone(),
        donation_amount: org.donation_amount.clone(),
        description: org.short_description.clone(),
        twitter: org.twitter.clone(),
        image,
    })
}

/// Opens a hosted checkout session for a single donation.
pub struct CheckoutHandler {
    provider: Arc<dyn CheckoutProvider>,
    success_url: String,
    cancel_url: String,
    publishable_key: String,
}

impl CheckoutHandler {
    pub fn new(config: &Config, provider: Arc<dyn CheckoutProvider>) -> Self {
        Self {
            provider,
            success_url: config.success_url(),
            cancel_url: config.cancel_url(),
            publishable_key: config.publishable_key.clone(),
        }
    }

    pub async fn handle(
        &self,
        request: &CreateCheckoutRequest,
    ) -> Result<CreateCheckoutResponse, PaymentError> {
        let params = CheckoutSessionParams {
            payment_method_types: vec![PaymentMethodType::Card],
            success_url: self.success_url.clone(),
            cancel_url: self.cancel_url.clone(),
            line_items: vec![build_line_item(request)],
        };

        let session_id = self.provider.create_session(&params).await?;

        Ok(CreateCheckoutResponse {
            session_id,
            publishable_key: self.publishable_key.clone(),
        })
    }
}

pub fn build_line_item(request: &CreateCheckoutRequest) -> CheckoutLineItem {
    CheckoutLineItem {
        name: request.name.clone(),
        currency: CHECKOUT_CURRENCY.to_string(),
        description: request.description.clone(),
        images: request.image.iter().cloned().collect(),
        amount: request.donation_amount.to_minor_units(),
        quantity: 1,
    }
}

async fn get_orgs(State(state): State<AppState>) -> AppResult<Json<Vec<OrganizationView>>> {
    Ok(Json(state.organizations.handle().await?))
}

async fn create_checkout(
    State(state): State<AppState>,
    Json(request): Json<CreateCheckoutRequest>,
) -> AppResult<Json<CreateCheckoutResponse>> {
    Ok(Json(state.checkout.handle(&request).await?))
}

async fn hello(method: Method, uri: Uri, headers: HeaderMap) -> &'static str {
    tracing::info!("Hello from the donation functions!");
    tracing::info!(%method, %uri, ?headers, "event info");
    HELLO_BODY
}
