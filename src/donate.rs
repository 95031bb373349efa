//! Browser-side donation flow.
//!
//! The donate page loads the organization list once, then each donate action
//! asks the checkout function for a session and hands the visitor over to the
//! provider's hosted checkout page.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

use crate::dtos::CreateCheckoutResponse;
use crate::error::{FlowError, NetworkError};
use crate::handlers::{CREATE_CHECKOUT_PATH, GET_ORGS_PATH};
use crate::models::OrganizationView;

const HOSTED_CHECKOUT_URL: &str = "https://checkout.stripe.com/pay";

#[async_trait]
pub trait OrganizationListService: Send + Sync {
    async fn fetch_organization_list(&self) -> Result<Vec<OrganizationView>, NetworkError>;
}

#[async_trait]
pub trait CheckoutService: Send + Sync {
    async fn create_checkout(
        &self,
        organization: &OrganizationView,
    ) -> Result<CreateCheckoutResponse, NetworkError>;
}

/// Calls the deployed functions over HTTP.
#[derive(Clone)]
pub struct FunctionsClient {
    http: Client,
    base_url: String,
}

impl FunctionsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn check_status(url: &str, response: &reqwest::Response) -> Result<(), NetworkError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(NetworkError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl OrganizationListService for FunctionsClient {
    async fn fetch_organization_list(&self) -> Result<Vec<OrganizationView>, NetworkError> {
        let url = self.url(GET_ORGS_PATH);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        check_status(&url, &response)?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl CheckoutService for FunctionsClient {
    async fn create_checkout(
        &self,
        organization: &OrganizationView,
    ) -> Result<CreateCheckoutResponse, NetworkError> {
        let url = self.url(CREATE_CHECKOUT_PATH);
        let response = self.http.post(&url).json(organization).send().await?;
        check_status(&url, &response)?;
        Ok(response.json().await?)
    }
}

/// Where the browser goes once a checkout session exists.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRedirect {
    pub session_id: String,
    pub publishable_key: String,
}

impl CheckoutRedirect {
    pub fn url(&self) -> String {
        format!("{}/{}", HOSTED_CHECKOUT_URL, self.session_id)
    }
}

impl From<CreateCheckoutResponse> for CheckoutRedirect {
    fn from(response: CreateCheckoutResponse) -> Self {
        Self {
            session_id: response.session_id,
            publishable_key: response.publishable_key,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DonateState {
    Idle,
    Listed(Vec<OrganizationView>),
    CheckoutPending {
        organizations: Vec<OrganizationView>,
        organization: OrganizationView,
        redirect: Option<CheckoutRedirect>,
    },
}

impl DonateState {
    fn label(&self) -> &'static str {
        match self {
            DonateState::Idle => "idle",
            DonateState::Listed(_) => "listed",
            DonateState::CheckoutPending { .. } => "checkout-pending",
        }
    }
}

pub struct DonatePage {
    list_service: Arc<dyn OrganizationListService>,
    checkout_service: Arc<dyn CheckoutService>,
    state: DonateState,
}

impl DonatePage {
    pub fn new(
        list_service: Arc<dyn OrganizationListService>,
        checkout_service: Arc<dyn CheckoutService>,
    ) -> Self {
        Self {
            list_service,
            checkout_service,
            state: DonateState::Idle,
        }
    }

    pub fn state(&self) -> &DonateState {
        &self.state
    }

    /// Organizations currently rendered, empty before the list loads.
    pub fn organizations(&self) -> &[OrganizationView] {
        match &self.state {
            DonateState::Idle => &[],
            DonateState::Listed(orgs) => orgs,
            DonateState::CheckoutPending { organizations, .. } => organizations,
        }
    }

    /// Fetches the organization list on page load. The page stays idle if
    /// the fetch fails.
    pub async fn load(&mut self) -> Result<&[OrganizationView], FlowError> {
        if !matches!(self.state, DonateState::Idle) {
            return Err(FlowError::InvalidTransition {
                from: self.state.label(),
                action: "load",
            });
        }

        let organizations = self.list_service.fetch_organization_list().await?;
        tracing::debug!("loaded {} organizations", organizations.len());
        self.state = DonateState::Listed(organizations);
        Ok(self.organizations())
    }

    /// Starts checkout for the organization at `index`.
    ///
    /// Repeated calls each open a new session; nothing is deduplicated.
    pub async fn donate(&mut self, index: usize) -> Result<CheckoutRedirect, FlowError> {
        if matches!(self.state, DonateState::Idle) {
            return Err(FlowError::InvalidTransition {
                from: self.state.label(),
                action: "donate",
            });
        }

        let organizations = self.organizations().to_vec();
        let organization = organizations
            .get(index)
            .cloned()
            .ok_or(FlowError::UnknownOrganization(index))?;

        self.state = DonateState::CheckoutPending {
            organizations,
            organization: organization.clone(),
            redirect: None,
        };

        let redirect = CheckoutRedirect::from(
            self.checkout_service.create_checkout(&organization).await?,
        );
        tracing::info!("redirecting to checkout session {}", redirect.session_id);

        if let DonateState::CheckoutPending { redirect: slot, .. } = &mut self.state {
            *slot = Some(redirect.clone());
        }
        Ok(redirect)
    }
}
