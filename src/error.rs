use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Failures talking to the content store.
#[derive(Error, Debug)]
pub enum ContentStoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("query returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode query result: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed image reference: {0:?}")]
    InvalidImageRef(String),
}

/// Failures talking to the payment provider.
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("stripe: {0}")]
    Stripe(String),

    #[error("unsupported currency {0}")]
    UnsupportedCurrency(String),
}

impl From<stripe::StripeError> for PaymentError {
    fn from(err: stripe::StripeError) -> Self {
        PaymentError::Stripe(err.to_string())
    }
}

/// Error returned by the function handlers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("content store error: {0}")]
    ContentStore(#[from] ContentStoreError),

    #[error("payment provider error: {0}")]
    Payment(#[from] PaymentError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Failures seen by the browser-side donation flow.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{url} responded with {status}")]
    Status { url: String, status: u16 },
}

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("cannot {action} while {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },

    #[error("no organization at position {0}")]
    UnknownOrganization(usize),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

pub type AppResult<T> = Result<T, AppError>;
