use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use donation_functions::config::Config;
use donation_functions::content::ContentStore;
use donation_functions::error::PaymentError;
use donation_functions::handlers::{self, AppState};
use donation_functions::mock::{MockCheckoutProvider, MockContentStore};
use donation_functions::models::{CheckoutLineItem, Organization};

fn config(site_url: &str) -> Config {
    Config {
        sanity_project_id: "abc123".into(),
        sanity_dataset: "production".into(),
        sanity_use_cdn: true,
        sanity_api_version: "v1".into(),
        sanity_api_host: None,
        stripe_secret_key: "sk_test".into(),
        publishable_key: "pk_test_abc".into(),
        site_url: site_url.into(),
        server_host: "127.0.0.1".into(),
        server_port: 3000,
    }
}

fn organizations(values: Value) -> Vec<Organization> {
    serde_json::from_value(values).unwrap()
}

fn app(store: MockContentStore, provider: MockCheckoutProvider, site_url: &str) -> axum::Router {
    handlers::router(AppState::new(
        &config(site_url),
        Arc::new(store),
        Arc::new(provider),
    ))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_get_orgs_without_images() {
    let store = MockContentStore::new(organizations(json!([
        { "name": "Acme", "shortDescription": "Helps", "donationAmount": 5, "images": [] }
    ])));
    let app = app(store, MockCheckoutProvider::new(), "https://donate.example.org");

    let response = app.oneshot(get(handlers::GET_ORGS_PATH)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(
        body_json(response).await,
        json!([{ "name": "Acme", "description": "Helps", "donationAmount": 5 }])
    );
}

#[tokio::test]
async fn test_get_orgs_sorted_with_images() {
    let store = MockContentStore::new(organizations(json!([
        {
            "name": "Zephyr",
            "website": "https://zephyr.org",
            "twitter": "https://twitter.com/zephyr",
            "images": [{ "asset": { "_ref": "image-zzz-100x50-jpg" } }]
        },
        { "name": "Beacon", "donationAmount": 20 }
    ])));
    let expected_image = store.image_url("image-zzz-100x50-jpg").unwrap();
    let app = app(store, MockCheckoutProvider::new(), "https://donate.example.org");

    let body = body_json(app.oneshot(get(handlers::GET_ORGS_PATH)).await.unwrap()).await;

    assert_eq!(
        body,
        json!([
            { "name": "Beacon", "donationAmount": 20 },
            {
                "name": "Zephyr",
                "website": "https://zephyr.org",
                "twitter": "https://twitter.com/zephyr",
                "image": expected_image
            }
        ])
    );
}

#[tokio::test]
async fn test_get_orgs_store_failure_is_server_error() {
    let app = app(
        MockContentStore::failing(503),
        MockCheckoutProvider::new(),
        "https://donate.example.org",
    );

    let response = app.oneshot(get(handlers::GET_ORGS_PATH)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).starts_with("content store error"));
}

#[tokio::test]
async fn test_create_checkout_builds_single_line_item() {
    let provider = MockCheckoutProvider::new();
    let app = app(
        MockContentStore::new(vec![]),
        provider.clone(),
        "https://donate.example.org",
    );

    let response = app
        .oneshot(post_json(
            handlers::CREATE_CHECKOUT_PATH,
            json!({
                "name": "Acme",
                "description": "Helps",
                "image": "http://x/y.png",
                "donationAmount": 5
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "sessionId": "cs_test_1", "publishableKey": "pk_test_abc" })
    );

    let captured = provider.captured().await;
    assert_eq!(captured.len(), 1);
    assert_eq!(
        captured[0].line_items,
        vec![CheckoutLineItem {
            name: "Acme".into(),
            currency: "USD".into(),
            description: "Helps".into(),
            images: vec!["http://x/y.png".into()],
            amount: "500".into(),
            quantity: 1,
        }]
    );
}

#[tokio::test]
async fn test_create_checkout_amount_and_cancel_url() {
    for (site_url, amount, expected) in [
        ("https://donate.example.org", json!(10), "1000"),
        ("http://localhost:8888", json!("25"), "2500"),
    ] {
        let provider = MockCheckoutProvider::new();
        let app = app(MockContentStore::new(vec![]), provider.clone(), site_url);

        app.oneshot(post_json(
            handlers::CREATE_CHECKOUT_PATH,
            json!({ "name": "Acme", "description": "Helps", "image": "http://x/y.png", "donationAmount": amount }),
        ))
        .await
        .unwrap();

        let captured = provider.captured().await;
        assert_eq!(captured[0].line_items[0].amount, expected);
        assert_eq!(captured[0].success_url, site_url);
        assert_eq!(captured[0].cancel_url, format!("{}/donate", site_url));
    }
}

#[tokio::test]
async fn test_create_checkout_provider_failure_is_server_error() {
    let provider = MockCheckoutProvider::new();
    provider
        .fail_next(PaymentError::Stripe("api_key_invalid".into()))
        .await;
    let app = app(MockContentStore::new(vec![]), provider, "https://donate.example.org");

    let response = app
        .oneshot(post_json(
            handlers::CREATE_CHECKOUT_PATH,
            json!({ "name": "Acme", "description": "Helps", "image": "http://x/y.png", "donationAmount": 5 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).starts_with("payment provider error"));
}

#[tokio::test]
async fn test_create_checkout_malformed_body_rejected() {
    let provider = MockCheckoutProvider::new();
    let app = app(
        MockContentStore::new(vec![]),
        provider.clone(),
        "https://donate.example.org",
    );

    let response = app
        .oneshot(post_json(handlers::CREATE_CHECKOUT_PATH, json!({ "name": "Acme" })))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert!(provider.captured().await.is_empty());
}

#[tokio::test]
async fn test_hello() {
    let app = app(
        MockContentStore::new(vec![]),
        MockCheckoutProvider::new(),
        "https://donate.example.org",
    );

    let response = app.oneshot(get(handlers::HELLO_PATH)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"This function is totes working, Yay!");
}
