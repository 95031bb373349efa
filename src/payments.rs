//! Hosted checkout sessions with the payment provider.

use async_trait::async_trait;
use stripe::{
    CheckoutSession, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData, CreateCheckoutSessionPaymentMethodTypes,
    Currency,
};

use crate::error::PaymentError;
use crate::models::CheckoutLineItem;

#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethodType {
    Card,
}

/// Everything the provider needs to open a hosted checkout page.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct CheckoutSessionParams {
    pub payment_method_types: Vec<PaymentMethodType>,
    pub success_url: String,
    pub cancel_url: String,
    pub line_items: Vec<CheckoutLineItem>,
}

#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Creates a checkout session and returns its identifier.
    async fn create_session(&self, params: &CheckoutSessionParams) -> Result<String, PaymentError>;
}

pub struct StripeCheckout {
    client: Client,
}

impl StripeCheckout {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }
}

#[async_trait]
impl CheckoutProvider for StripeCheckout {
    async fn create_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<String, PaymentError> {
        let line_items = params
            .line_items
            .iter()
            .map(stripe_line_item)
            .collect::<Result<Vec<_>, _>>()?;

        let session = CheckoutSession::create(
            &self.client,
            CreateCheckoutSession {
                payment_method_types: Some(
                    params
                        .payment_method_types
                        .iter()
                        .map(|method| match method {
                            PaymentMethodType::Card => {
                                CreateCheckoutSessionPaymentMethodTypes::Card
                            }
                        })
                        .collect(),
                ),
                success_url: Some(params.success_url.as_str()),
                cancel_url: Some(params.cancel_url.as_str()),
                line_items: Some(line_items),
                mode: Some(CheckoutSessionMode::Payment),
                ..Default::default()
            },
        )
        .await?;

        tracing::info!("created checkout session {}", session.id);
        Ok(session.id.to_string())
    }
}

fn stripe_line_item(
    item: &CheckoutLineItem,
) -> Result<CreateCheckoutSessionLineItems, PaymentError> {
    let currency = match item.currency.as_str() {
        "USD" => Currency::USD,
        other => return Err(PaymentError::UnsupportedCurrency(other.to_string())),
    };

    Ok(CreateCheckoutSessionLineItems {
        price_data: Some(CreateCheckoutSessionLineItemsPriceData {
            currency,
            product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                name: item.name.clone(),
                description: Some(item.description.clone()).filter(|d| !d.is_empty()),
                images: Some(item.images.clone()).filter(|images| !images.is_empty()),
                ..Default::default()
            }),
            unit_amount_decimal: Some(item.amount.clone()),
            ..Default::default()
        }),
        quantity: Some(item.quantity),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line_item() -> CheckoutLineItem {
        CheckoutLineItem {
            name: "Acme".into(),
            currency: "USD".into(),
            description: "Helps".into(),
            images: vec!["http://x/y.png".into()],
            amount: "500".into(),
            quantity: 1,
        }
    }

    #[test]
    fn test_stripe_line_item_carries_amount_string() {
        let converted = stripe_line_item(&line_item()).unwrap();
        let price = converted.price_data.unwrap();
        let product = price.product_data.unwrap();

        assert_eq!(price.currency, Currency::USD);
        assert_eq!(price.unit_amount_decimal.as_deref(), Some("500"));
        assert_eq!(product.name, "Acme");
        assert_eq!(product.images, Some(vec!["http://x/y.png".to_string()]));
        assert_eq!(converted.quantity, Some(1));
    }

    #[test]
    fn test_stripe_line_item_drops_empty_fields() {
        let mut item = line_item();
        item.description.clear();
        item.images.clear();

        let product = stripe_line_item(&item)
            .unwrap()
            .price_data
            .unwrap()
            .product_data
            .unwrap();

        assert_eq!(product.description, None);
        assert_eq!(product.images, None);
    }

    #[test]
    fn test_unsupported_currency() {
        let mut item = line_item();
        item.currency = "EUR".into();

        assert!(matches!(
            stripe_line_item(&item),
            Err(PaymentError::UnsupportedCurrency(c)) if c == "EUR"
        ));
    }

    #[test]
    fn test_params_serialize_card_method() {
        let params = CheckoutSessionParams {
            payment_method_types: vec![PaymentMethodType::Card],
            success_url: "https://donate.example.org".into(),
            cancel_url: "https://donate.example.org/donate".into(),
            line_items: vec![line_item()],
        };

        assert_eq!(
            serde_json::to_value(&params).unwrap()["payment_method_types"],
            json!(["card"])
        );
    }
}
