use std::fmt;

pub const CHECKOUT_CURRENCY: &str = "USD";

/// Donation amount as entered in the content store or sent by the browser.
///
/// Kept as the caller's text or number so the minor-unit rendering matches the
/// input exactly.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum DonationAmount {
    Number(serde_json::Number),
    Text(String),
}

impl DonationAmount {
    /// Appends two zero digits; `5` becomes `"500"`, `"25"` becomes `"2500"`.
    pub fn to_minor_units(&self) -> String {
        format!("{}00", self)
    }
}

impl fmt::Display for DonationAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DonationAmount::Number(n) => match n.as_f64() {
                // Floats render the way the browser prints them: `10.0` as `10`.
                Some(value) if n.is_f64() => f.write_str(ryu_js::Buffer::new().format(value)),
                _ => write!(f, "{}", n),
            },
            DonationAmount::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for DonationAmount {
    fn from(value: i64) -> Self {
        DonationAmount::Number(value.into())
    }
}

impl From<&str> for DonationAmount {
    fn from(value: &str) -> Self {
        DonationAmount::Text(value.to_string())
    }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Reference {
    #[serde(rename = "_ref")]
    pub reference: String,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ImageField {
    pub asset: Option<Reference>,
}

/// An `organization` document as returned by the content store.
#[derive(serde::Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub name: Option<String>,
    pub images: Option<Vec<ImageField>>,
    pub website: Option<String>,
    pub donation_amount: Option<DonationAmount>,
    pub short_description: Option<String>,
    pub categories: Option<Vec<Reference>>,
    pub twitter: Option<String>,
}

impl Organization {
    pub fn first_image_ref(&self) -> Option<&str> {
        self.images
            .as_deref()?
            .first()?
            .asset
            .as_ref()
            .map(|asset| asset.reference.as_str())
    }
}

/// Flattened organization served to the donate page.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donation_amount: Option<DonationAmount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl OrganizationView {
    /// Sample shown by an organization card before real data is bound.
    pub fn placeholder() -> Self {
        Self {
            name: Some("Organization Name".to_string()),
            website: Some("https://organization.org".to_string()),
            donation_amount: Some(DonationAmount::from("10")),
            description: Some("This will describe the organization.".to_string()),
            twitter: Some("https://twitter.com/organization".to_string()),
            image: Some("https://bit.ly/2ZdePYO".to_string()),
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct CheckoutLineItem {
    pub name: String,
    pub currency: String,
    pub description: String,
    pub images: Vec<String>,
    pub amount: String,
    pub quantity: u64,
}
