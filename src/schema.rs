//! Document types declared in the content store.
//!
//! These mirror the schema the editors author against; the list function only
//! reads `organization` documents, but `category` is declared so references
//! resolve in the authoring UI.

use serde::Serialize;

pub const ORGANIZATION_TYPE: &str = "organization";
pub const CATEGORY_TYPE: &str = "category";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSchema {
    pub name: &'static str,
    pub title: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub fields: Vec<FieldSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Preview>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    pub name: &'static str,
    pub title: &'static str,
    #[serde(flatten)]
    pub field_type: FieldType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    String,
    Url,
    Number,
    Image,
    Array { of: Vec<FieldType> },
    Reference { to: TypeRef },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeRef {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub select: PreviewSelect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewSelect {
    pub title: &'static str,
}

impl FieldSchema {
    fn new(name: &'static str, title: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            title,
            field_type,
        }
    }
}

pub fn organization_schema() -> DocumentSchema {
    DocumentSchema {
        name: ORGANIZATION_TYPE,
        title: "Organization",
        kind: "document",
        fields: vec![
            FieldSchema::new("name", "Name", FieldType::String),
            FieldSchema::new(
                "images",
                "Images",
                FieldType::Array {
                    of: vec![FieldType::Image],
                },
            ),
            FieldSchema::new("website", "Website", FieldType::Url),
            FieldSchema::new("donationAmount", "Donation Amount", FieldType::Number),
            FieldSchema::new("shortDescription", "Short Description", FieldType::String),
            FieldSchema::new(
                "categories",
                "Categories",
                FieldType::Array {
                    of: vec![FieldType::Reference {
                        to: TypeRef {
                            kind: CATEGORY_TYPE,
                        },
                    }],
                },
            ),
            FieldSchema::new("twitter", "Twitter", FieldType::Url),
        ],
        preview: Some(Preview {
            select: PreviewSelect { title: "name" },
        }),
    }
}

pub fn category_schema() -> DocumentSchema {
    DocumentSchema {
        name: CATEGORY_TYPE,
        title: "Category",
        kind: "document",
        fields: vec![
            FieldSchema::new("title", "Title", FieldType::String),
            FieldSchema::new("description", "Description", FieldType::String),
        ],
        preview: None,
    }
}

/// Every document type the content store is expected to hold.
pub fn all_schemas() -> Vec<DocumentSchema> {
    vec![organization_schema(), category_schema()]
}

/// Query selecting all organizations, sorted by name.
pub fn organization_list_query() -> String {
    format!("*[_type==\"{}\"] | order(name asc)", ORGANIZATION_TYPE)
}
