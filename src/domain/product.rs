//! Product entity and its request schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A product document as stored and returned.
#[derive(Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload: name and price are required, stock defaults to 0.
#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

/// A validated product ready to persist.
#[derive(Debug, Serialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreateProduct {
    pub fn validate(self) -> Result<NewProduct, ApiError> {
        let mut missing = Vec::new();
        if self.name.as_deref().unwrap_or("").is_empty() {
            missing.push("name");
        }
        if self.price.is_none() {
            missing.push("price");
        }
        if !missing.is_empty() {
            return Err(ApiError::MissingFields(missing));
        }

        let price = self.price.unwrap_or_default();
        if price < 0.0 {
            return Err(ApiError::InvalidField {
                field: "price",
                reason: "must not be negative".into(),
            });
        }

        let stock = self.stock.unwrap_or(0);
        if stock < 0 {
            return Err(ApiError::InvalidField {
                field: "stock",
                reason: "must not be negative".into(),
            });
        }

        let now = Utc::now();
        Ok(NewProduct {
            name: self.name.unwrap_or_default(),
            description: self.description,
            price,
            stock,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update: only supplied fields overwrite.
#[derive(Debug, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

impl UpdateProduct {
    /// Build the merge document, always restamping `updated_at`.
    pub fn into_changes(self) -> Result<serde_json::Value, ApiError> {
        if let Some(price) = self.price {
            if price < 0.0 {
                return Err(ApiError::InvalidField {
                    field: "price",
                    reason: "must not be negative".into(),
                });
            }
        }
        if let Some(stock) = self.stock {
            if stock < 0 {
                return Err(ApiError::InvalidField {
                    field: "stock",
                    reason: "must not be negative".into(),
                });
            }
        }

        let mut changes = serde_json::Map::new();
        if let Some(name) = self.name {
            changes.insert("name".into(), name.into());
        }
        if let Some(description) = self.description {
            changes.insert("description".into(), description.into());
        }
        if let Some(price) = self.price {
            changes.insert("price".into(), price.into());
        }
        if let Some(stock) = self.stock {
            changes.insert("stock".into(), stock.into());
        }
        changes.insert(
            "updated_at".into(),
            serde_json::to_value(Utc::now()).unwrap_or_default(),
        );
        Ok(serde_json::Value::Object(changes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_name_and_price() {
        let payload = CreateProduct {
            name: None,
            description: None,
            price: None,
            stock: None,
        };
        let err = payload.validate().unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: name, price");
    }

    #[test]
    fn create_rejects_negative_price() {
        let payload = CreateProduct {
            name: Some("widget".into()),
            description: None,
            price: Some(-1.0),
            stock: None,
        };
        let err = payload.validate().unwrap_err();
        assert_eq!(err.kind(), "invalid_field");
    }

    #[test]
    fn stock_defaults_to_zero() {
        let payload = CreateProduct {
            name: Some("widget".into()),
            description: None,
            price: Some(9.5),
            stock: None,
        };
        let product = payload.validate().unwrap();
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn update_changes_contain_only_supplied_fields() {
        let payload = UpdateProduct {
            name: None,
            description: None,
            price: Some(12.0),
            stock: None,
        };
        let changes = payload.into_changes().unwrap();
        let obj = changes.as_object().unwrap();
        assert!(obj.contains_key("price"));
        assert!(obj.contains_key("updated_at"));
        assert!(!obj.contains_key("name"));
        assert!(!obj.contains_key("stock"));
    }
}
