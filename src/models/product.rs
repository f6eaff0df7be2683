use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::money::validate_money;

/// A vehicle offered for rent. `price` is per day.
#[derive(Debug, Clone, FromRow)]
pub struct ProductModel {
    pub id: i32,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub price: Decimal,
    pub image_src: String,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
}

impl ProductModel {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }

    pub fn to_dto(&self) -> ProductDto {
        ProductDto {
            id: self.id,
            brand: self.brand.clone(),
            model: self.model.clone(),
            name: self.display_name(),
            year: self.year,
            color: self.color.clone(),
            price: self.price,
            image_src: self.image_src.clone(),
            category_id: self.category_id,
            category_name: self.category_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i32,
    pub brand: String,
    pub model: String,
    pub name: String,
    pub year: i32,
    pub color: String,
    pub price: Decimal,
    pub image_src: String,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
}

/// Used for both create and update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub brand: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub color: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_src: String,
    #[serde(default)]
    pub category_id: Option<i32>,
}

impl ProductRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.brand.trim().is_empty() || self.model.trim().is_empty() {
            return Err("brand and model are required".to_string());
        }
        validate_money("price", self.price)
    }
}
