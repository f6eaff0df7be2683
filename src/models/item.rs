use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::money::validate_money;

/// An accessory that can be added to a rental.
#[derive(Debug, Clone, FromRow)]
pub struct ItemModel {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_src: String,
}

impl ItemModel {
    pub fn to_dto(&self) -> ItemDto {
        ItemDto {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            image_src: self.image_src.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_src: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_src: String,
}

impl ItemRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_string());
        }
        validate_money("price", self.price)
    }
}
