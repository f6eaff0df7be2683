use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::money::validate_money;

#[derive(Debug, Clone, FromRow)]
pub struct DriverModel {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub experience_years: i32,
    pub rating: Decimal,
    pub price_per_hour: Decimal,
    pub image_src: String,
}

impl DriverModel {
    pub fn to_dto(&self) -> DriverDto {
        DriverDto {
            id: self.id,
            name: self.name.clone(),
            age: self.age,
            experience_years: self.experience_years,
            rating: self.rating,
            price_per_hour: self.price_per_hour,
            image_src: self.image_src.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverDto {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub experience_years: i32,
    pub rating: Decimal,
    pub price_per_hour: Decimal,
    pub image_src: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRequest {
    pub name: String,
    pub age: i32,
    #[serde(default)]
    pub experience_years: i32,
    #[serde(default)]
    pub rating: Decimal,
    pub price_per_hour: Decimal,
    #[serde(default)]
    pub image_src: String,
}

impl DriverRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_string());
        }
        validate_money("pricePerHour", self.price_per_hour)?;
        if self.rating < Decimal::ZERO || self.rating > Decimal::from(5) {
            return Err("rating must be between 0 and 5".to_string());
        }
        if self.rating.normalize().scale() > 1 {
            return Err("rating must have at most one decimal place".to_string());
        }
        Ok(())
    }
}
