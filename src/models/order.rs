use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const PAYMENT_STATUS_PAID: &str = "paid";

/// Which table an order line's `product_id` points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Car,
    Driver,
    Item,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Car => "car",
            ItemType::Driver => "driver",
            ItemType::Item => "item",
        }
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(ItemType::Car),
            "driver" => Ok(ItemType::Driver),
            "item" => Ok(ItemType::Item),
            _ => Err(format!("Invalid item type: {}", s)),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct OrderModel {
    pub id: i32,
    pub user_id: i32,
    pub order_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub payment_status: String,
    pub items: Vec<OrderItemModel>,
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderItemModel {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub item_type: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl OrderItemModel {
    /// Saturates rather than panicking on overflow.
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// A priced order ready to be persisted as one unit.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i32,
    pub order_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub payment_status: String,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub product_id: i32,
    pub item_type: ItemType,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl NewOrderItem {
    /// `None` on overflow.
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Sum of unit price times quantity over all lines, `None` on overflow.
pub fn order_total(items: &[NewOrderItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.line_total()?))
}

/// Older rows were written as "Paid"; clients expect lower case.
pub fn normalize_payment_status(status: &str) -> String {
    status.trim().to_ascii_lowercase()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<CreateOrderItemRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItemRequest {
    pub product_id: i32,
    pub quantity: i32,
    /// "car", "driver" or "item"; parsed case-insensitively.
    pub item_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: i32,
    pub user_id: i32,
    pub order_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub payment_status: String,
    pub items: Vec<OrderItemDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub product_image: String,
    pub item_type: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

impl OrderItemDto {
    /// Builds the line DTO; `display` is the referent's name and image when it still exists.
    pub fn from_model(model: &OrderItemModel, display: Option<(String, String)>) -> Self {
        let (product_name, product_image) =
            display.unwrap_or_else(|| (fallback_product_name(model), String::new()));
        OrderItemDto {
            id: model.id,
            product_id: model.product_id,
            product_name,
            product_image,
            item_type: model.item_type.clone(),
            quantity: model.quantity,
            unit_price: model.unit_price,
            total_price: model.line_total(),
        }
    }
}

fn fallback_product_name(model: &OrderItemModel) -> String {
    match model.item_type.parse::<ItemType>() {
        Ok(ItemType::Car) => "Unknown Car".to_string(),
        Ok(ItemType::Driver) => format!("Driver #{}", model.product_id),
        Ok(ItemType::Item) => format!("Item #{}", model.product_id),
        Err(_) => "Unknown Item".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("car", ItemType::Car)]
    #[case("Driver", ItemType::Driver)]
    #[case(" ITEM ", ItemType::Item)]
    fn test_item_type_parse(#[case] input: &str, #[case] expected: ItemType) {
        assert_eq!(input.parse::<ItemType>().unwrap(), expected);
    }

    #[test]
    fn test_item_type_rejects_unknown() {
        let err = "boat".parse::<ItemType>().unwrap_err();
        assert_eq!(err, "Invalid item type: boat");
    }

    #[test]
    fn test_order_total_sums_lines() {
        let items = vec![
            NewOrderItem {
                product_id: 1,
                item_type: ItemType::Car,
                quantity: 2,
                unit_price: Decimal::from(507),
            },
            NewOrderItem {
                product_id: 3,
                item_type: ItemType::Driver,
                quantity: 3,
                unit_price: Decimal::new(3475, 1),
            },
        ];
        assert_eq!(order_total(&items), Some(Decimal::new(20565, 1)));
        assert_eq!(order_total(&[]), Some(Decimal::ZERO));
    }

    #[test]
    fn test_order_total_overflow_is_none() {
        let items = vec![NewOrderItem {
            product_id: 1,
            item_type: ItemType::Item,
            quantity: 10,
            unit_price: Decimal::MAX,
        }];
        assert_eq!(items[0].line_total(), None);
        assert_eq!(order_total(&items), None);
    }

    #[test]
    fn test_fallback_names() {
        let mut line = OrderItemModel {
            id: 1,
            order_id: 1,
            product_id: 42,
            item_type: "driver".into(),
            quantity: 2,
            unit_price: Decimal::from(10),
        };
        let dto = OrderItemDto::from_model(&line, None);
        assert_eq!(dto.product_name, "Driver #42");
        assert_eq!(dto.product_image, "");
        assert_eq!(dto.total_price, Decimal::from(20));

        line.item_type = "car".into();
        assert_eq!(OrderItemDto::from_model(&line, None).product_name, "Unknown Car");

        line.item_type = "spaceship".into();
        assert_eq!(OrderItemDto::from_model(&line, None).product_name, "Unknown Item");
    }

    #[test]
    fn test_normalize_payment_status() {
        assert_eq!(normalize_payment_status("Paid"), "paid");
        assert_eq!(normalize_payment_status("pending"), "pending");
    }
}
