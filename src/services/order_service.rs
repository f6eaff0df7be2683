use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};
use crate::models::{
    max_money, normalize_payment_status, order_total, CreateOrderItemRequest, CreateOrderRequest,
    ItemType, NewOrder, NewOrderItem, OrderDto, OrderItemDto, OrderItemModel, OrderModel,
    PAYMENT_STATUS_PAID,
};
use crate::repository::{DriverRepository, ItemRepository, OrderRepository, ProductRepository};

/// Prices carts into orders and projects stored orders into DTOs.
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductRepository>,
    drivers: Arc<dyn DriverRepository>,
    items: Arc<dyn ItemRepository>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        products: Arc<dyn ProductRepository>,
        drivers: Arc<dyn DriverRepository>,
        items: Arc<dyn ItemRepository>,
    ) -> Self {
        Self {
            orders,
            products,
            drivers,
            items,
        }
    }

    /// Current unit price of the referenced entity: a car's daily price, a
    /// driver's hourly price or an accessory's price.
    pub async fn unit_price(&self, item_type: ItemType, id: i32) -> AppResult<Decimal> {
        let price = match item_type {
            ItemType::Car => self.products.get(id).await?.map(|p| p.price),
            ItemType::Driver => self.drivers.get(id).await?.map(|d| d.price_per_hour),
            ItemType::Item => self.items.get(id).await?.map(|i| i.price),
        };
        price.ok_or_else(|| AppError::InvalidInput(missing_referent(item_type, id)))
    }

    /// Resolves every line or fails on the first bad one.
    pub async fn price_lines(&self, lines: &[CreateOrderItemRequest]) -> AppResult<Vec<NewOrderItem>> {
        if lines.is_empty() {
            return Err(AppError::InvalidInput(
                "Order must contain at least one item".to_string(),
            ));
        }

        let mut priced = Vec::with_capacity(lines.len());
        for line in lines {
            let item_type: ItemType = line.item_type.parse().map_err(AppError::InvalidInput)?;
            if line.quantity < 1 {
                return Err(AppError::InvalidInput(format!(
                    "Quantity must be at least 1 (got {} for {} {})",
                    line.quantity, item_type, line.product_id
                )));
            }
            let unit_price = self.unit_price(item_type, line.product_id).await?;
            priced.push(NewOrderItem {
                product_id: line.product_id,
                item_type,
                quantity: line.quantity,
                unit_price,
            });
        }
        Ok(priced)
    }

    pub async fn create(&self, user_id: i32, req: CreateOrderRequest) -> AppResult<OrderDto> {
        let items = self.price_lines(&req.items).await?;
        let total_amount = order_total(&items)
            .filter(|total| *total <= max_money())
            .ok_or_else(|| AppError::InvalidInput("Order total is out of range".to_string()))?;

        let order = self
            .orders
            .create(NewOrder {
                user_id,
                order_date: Utc::now(),
                total_amount,
                payment_status: PAYMENT_STATUS_PAID.to_string(),
                items,
            })
            .await?;
        tracing::info!(
            "Order created: id={}, user_id={}, lines={}, total={}",
            order.id,
            user_id,
            order.items.len(),
            order.total_amount
        );

        self.to_dto(&order).await
    }

    pub async fn list(&self) -> AppResult<Vec<OrderDto>> {
        let orders = self.orders.list().await?;
        self.to_dtos(&orders).await
    }

    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<OrderDto>> {
        let orders = self.orders.list_by_user(user_id).await?;
        tracing::debug!("Found {} orders for user_id={}", orders.len(), user_id);
        self.to_dtos(&orders).await
    }

    pub async fn get(&self, id: i32) -> AppResult<OrderDto> {
        match self.orders.get(id).await? {
            Some(order) => self.to_dto(&order).await,
            None => Err(AppError::NotFound("Order not found".to_string())),
        }
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.orders.delete(id).await? {
            return Err(AppError::NotFound("Order not found".to_string()));
        }
        tracing::info!("Order deleted: id={}", id);
        Ok(())
    }

    async fn to_dtos(&self, orders: &[OrderModel]) -> AppResult<Vec<OrderDto>> {
        let referents = self.referents(orders).await?;
        Ok(orders.iter().map(|order| referents.to_dto(order)).collect())
    }

    async fn to_dto(&self, order: &OrderModel) -> AppResult<OrderDto> {
        let referents = self.referents(std::slice::from_ref(order)).await?;
        Ok(referents.to_dto(order))
    }

    /// Loads every entity the lines point at, one query per item type.
    async fn referents(&self, orders: &[OrderModel]) -> AppResult<Referents> {
        let mut car_ids = Vec::new();
        let mut driver_ids = Vec::new();
        let mut item_ids = Vec::new();
        for line in orders.iter().flat_map(|o| &o.items) {
            match line.item_type.parse::<ItemType>() {
                Ok(ItemType::Car) => car_ids.push(line.product_id),
                Ok(ItemType::Driver) => driver_ids.push(line.product_id),
                Ok(ItemType::Item) => item_ids.push(line.product_id),
                Err(_) => {}
            }
        }
        for ids in [&mut car_ids, &mut driver_ids, &mut item_ids] {
            ids.sort_unstable();
            ids.dedup();
        }

        let mut referents = Referents::default();
        if !car_ids.is_empty() {
            for p in self.products.find_many(&car_ids).await? {
                referents.cars.insert(p.id, (p.display_name(), p.image_src));
            }
        }
        if !driver_ids.is_empty() {
            for d in self.drivers.find_many(&driver_ids).await? {
                referents.drivers.insert(d.id, (d.name, d.image_src));
            }
        }
        if !item_ids.is_empty() {
            for i in self.items.find_many(&item_ids).await? {
                referents.items.insert(i.id, (i.name, i.image_src));
            }
        }
        Ok(referents)
    }
}

/// Name and image per referenced id, split by item type.
#[derive(Default)]
struct Referents {
    cars: HashMap<i32, (String, String)>,
    drivers: HashMap<i32, (String, String)>,
    items: HashMap<i32, (String, String)>,
}

impl Referents {
    fn describe(&self, line: &OrderItemModel) -> Option<(String, String)> {
        let table = match line.item_type.parse::<ItemType>().ok()? {
            ItemType::Car => &self.cars,
            ItemType::Driver => &self.drivers,
            ItemType::Item => &self.items,
        };
        table.get(&line.product_id).cloned()
    }

    fn to_dto(&self, order: &OrderModel) -> OrderDto {
        OrderDto {
            id: order.id,
            user_id: order.user_id,
            order_date: order.order_date,
            total_amount: order.total_amount,
            payment_status: normalize_payment_status(&order.payment_status),
            items: order
                .items
                .iter()
                .map(|line| OrderItemDto::from_model(line, self.describe(line)))
                .collect(),
        }
    }
}

fn missing_referent(item_type: ItemType, id: i32) -> String {
    match item_type {
        ItemType::Car => format!("Product with ID {} not found", id),
        ItemType::Driver => format!("Driver with ID {} not found", id),
        ItemType::Item => format!("Item with ID {} not found", id),
    }
}
