use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::error::AppResult;
use crate::models::{NewOrder, OrderItemModel, OrderModel};
use crate::repository::OrderRepository;

use super::{constraint_error, PgStore};

#[derive(Debug, FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    order_date: DateTime<Utc>,
    total_amount: Decimal,
    payment_status: String,
}

impl OrderRow {
    fn into_model(self, items: Vec<OrderItemModel>) -> OrderModel {
        OrderModel {
            id: self.id,
            user_id: self.user_id,
            order_date: self.order_date,
            total_amount: self.total_amount,
            payment_status: self.payment_status,
            items,
        }
    }
}

const ORDER_COLUMNS: &str = "id, user_id, order_date, total_amount, payment_status";
const ORDER_ITEM_COLUMNS: &str = "id, order_id, product_id, item_type, quantity, unit_price";

impl PgStore {
    /// Loads the lines for `rows` in one query and attaches them.
    async fn with_items(&self, rows: Vec<OrderRow>) -> AppResult<Vec<OrderModel>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let lines: Vec<OrderItemModel> = sqlx::query_as(&format!(
            "SELECT {} FROM order_items WHERE order_id = ANY($1) ORDER BY id",
            ORDER_ITEM_COLUMNS
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_order: HashMap<i32, Vec<OrderItemModel>> = HashMap::new();
        for line in lines {
            by_order.entry(line.order_id).or_default().push(line);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = by_order.remove(&row.id).unwrap_or_default();
                row.into_model(items)
            })
            .collect())
    }
}

#[async_trait]
impl OrderRepository for PgStore {
    async fn list(&self) -> AppResult<Vec<OrderModel>> {
        let rows: Vec<OrderRow> =
            sqlx::query_as(&format!("SELECT {} FROM orders ORDER BY id", ORDER_COLUMNS))
                .fetch_all(&self.pool)
                .await?;
        self.with_items(rows).await
    }

    async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<OrderModel>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {} FROM orders WHERE user_id = $1 ORDER BY id",
            ORDER_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        self.with_items(rows).await
    }

    async fn get(&self, id: i32) -> AppResult<Option<OrderModel>> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.with_items(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create(&self, order: NewOrder) -> AppResult<OrderModel> {
        let mut tx = self.pool.begin().await?;

        let row: OrderRow = sqlx::query_as(&format!(
            "INSERT INTO orders (user_id, order_date, total_amount, payment_status) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(order.user_id)
        .bind(order.order_date)
        .bind(order.total_amount)
        .bind(&order.payment_status)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| constraint_error(e, "Order already exists", "User not found"))?;

        let mut items = Vec::with_capacity(order.items.len());
        for line in &order.items {
            let item: OrderItemModel = sqlx::query_as(&format!(
                "INSERT INTO order_items (order_id, product_id, item_type, quantity, unit_price) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING {}",
                ORDER_ITEM_COLUMNS
            ))
            .bind(row.id)
            .bind(line.product_id)
            .bind(line.item_type.as_str())
            .bind(line.quantity)
            .bind(line.unit_price)
            .fetch_one(&mut *tx)
            .await?;
            items.push(item);
        }

        tx.commit().await?;

        Ok(row.into_model(items))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}
