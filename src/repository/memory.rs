use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{
    normalize_email, CategoryModel, CategoryRequest, DriverModel, DriverRequest, ItemModel,
    ItemRequest, NewOrder, NewUser, OrderItemModel, OrderModel, ProductModel, ProductRequest,
    UpdateUserRequest, UserModel,
};

use super::{
    CategoryRepository, DriverRepository, ItemRepository, OrderRepository, ProductRepository,
    UserRepository,
};

/// Process-local store used when no database is configured, and by tests.
/// Cloning shares the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, UserModel>,
    categories: BTreeMap<i32, CategoryModel>,
    products: BTreeMap<i32, ProductModel>,
    drivers: BTreeMap<i32, DriverModel>,
    items: BTreeMap<i32, ItemModel>,
    orders: BTreeMap<i32, OrderModel>,
    sequences: Sequences,
}

#[derive(Default)]
struct Sequences {
    user: i32,
    category: i32,
    product: i32,
    driver: i32,
    item: i32,
    order: i32,
    order_item: i32,
}

fn next(seq: &mut i32) -> i32 {
    *seq += 1;
    *seq
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        let email = normalize_email(email);
        self.users
            .values()
            .any(|u| normalize_email(&u.email) == email && Some(u.id) != except)
    }

    fn check_category(&self, category_id: Option<i32>) -> AppResult<()> {
        match category_id {
            Some(id) if !self.categories.contains_key(&id) => Err(AppError::InvalidInput(format!(
                "Category with ID {} not found",
                id
            ))),
            _ => Ok(()),
        }
    }

    /// Products store only the category id; the name is joined on read.
    fn joined(&self, product: &ProductModel) -> ProductModel {
        let mut product = product.clone();
        product.category_name = product
            .category_id
            .and_then(|id| self.categories.get(&id))
            .map(|c| c.name.clone());
        product
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<UserModel>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> AppResult<Option<UserModel>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserModel>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| normalize_email(&u.email) == normalize_email(email))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<UserModel> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&user.email, None) {
            return Err(AppError::AlreadyExists(
                "User with this email already exists".to_string(),
            ));
        }
        let id = next(&mut tables.sequences.user);
        let model = UserModel {
            id,
            user_name: user.user_name,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            created_at: Utc::now(),
        };
        tables.users.insert(id, model.clone());
        Ok(model)
    }

    async fn update(&self, id: i32, changes: &UpdateUserRequest) -> AppResult<Option<UserModel>> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Ok(None);
        }
        if tables.email_taken(&changes.email, Some(id)) {
            return Err(AppError::AlreadyExists(
                "User with this email already exists".to_string(),
            ));
        }
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        user.user_name = changes.user_name.clone();
        user.email = changes.email.clone();
        user.first_name = changes.first_name.clone();
        user.last_name = changes.last_name.clone();
        user.phone = changes.phone.clone();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.orders.retain(|_, o| o.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<CategoryModel>> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> AppResult<Option<CategoryModel>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn create(&self, req: &CategoryRequest) -> AppResult<CategoryModel> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.sequences.category);
        let model = CategoryModel {
            id,
            name: req.name.clone(),
        };
        tables.categories.insert(id, model.clone());
        Ok(model)
    }

    async fn update(&self, id: i32, req: &CategoryRequest) -> AppResult<Option<CategoryModel>> {
        let mut tables = self.tables.write().await;
        Ok(tables.categories.get_mut(&id).map(|c| {
            c.name = req.name.clone();
            c.clone()
        }))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.categories.remove(&id).is_none() {
            return Ok(false);
        }
        for product in tables.products.values_mut() {
            if product.category_id == Some(id) {
                product.category_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<ProductModel>> {
        let tables = self.tables.read().await;
        Ok(tables.products.values().map(|p| tables.joined(p)).collect())
    }

    async fn list_by_category(&self, category_id: i32) -> AppResult<Vec<ProductModel>> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .values()
            .filter(|p| p.category_id == Some(category_id))
            .map(|p| tables.joined(p))
            .collect())
    }

    async fn find_many(&self, ids: &[i32]) -> AppResult<Vec<ProductModel>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.products.get(id))
            .map(|p| tables.joined(p))
            .collect())
    }

    async fn get(&self, id: i32) -> AppResult<Option<ProductModel>> {
        let tables = self.tables.read().await;
        Ok(tables.products.get(&id).map(|p| tables.joined(p)))
    }

    async fn create(&self, req: &ProductRequest) -> AppResult<ProductModel> {
        let mut tables = self.tables.write().await;
        tables.check_category(req.category_id)?;
        let id = next(&mut tables.sequences.product);
        let model = ProductModel {
            id,
            brand: req.brand.clone(),
            model: req.model.clone(),
            year: req.year,
            color: req.color.clone(),
            price: req.price,
            image_src: req.image_src.clone(),
            category_id: req.category_id,
            category_name: None,
        };
        tables.products.insert(id, model.clone());
        Ok(tables.joined(&model))
    }

    async fn update(&self, id: i32, req: &ProductRequest) -> AppResult<Option<ProductModel>> {
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&id) {
            return Ok(None);
        }
        tables.check_category(req.category_id)?;
        let Some(product) = tables.products.get_mut(&id) else {
            return Ok(None);
        };
        product.brand = req.brand.clone();
        product.model = req.model.clone();
        product.year = req.year;
        product.color = req.color.clone();
        product.price = req.price;
        product.image_src = req.image_src.clone();
        product.category_id = req.category_id;
        let updated = product.clone();
        Ok(Some(tables.joined(&updated)))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.tables.write().await.products.remove(&id).is_some())
    }
}

#[async_trait]
impl DriverRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<DriverModel>> {
        Ok(self.tables.read().await.drivers.values().cloned().collect())
    }

    async fn find_many(&self, ids: &[i32]) -> AppResult<Vec<DriverModel>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.drivers.get(id))
            .map(|p| p.clone())
            .collect())
    }

    async fn get(&self, id: i32) -> AppResult<Option<DriverModel>> {
        Ok(self.tables.read().await.drivers.get(&id).cloned())
    }

    async fn create(&self, req: &DriverRequest) -> AppResult<DriverModel> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.sequences.driver);
        let model = DriverModel {
            id,
            name: req.name.clone(),
            age: req.age,
            experience_years: req.experience_years,
            rating: req.rating,
            price_per_hour: req.price_per_hour,
            image_src: req.image_src.clone(),
        };
        tables.drivers.insert(id, model.clone());
        Ok(model)
    }

    async fn update(&self, id: i32, req: &DriverRequest) -> AppResult<Option<DriverModel>> {
        let mut tables = self.tables.write().await;
        Ok(tables.drivers.get_mut(&id).map(|d| {
            d.name = req.name.clone();
            d.age = req.age;
            d.experience_years = req.experience_years;
            d.rating = req.rating;
            d.price_per_hour = req.price_per_hour;
            d.image_src = req.image_src.clone();
            d.clone()
        }))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.tables.write().await.drivers.remove(&id).is_some())
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<ItemModel>> {
        Ok(self.tables.read().await.items.values().cloned().collect())
    }

    async fn find_many(&self, ids: &[i32]) -> AppResult<Vec<ItemModel>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.items.get(id))
            .map(|p| p.clone())
            .collect())
    }

    async fn get(&self, id: i32) -> AppResult<Option<ItemModel>> {
        Ok(self.tables.read().await.items.get(&id).cloned())
    }

    async fn create(&self, req: &ItemRequest) -> AppResult<ItemModel> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.sequences.item);
        let model = ItemModel {
            id,
            name: req.name.clone(),
            description: req.description.clone(),
            price: req.price,
            image_src: req.image_src.clone(),
        };
        tables.items.insert(id, model.clone());
        Ok(model)
    }

    async fn update(&self, id: i32, req: &ItemRequest) -> AppResult<Option<ItemModel>> {
        let mut tables = self.tables.write().await;
        Ok(tables.items.get_mut(&id).map(|i| {
            i.name = req.name.clone();
            i.description = req.description.clone();
            i.price = req.price;
            i.image_src = req.image_src.clone();
            i.clone()
        }))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.tables.write().await.items.remove(&id).is_some())
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<OrderModel>> {
        Ok(self.tables.read().await.orders.values().cloned().collect())
    }

    async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<OrderModel>> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i32) -> AppResult<Option<OrderModel>> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn create(&self, order: NewOrder) -> AppResult<OrderModel> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&order.user_id) {
            return Err(AppError::InvalidInput(format!(
                "User with ID {} not found",
                order.user_id
            )));
        }
        let order_id = next(&mut tables.sequences.order);
        let mut items = Vec::with_capacity(order.items.len());
        for line in order.items {
            items.push(OrderItemModel {
                id: next(&mut tables.sequences.order_item),
                order_id,
                product_id: line.product_id,
                item_type: line.item_type.as_str().to_string(),
                quantity: line.quantity,
                unit_price: line.unit_price,
            });
        }
        let model = OrderModel {
            id: order_id,
            user_id: order.user_id,
            order_date: order.order_date,
            total_amount: order.total_amount,
            payment_status: order.payment_status,
            items,
        };
        tables.orders.insert(order_id, model.clone());
        Ok(model)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.tables.write().await.orders.remove(&id).is_some())
    }
}
