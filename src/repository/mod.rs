// Repository abstraction over PostgreSQL and the in-memory store

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{
    CategoryModel, CategoryRequest, DriverModel, DriverRequest, ItemModel, ItemRequest, NewOrder,
    NewUser, OrderModel, ProductModel, ProductRequest, UpdateUserRequest, UserModel,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<UserModel>>;

    async fn get(&self, id: i32) -> AppResult<Option<UserModel>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserModel>>;

    /// Fails with `AlreadyExists` when the email is taken.
    async fn create(&self, user: NewUser) -> AppResult<UserModel>;

    /// Returns `None` when no user has this id.
    async fn update(&self, id: i32, changes: &UpdateUserRequest) -> AppResult<Option<UserModel>>;

    /// Deletes the user and their orders. Returns false when nothing was deleted.
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<CategoryModel>>;

    async fn get(&self, id: i32) -> AppResult<Option<CategoryModel>>;

    async fn create(&self, req: &CategoryRequest) -> AppResult<CategoryModel>;

    async fn update(&self, id: i32, req: &CategoryRequest) -> AppResult<Option<CategoryModel>>;

    /// Products in the category keep existing with no category.
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<ProductModel>>;

    /// Rows whose id is in `ids`; missing ids are skipped.
    async fn find_many(&self, ids: &[i32]) -> AppResult<Vec<ProductModel>>;

    async fn list_by_category(&self, category_id: i32) -> AppResult<Vec<ProductModel>>;

    async fn get(&self, id: i32) -> AppResult<Option<ProductModel>>;

    /// Fails with `InvalidInput` when `category_id` names no category.
    async fn create(&self, req: &ProductRequest) -> AppResult<ProductModel>;

    async fn update(&self, id: i32, req: &ProductRequest) -> AppResult<Option<ProductModel>>;

    async fn delete(&self, id: i32) -> AppResult<bool>;
}

#[async_trait]
pub trait DriverRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<DriverModel>>;

    async fn find_many(&self, ids: &[i32]) -> AppResult<Vec<DriverModel>>;

    async fn get(&self, id: i32) -> AppResult<Option<DriverModel>>;

    async fn create(&self, req: &DriverRequest) -> AppResult<DriverModel>;

    async fn update(&self, id: i32, req: &DriverRequest) -> AppResult<Option<DriverModel>>;

    async fn delete(&self, id: i32) -> AppResult<bool>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<ItemModel>>;

    async fn find_many(&self, ids: &[i32]) -> AppResult<Vec<ItemModel>>;

    async fn get(&self, id: i32) -> AppResult<Option<ItemModel>>;

    async fn create(&self, req: &ItemRequest) -> AppResult<ItemModel>;

    async fn update(&self, id: i32, req: &ItemRequest) -> AppResult<Option<ItemModel>>;

    async fn delete(&self, id: i32) -> AppResult<bool>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<OrderModel>>;

    async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<OrderModel>>;

    async fn get(&self, id: i32) -> AppResult<Option<OrderModel>>;

    /// Persists the header and all lines as one unit.
    async fn create(&self, order: NewOrder) -> AppResult<OrderModel>;

    async fn delete(&self, id: i32) -> AppResult<bool>;
}
