use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{
    CategoryModel, CategoryRequest, DriverModel, DriverRequest, ItemModel, ItemRequest,
    ProductModel, ProductRequest,
};
use crate::repository::{CategoryRepository, DriverRepository, ItemRepository, ProductRepository};

use super::{constraint_error, PgStore};

const PRODUCT_SELECT: &str = "SELECT p.id, p.brand, p.model, p.year, p.color, p.price, p.image_src, \
     p.category_id, c.name AS category_name \
     FROM products p LEFT JOIN categories c ON c.id = p.category_id";

const UNKNOWN_CATEGORY: &str = "Category not found";

#[async_trait]
impl CategoryRepository for PgStore {
    async fn list(&self) -> AppResult<Vec<CategoryModel>> {
        let categories = sqlx::query_as("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    async fn get(&self, id: i32) -> AppResult<Option<CategoryModel>> {
        let category = sqlx::query_as("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    async fn create(&self, req: &CategoryRequest) -> AppResult<CategoryModel> {
        let category = sqlx::query_as("INSERT INTO categories (name) VALUES ($1) RETURNING id, name")
            .bind(&req.name)
            .fetch_one(&self.pool)
            .await?;
        Ok(category)
    }

    async fn update(&self, id: i32, req: &CategoryRequest) -> AppResult<Option<CategoryModel>> {
        let category =
            sqlx::query_as("UPDATE categories SET name = $1 WHERE id = $2 RETURNING id, name")
                .bind(&req.name)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(category)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}

#[async_trait]
impl ProductRepository for PgStore {
    async fn list(&self) -> AppResult<Vec<ProductModel>> {
        let products = sqlx::query_as(&format!("{} ORDER BY p.id", PRODUCT_SELECT))
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn list_by_category(&self, category_id: i32) -> AppResult<Vec<ProductModel>> {
        let products = sqlx::query_as(&format!(
            "{} WHERE p.category_id = $1 ORDER BY p.id",
            PRODUCT_SELECT
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn find_many(&self, ids: &[i32]) -> AppResult<Vec<ProductModel>> {
        let products = sqlx::query_as(&format!("{} WHERE p.id = ANY($1)", PRODUCT_SELECT))
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn get(&self, id: i32) -> AppResult<Option<ProductModel>> {
        let product = sqlx::query_as(&format!("{} WHERE p.id = $1", PRODUCT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn create(&self, req: &ProductRequest) -> AppResult<ProductModel> {
        sqlx::query_as(
            "WITH p AS ( \
                 INSERT INTO products (brand, model, year, color, price, image_src, category_id) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING * \
             ) \
             SELECT p.id, p.brand, p.model, p.year, p.color, p.price, p.image_src, \
             p.category_id, c.name AS category_name \
             FROM p LEFT JOIN categories c ON c.id = p.category_id",
        )
        .bind(&req.brand)
        .bind(&req.model)
        .bind(req.year)
        .bind(&req.color)
        .bind(req.price)
        .bind(&req.image_src)
        .bind(req.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| constraint_error(e, "Product already exists", UNKNOWN_CATEGORY))
    }

    async fn update(&self, id: i32, req: &ProductRequest) -> AppResult<Option<ProductModel>> {
        sqlx::query_as(
            "WITH p AS ( \
                 UPDATE products SET brand = $1, model = $2, year = $3, color = $4, price = $5, \
                 image_src = $6, category_id = $7 WHERE id = $8 RETURNING * \
             ) \
             SELECT p.id, p.brand, p.model, p.year, p.color, p.price, p.image_src, \
             p.category_id, c.name AS category_name \
             FROM p LEFT JOIN categories c ON c.id = p.category_id",
        )
        .bind(&req.brand)
        .bind(&req.model)
        .bind(req.year)
        .bind(&req.color)
        .bind(req.price)
        .bind(&req.image_src)
        .bind(req.category_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| constraint_error(e, "Product already exists", UNKNOWN_CATEGORY))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}

const DRIVER_COLUMNS: &str = "id, name, age, experience_years, rating, price_per_hour, image_src";

#[async_trait]
impl DriverRepository for PgStore {
    async fn list(&self) -> AppResult<Vec<DriverModel>> {
        let drivers = sqlx::query_as(&format!("SELECT {} FROM drivers ORDER BY id", DRIVER_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        Ok(drivers)
    }

    async fn find_many(&self, ids: &[i32]) -> AppResult<Vec<DriverModel>> {
        let drivers = sqlx::query_as(&format!(
            "SELECT {} FROM drivers WHERE id = ANY($1)",
            DRIVER_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(drivers)
    }

    async fn get(&self, id: i32) -> AppResult<Option<DriverModel>> {
        let driver = sqlx::query_as(&format!(
            "SELECT {} FROM drivers WHERE id = $1",
            DRIVER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(driver)
    }

    async fn create(&self, req: &DriverRequest) -> AppResult<DriverModel> {
        let driver = sqlx::query_as(&format!(
            "INSERT INTO drivers (name, age, experience_years, rating, price_per_hour, image_src) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            DRIVER_COLUMNS
        ))
        .bind(&req.name)
        .bind(req.age)
        .bind(req.experience_years)
        .bind(req.rating)
        .bind(req.price_per_hour)
        .bind(&req.image_src)
        .fetch_one(&self.pool)
        .await?;
        Ok(driver)
    }

    async fn update(&self, id: i32, req: &DriverRequest) -> AppResult<Option<DriverModel>> {
        let driver = sqlx::query_as(&format!(
            "UPDATE drivers SET name = $1, age = $2, experience_years = $3, rating = $4, \
             price_per_hour = $5, image_src = $6 WHERE id = $7 RETURNING {}",
            DRIVER_COLUMNS
        ))
        .bind(&req.name)
        .bind(req.age)
        .bind(req.experience_years)
        .bind(req.rating)
        .bind(req.price_per_hour)
        .bind(&req.image_src)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(driver)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}

#[async_trait]
impl ItemRepository for PgStore {
    async fn list(&self) -> AppResult<Vec<ItemModel>> {
        let items =
            sqlx::query_as("SELECT id, name, description, price, image_src FROM items ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(items)
    }

    async fn find_many(&self, ids: &[i32]) -> AppResult<Vec<ItemModel>> {
        let items = sqlx::query_as(
            "SELECT id, name, description, price, image_src FROM items WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn get(&self, id: i32) -> AppResult<Option<ItemModel>> {
        let item =
            sqlx::query_as("SELECT id, name, description, price, image_src FROM items WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(item)
    }

    async fn create(&self, req: &ItemRequest) -> AppResult<ItemModel> {
        let item = sqlx::query_as(
            "INSERT INTO items (name, description, price, image_src) VALUES ($1, $2, $3, $4) \
             RETURNING id, name, description, price, image_src",
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.price)
        .bind(&req.image_src)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    async fn update(&self, id: i32, req: &ItemRequest) -> AppResult<Option<ItemModel>> {
        let item = sqlx::query_as(
            "UPDATE items SET name = $1, description = $2, price = $3, image_src = $4 \
             WHERE id = $5 RETURNING id, name, description, price, image_src",
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.price)
        .bind(&req.image_src)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}
