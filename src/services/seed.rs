use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{
    normalize_email, validate_email, CategoryRequest, DriverRequest, ItemRequest, NewUser,
    ProductRequest,
};
use crate::repository::{
    CategoryRepository, DriverRepository, ItemRepository, ProductRepository, UserRepository,
};
use crate::services::auth_service::hash_password;

const DEFAULT_CATALOG: &str = include_str!("../../seed/catalog.json");

/// Contents of a seed file. Every array is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    pub categories: Option<Vec<CategoryRequest>>,
    pub products: Option<Vec<SeedProduct>>,
    pub drivers: Option<Vec<DriverRequest>>,
    pub items: Option<Vec<ItemRequest>>,
    pub users: Option<Vec<SeedUser>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedProduct {
    pub brand: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub color: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_src: String,
    /// Category name, resolved after categories are inserted.
    #[serde(default)]
    pub category: Option<String>,
}

impl SeedProduct {
    fn to_request(&self, category_id: Option<i32>) -> ProductRequest {
        ProductRequest {
            brand: self.brand.clone(),
            model: self.model.clone(),
            year: self.year,
            color: self.color.clone(),
            price: self.price,
            image_src: self.image_src.clone(),
            category_id,
        }
    }
}

/// Demo account; the password is hashed on insert.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedUser {
    pub user_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl SeedUser {
    pub fn validate(&self) -> Result<(), String> {
        if self.user_name.trim().is_empty() {
            return Err("userName is required".to_string());
        }
        if self.password.is_empty() {
            return Err("password is required".to_string());
        }
        validate_email(&self.email)
    }
}

/// Rows inserted per table.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub categories: usize,
    pub products: usize,
    pub drivers: usize,
    pub items: usize,
    pub users: usize,
}

pub fn default_catalog() -> AppResult<SeedData> {
    serde_json::from_str(DEFAULT_CATALOG)
        .map_err(|e| AppError::Internal(format!("Embedded catalog is invalid: {}", e)))
}

pub struct Seeder {
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    products: Arc<dyn ProductRepository>,
    drivers: Arc<dyn DriverRepository>,
    items: Arc<dyn ItemRepository>,
}

impl Seeder {
    pub fn new(
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
        drivers: Arc<dyn DriverRepository>,
        items: Arc<dyn ItemRepository>,
    ) -> Self {
        Self {
            users,
            categories,
            products,
            drivers,
            items,
        }
    }

    /// Loads the embedded catalog into a fresh store. Does nothing once any
    /// user exists.
    pub async fn seed_defaults(&self) -> AppResult<Option<SeedReport>> {
        if !self.users.list().await?.is_empty() {
            tracing::debug!("Users present, skipping default seed");
            return Ok(None);
        }
        let report = self.apply(default_catalog()?).await?;
        tracing::info!("Default catalog seeded: {:?}", report);
        Ok(Some(report))
    }

    /// Reads and applies a seed file. Unreadable or malformed files are
    /// reported as invalid input.
    pub async fn load_file(&self, path: &Path) -> AppResult<SeedReport> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::InvalidInput(format!("Error loading data: {}: {}", path.display(), e))
        })?;
        let data: SeedData = serde_json::from_str(&raw)
            .map_err(|e| AppError::InvalidInput(format!("Error loading data: {}", e)))?;

        let report = self.apply(data).await?;
        tracing::info!("Seed file {} loaded: {:?}", path.display(), report);
        Ok(report)
    }

    /// Inserts each array only when its table is empty. Every row is
    /// validated before the first insert, so a bad file writes nothing.
    pub async fn apply(&self, data: SeedData) -> AppResult<SeedReport> {
        let categories = pending(data.categories, self.categories.list().await?.is_empty());
        let products = pending(data.products, self.products.list().await?.is_empty());
        let drivers = pending(data.drivers, self.drivers.list().await?.is_empty());
        let items = pending(data.items, self.items.list().await?.is_empty());
        let users = pending(data.users, self.users.list().await?.is_empty());

        for category in &categories {
            category.validate().map_err(AppError::InvalidInput)?;
        }
        for product in &products {
            product.to_request(None).validate().map_err(AppError::InvalidInput)?;
        }
        for driver in &drivers {
            driver.validate().map_err(AppError::InvalidInput)?;
        }
        for item in &items {
            item.validate().map_err(AppError::InvalidInput)?;
        }
        let users = prepare_users(users)?;

        let mut report = SeedReport::default();
        for category in &categories {
            self.categories.create(category).await?;
            report.categories += 1;
        }

        if !products.is_empty() {
            let known = self.categories.list().await?;
            for product in &products {
                let category_id = product.category.as_ref().and_then(|name| {
                    let found = known
                        .iter()
                        .find(|c| c.name.eq_ignore_ascii_case(name))
                        .map(|c| c.id);
                    if found.is_none() {
                        tracing::warn!("Seed product references unknown category {}", name);
                    }
                    found
                });
                self.products.create(&product.to_request(category_id)).await?;
                report.products += 1;
            }
        }

        for driver in &drivers {
            self.drivers.create(driver).await?;
            report.drivers += 1;
        }
        for item in &items {
            self.items.create(item).await?;
            report.items += 1;
        }
        for user in users {
            self.users.create(user).await?;
            report.users += 1;
        }

        Ok(report)
    }
}

/// Rows to insert: none when the file omits the array or the table already has rows.
fn pending<T>(rows: Option<Vec<T>>, table_empty: bool) -> Vec<T> {
    rows.filter(|_| table_empty).unwrap_or_default()
}

/// Validates seed users and hashes their passwords. Repeated emails are rejected.
fn prepare_users(users: Vec<SeedUser>) -> AppResult<Vec<NewUser>> {
    let mut seen = HashSet::new();
    let mut prepared = Vec::with_capacity(users.len());
    for user in users {
        user.validate().map_err(AppError::InvalidInput)?;
        let email = normalize_email(&user.email);
        if !seen.insert(email.clone()) {
            return Err(AppError::InvalidInput(format!(
                "Seed file repeats user email {}",
                email
            )));
        }
        prepared.push(NewUser {
            user_name: user.user_name.trim().to_string(),
            email,
            password_hash: hash_password(&user.password)?,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
        });
    }
    Ok(prepared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;
    use crate::services::auth_service::verify_password;

    fn seeder(store: &MemoryStore) -> Seeder {
        Seeder::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        )
    }

    #[test]
    fn test_default_catalog_parses() {
        let catalog = default_catalog().unwrap();
        assert_eq!(catalog.categories.unwrap().len(), 3);
        assert_eq!(catalog.products.unwrap().len(), 30);
        assert_eq!(catalog.drivers.unwrap().len(), 22);
        assert_eq!(catalog.items.unwrap().len(), 10);
        assert_eq!(catalog.users.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_seed_defaults_runs_once() {
        let store = MemoryStore::new();
        let seeder = seeder(&store);

        let report = seeder.seed_defaults().await.unwrap().unwrap();
        assert_eq!(
            report,
            SeedReport {
                categories: 3,
                products: 30,
                drivers: 22,
                items: 10,
                users: 2,
            }
        );
        assert!(seeder.seed_defaults().await.unwrap().is_none());

        let product = ProductRepository::get(&store, 1).await.unwrap().unwrap();
        assert_eq!(product.category_name.as_deref(), Some("Vehicles"));

        let john = store.find_by_email("john@example.com").await.unwrap().unwrap();
        assert!(verify_password("password123", &john.password_hash));
    }

    #[tokio::test]
    async fn test_apply_skips_populated_tables() {
        let store = MemoryStore::new();
        let seeder = seeder(&store);
        ItemRepository::create(
            &store,
            &ItemRequest {
                name: "Existing".into(),
                description: String::new(),
                price: Decimal::ONE,
                image_src: String::new(),
            },
        )
        .await
        .unwrap();

        let data: SeedData = serde_json::from_value(serde_json::json!({
            "drivers": [{
                "name": "Dror", "age": 66, "experienceYears": 22,
                "rating": 4.0, "pricePerHour": 378, "imageSrc": ""
            }],
            "items": [{ "name": "Cup holder", "description": "", "price": 30, "imageSrc": "" }]
        }))
        .unwrap();

        let report = seeder.apply(data).await.unwrap();
        assert_eq!(report.drivers, 1);
        assert_eq!(report.items, 0);
        assert_eq!(ItemRepository::list(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_load_file_missing_is_invalid_input() {
        let store = MemoryStore::new();
        let err = seeder(&store)
            .load_file(Path::new("/nonexistent/data.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_invalid_row_writes_nothing() {
        let store = MemoryStore::new();
        let seeder = seeder(&store);

        let data: SeedData = serde_json::from_value(serde_json::json!({
            "categories": [{ "name": "Vehicles" }],
            "products": [
                { "brand": "Toyota", "model": "Camry", "year": 2020, "price": 350 },
                { "brand": "", "model": "Ghost", "year": 2020, "price": 100 }
            ]
        }))
        .unwrap();
        let err = seeder.apply(data).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(CategoryRepository::list(&store).await.unwrap().is_empty());
        assert!(ProductRepository::list(&store).await.unwrap().is_empty());

        // The tables are still empty, so a corrected file loads.
        let data: SeedData = serde_json::from_value(serde_json::json!({
            "products": [{ "brand": "Toyota", "model": "Camry", "year": 2020, "price": 350 }]
        }))
        .unwrap();
        assert_eq!(seeder.apply(data).await.unwrap().products, 1);
    }

    #[tokio::test]
    async fn test_repeated_user_email_writes_nothing() {
        let store = MemoryStore::new();
        let seeder = seeder(&store);

        let data: SeedData = serde_json::from_value(serde_json::json!({
            "items": [{ "name": "Cup holder", "price": 30 }],
            "users": [
                { "userName": "john", "email": "john@example.com", "password": "pw" },
                { "userName": "john2", "email": "John@Example.com", "password": "pw" }
            ]
        }))
        .unwrap();
        let err = seeder.apply(data).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref m) if m.contains("john@example.com")));
        assert!(UserRepository::list(&store).await.unwrap().is_empty());
        assert!(ItemRepository::list(&store).await.unwrap().is_empty());
    }
}
