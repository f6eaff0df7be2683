use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::repository::{
    CategoryRepository, DriverRepository, ItemRepository, MemoryStore, OrderRepository, PgStore,
    ProductRepository, UserRepository,
};
use crate::services::{AuthService, JwtKeys, OrderService, Seeder};

/// Everything a handler needs, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub drivers: Arc<dyn DriverRepository>,
    pub items: Arc<dyn ItemRepository>,
    pub auth: Arc<AuthService>,
    pub orders: Arc<OrderService>,
    pub seeder: Arc<Seeder>,
}

impl AppState {
    /// Wires every repository to the same backing store.
    pub fn from_store<S>(config: Config, store: S) -> Self
    where
        S: UserRepository
            + CategoryRepository
            + ProductRepository
            + DriverRepository
            + ItemRepository
            + OrderRepository
            + 'static,
    {
        let store = Arc::new(store);
        let users: Arc<dyn UserRepository> = store.clone();
        let categories: Arc<dyn CategoryRepository> = store.clone();
        let products: Arc<dyn ProductRepository> = store.clone();
        let drivers: Arc<dyn DriverRepository> = store.clone();
        let items: Arc<dyn ItemRepository> = store.clone();
        let orders: Arc<dyn OrderRepository> = store;

        let keys = JwtKeys::from_config(&config);
        let auth = AuthService::new(users.clone(), keys);
        let order_service = OrderService::new(
            orders,
            products.clone(),
            drivers.clone(),
            items.clone(),
        );
        let seeder = Seeder::new(
            users.clone(),
            categories.clone(),
            products.clone(),
            drivers.clone(),
            items.clone(),
        );

        Self {
            config: Arc::new(config),
            users,
            categories,
            products,
            drivers,
            items,
            auth: Arc::new(auth),
            orders: Arc::new(order_service),
            seeder: Arc::new(seeder),
        }
    }

    pub fn in_memory(config: Config) -> Self {
        Self::from_store(config, MemoryStore::new())
    }

    pub fn postgres(config: Config, pool: PgPool) -> Self {
        Self::from_store(config, PgStore::new(pool))
    }

    pub fn keys(&self) -> &JwtKeys {
        self.auth.keys()
    }
}
