pub mod auth_service;
pub mod order_service;
pub mod seed;

pub use auth_service::{AuthService, Claims, JwtKeys};
pub use order_service::OrderService;
pub use seed::{SeedReport, Seeder};
