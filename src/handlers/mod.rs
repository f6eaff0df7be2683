pub mod auth;
pub mod categories;
pub mod drivers;
pub mod health;
pub mod items;
pub mod orders;
pub mod products;
pub mod seed;
pub mod users;

use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::AuthLayer;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/auth/update", put(auth::update))
        .route("/users", get(users::list))
        .route("/users/register", post(auth::register))
        .route("/users/login", post(auth::login))
        .route(
            "/users/:id",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/:id",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/category/:category_id",
            get(products::list_by_category),
        )
        .route(
            "/products/:id",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/drivers", get(drivers::list).post(drivers::create))
        .route(
            "/drivers/:id",
            get(drivers::get).put(drivers::update).delete(drivers::delete),
        )
        .route("/items", get(items::list).post(items::create))
        .route(
            "/items/:id",
            get(items::get).put(items::update).delete(items::delete),
        )
        .route("/orders", get(orders::list).post(orders::create))
        .route("/orders/user", get(orders::list_for_user))
        .route("/orders/:id", get(orders::get).delete(orders::delete))
        .route("/seed/load-data", post(seed::load_data));

    let auth_layer = AuthLayer::new(state.keys().clone());
    let cors = cors_layer(&state.config.cors_origin);

    Router::new()
        .route("/health", get(health::check))
        .nest("/api", api)
        .layer(auth_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new().allow_headers(Any).allow_methods(Any);
    if origin == "*" {
        return cors.allow_origin(Any);
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => cors.allow_origin(value),
        Err(_) => {
            tracing::warn!("Invalid CORS_ORIGIN {:?}, allowing any origin", origin);
            cors.allow_origin(Any)
        }
    }
}
