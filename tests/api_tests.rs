use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rstest::rstest;
use serde_json::{json, Value};
use tower::ServiceExt;

use rental_shop::handlers::create_router;
use rental_shop::{AppState, Config};

fn app() -> Router {
    create_router(AppState::in_memory(Config::for_tests()))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register(app: &Router, email: &str) -> (i64, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "userName": "john_doe",
            "email": email,
            "password": "password123",
            "firstName": "John",
            "lastName": "Doe"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    (
        body["user"]["id"].as_i64().unwrap(),
        body["token"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn health_reports_serving() {
    let (status, body) = send(&app(), "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SERVING");
}

#[tokio::test]
async fn register_login_and_me() {
    let app = app();
    let (id, _) = register(&app, "john@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users/login",
        None,
        Some(json!({ "email": "john@example.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["user"].get("passwordHash").is_none());
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = send(&app, "GET", "/api/auth/me", Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"].as_i64(), Some(id));
    assert_eq!(me["email"], "john@example.com");
}

#[tokio::test]
async fn duplicate_registration_rejected() {
    let app = app();
    register(&app, "jane@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "userName": "other", "email": "jane@example.com", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User with this email already exists");
}

#[tokio::test]
async fn wrong_password_rejected() {
    let app = app();
    register(&app, "jane@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "jane@example.com", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn order_total_is_sum_of_lines() {
    let app = app();
    let (user_id, token) = register(&app, "john@example.com").await;

    let (status, car) = send(
        &app,
        "POST",
        "/api/products",
        None,
        Some(json!({
            "brand": "Toyota", "model": "Camry", "year": 2020,
            "color": "Blue", "price": 350, "imageSrc": "/img/25.jfif"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(car["name"], "Toyota Camry");

    let (_, driver) = send(
        &app,
        "POST",
        "/api/drivers",
        None,
        Some(json!({ "name": "Moshe", "age": 59, "experienceYears": 37, "rating": 4.2, "pricePerHour": 347 })),
    )
    .await;
    let (_, item) = send(
        &app,
        "POST",
        "/api/items",
        None,
        Some(json!({ "name": "Cup holder", "price": 30 })),
    )
    .await;

    let (status, order) = send(
        &app,
        "POST",
        "/api/orders",
        Some(token.as_str()),
        Some(json!({
            "items": [
                { "productId": car["id"], "quantity": 2, "itemType": "car" },
                { "productId": driver["id"], "quantity": 3, "itemType": "DRIVER" },
                { "productId": item["id"], "quantity": 1, "itemType": "item" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", order);
    // 2 * 350 + 3 * 347 + 30
    assert_eq!(order["totalAmount"].as_f64(), Some(1771.0));
    assert_eq!(order["paymentStatus"], "paid");
    assert_eq!(order["userId"].as_i64(), Some(user_id));
    assert_eq!(order["items"][0]["productName"], "Toyota Camry");
    assert_eq!(order["items"][1]["productName"], "Moshe");

    let (status, mine) = send(&app, "GET", "/api/orders/user", Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn order_with_unknown_type_creates_nothing() {
    let app = app();
    let (_, token) = register(&app, "john@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(token.as_str()),
        Some(json!({ "items": [{ "productId": 1, "quantity": 1, "itemType": "boat" }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid item type: boat");

    let (_, orders) = send(&app, "GET", "/api/orders", None, None).await;
    assert!(orders.as_array().unwrap().is_empty());
}

#[rstest]
#[case("POST", "/api/orders")]
#[case("GET", "/api/orders/user")]
#[case("GET", "/api/auth/me")]
#[tokio::test]
async fn protected_routes_require_token(#[case] method: &str, #[case] uri: &str) {
    let body = (method == "POST").then(|| json!({ "items": [] }));
    let (status, _) = send(&app(), method, uri, None, body.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app(), method, uri, Some("garbage"), body).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case("/api/products/999")]
#[case("/api/drivers/999")]
#[case("/api/items/999")]
#[case("/api/categories/999")]
#[case("/api/users/999")]
#[case("/api/orders/999")]
#[tokio::test]
async fn deleting_missing_entity_is_not_found(#[case] uri: &str) {
    let (status, body) = send(&app(), "DELETE", uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().ends_with("not found"));
}

#[tokio::test]
async fn category_crud_and_product_filter() {
    let app = app();
    let (status, category) = send(
        &app,
        "POST",
        "/api/categories",
        None,
        Some(json!({ "name": "Vehicles" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/products",
        None,
        Some(json!({
            "brand": "Audi", "model": "A3", "year": 2015, "price": 488,
            "categoryId": category_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/products",
        None,
        Some(json!({ "brand": "Audi", "model": "A4", "year": 2014, "price": 460, "categoryId": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/products/category/{}", category_id);
    let (_, products) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(products.as_array().unwrap().len(), 1);
    assert_eq!(products[0]["categoryName"], "Vehicles");

    let (status, renamed) = send(
        &app,
        "PUT",
        &format!("/api/categories/{}", category_id),
        None,
        Some(json!({ "name": "Cars" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Cars");

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/categories/{}", category_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn load_data_from_seed_file() {
    let path = std::env::temp_dir().join(format!("rental-shop-seed-{}.json", std::process::id()));
    std::fs::write(
        &path,
        json!({
            "items": [{ "name": "Mini fridge", "description": "Compact", "price": 400, "imageSrc": "" }]
        })
        .to_string(),
    )
    .unwrap();

    let mut config = Config::for_tests();
    config.seed_file = path.clone();
    let app = create_router(AppState::in_memory(config));

    let (status, body) = send(&app, "POST", "/api/seed/load-data", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Data loaded successfully!");
    assert_eq!(body["inserted"]["items"], 1);

    // Second load finds the table populated.
    let (_, body) = send(&app, "POST", "/api/seed/load-data", None, None).await;
    assert_eq!(body["inserted"]["items"], 0);

    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn load_data_missing_file_is_bad_request() {
    let mut config = Config::for_tests();
    config.seed_file = "/nonexistent/data.json".into();
    let app = create_router(AppState::in_memory(config));

    let (status, body) = send(&app, "POST", "/api/seed/load-data", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Error loading data"));
}

#[tokio::test]
async fn email_uniqueness_ignores_case() {
    let app = app();
    register(&app, "John@Example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "userName": "other", "email": "john@example.com", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User with this email already exists");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "JOHN@example.COM", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "john@example.com");
}

#[rstest]
#[case("/api/products", json!({ "brand": "Rolls", "model": "Ghost", "year": 2020, "price": 1e17 }))]
#[case("/api/items", json!({ "name": "Gold trim", "price": 10000000000000000u64 }))]
#[case("/api/items", json!({ "name": "Cup holder", "price": 30.005 }))]
#[case("/api/drivers", json!({ "name": "Moshe", "age": 59, "experienceYears": 37, "rating": 4.2, "pricePerHour": 1e20 }))]
#[tokio::test]
async fn out_of_range_prices_rejected(#[case] uri: &str, #[case] body: Value) {
    let app = app();
    let (status, _) = send(&app, "POST", uri, None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = send(&app, "GET", uri, None, None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn profile_update_via_users_and_auth_routes() {
    let app = app();
    register(&app, "jane@example.com").await;
    let (id, token) = register(&app, "john@example.com").await;

    let update = |email: &str| {
        json!({ "userName": "john_doe", "email": email, "firstName": "Johnny", "lastName": "Doe" })
    };

    let (status, body) = send(
        &app,
        "PUT",
        "/api/auth/update",
        Some(token.as_str()),
        Some(update("John.Doe@Example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["id"].as_i64(), Some(id));
    assert_eq!(body["firstName"], "Johnny");
    assert_eq!(body["email"], "john.doe@example.com");

    let (status, body) = send(
        &app,
        "PUT",
        "/api/auth/update",
        Some(token.as_str()),
        Some(update("Jane@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User with this email already exists");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{}", id),
        None,
        Some(update("jane@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User with this email already exists");

    let (status, _) = send(&app, "PUT", "/api/auth/update", None, Some(update("x@example.com"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, me) = send(&app, "GET", "/api/auth/me", Some(token.as_str()), None).await;
    assert_eq!(me["email"], "john.doe@example.com");
}

#[tokio::test]
async fn product_update_with_unknown_category_rejected() {
    let app = app();
    let (_, car) = send(
        &app,
        "POST",
        "/api/products",
        None,
        Some(json!({ "brand": "Audi", "model": "A3", "year": 2015, "price": 488 })),
    )
    .await;
    let uri = format!("/api/products/{}", car["id"]);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        None,
        Some(json!({ "brand": "Audi", "model": "A3", "year": 2015, "price": 500, "categoryId": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Category with ID 999 not found");

    let (status, unchanged) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged["price"].as_f64(), Some(488.0));
}

#[tokio::test]
async fn get_order_by_id() {
    let app = app();
    let (user_id, token) = register(&app, "john@example.com").await;
    let (_, item) = send(
        &app,
        "POST",
        "/api/items",
        None,
        Some(json!({ "name": "Phone holder", "price": 75.5, "imageSrc": "/img/items/2.jpg" })),
    )
    .await;

    let (_, created) = send(
        &app,
        "POST",
        "/api/orders",
        Some(token.as_str()),
        Some(json!({ "items": [{ "productId": item["id"], "quantity": 2, "itemType": "item" }] })),
    )
    .await;

    let (status, order) = send(&app, "GET", &format!("/api/orders/{}", created["id"]), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["id"], created["id"]);
    assert_eq!(order["userId"].as_i64(), Some(user_id));
    assert_eq!(order["totalAmount"].as_f64(), Some(151.0));
    assert_eq!(order["items"][0]["productName"], "Phone holder");
    assert_eq!(order["items"][0]["productImage"], "/img/items/2.jpg");
    assert_eq!(order["items"][0]["quantity"], 2);
}

#[tokio::test]
async fn invalid_seed_file_writes_nothing() {
    let path = std::env::temp_dir().join(format!("rental-shop-bad-seed-{}.json", std::process::id()));
    std::fs::write(
        &path,
        json!({
            "items": [
                { "name": "Mini fridge", "price": 400 },
                { "name": "Broken", "price": -1 }
            ]
        })
        .to_string(),
    )
    .unwrap();

    let mut config = Config::for_tests();
    config.seed_file = path.clone();
    let app = create_router(AppState::in_memory(config));

    let (status, _) = send(&app, "POST", "/api/seed/load-data", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, items) = send(&app, "GET", "/api/items", None, None).await;
    assert!(items.as_array().unwrap().is_empty());

    std::fs::remove_file(&path).ok();
}
