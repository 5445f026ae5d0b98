#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
};
use composition_api::{
    Composition, CompositionCreate, CompositionStore, MealType, app, migration::Migrator,
};
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

pub fn setup_test_app(db: &DatabaseConnection) -> Router {
    app::build_router(db)
}

pub fn new_composition(name: &str, meal_type: MealType, calories: i32) -> CompositionCreate {
    CompositionCreate {
        name: Some(name.to_string()),
        meal_type: Some(meal_type.to_string()),
        calories,
        created: None,
    }
}

/// Insert the given rows in one save and return them as stored.
pub async fn seed(db: &DatabaseConnection, rows: &[(&str, MealType, i32)]) -> Vec<Composition> {
    let mut store = CompositionStore::new(db);
    for (name, meal_type, calories) in rows {
        store
            .add(new_composition(name, *meal_type, *calories))
            .expect("seed row should be valid");
    }
    store.save().await.expect("seed should save").persisted
}

/// A small catalog with two compositions per course.
pub async fn seed_menu(db: &DatabaseConnection) -> Vec<Composition> {
    seed(
        db,
        &[
            ("Tomato soup", MealType::Starter, 120),
            ("Caesar salad", MealType::Starter, 350),
            ("Beef stew", MealType::Main, 780),
            ("Mushroom risotto", MealType::Main, 640),
            ("Apple pie", MealType::Dessert, 410),
            ("Chocolate mousse", MealType::Dessert, 512),
        ],
    )
    .await
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send a request and decode the body as JSON; an empty body becomes `Value::Null`.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };
    (status, headers, json)
}

pub fn ids(items: &Value) -> Vec<i64> {
    items
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|item| item["id"].as_i64().expect("item should have an id"))
        .collect()
}
