use axum::{
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;

pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .merge(user_public_routes())
        // Protected API
        .merge(user_routes())
        .merge(todo_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn user_public_routes() -> Router {
    use handlers::public::users;

    Router::new()
        .route("/users", post(users::register))
        .route("/users/login", post(users::login))
}

fn user_routes() -> Router {
    use handlers::protected::users;

    Router::new()
        .route("/users/me", get(users::whoami))
        .route("/users/me/token", delete(users::logout))
        .route_layer(axum::middleware::from_fn(middleware::require_auth))
}

fn todo_routes() -> Router {
    use handlers::protected::todos;

    Router::new()
        // Collection operations
        .route(
            "/todos",
            post(todos::collection_post).get(todos::collection_get),
        )
        // Record operations (individual)
        .route(
            "/todos/:id",
            get(todos::record_get)
                .patch(todos::record_patch)
                .delete(todos::record_delete),
        )
        .route_layer(axum::middleware::from_fn(middleware::require_auth))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Todo API (Rust)",
        "version": version,
        "description": "Todo list REST API with revocable token auth",
        "endpoints": {
            "home": "/ (public)",
            "users": "POST /users, POST /users/login (public - token acquisition)",
            "me": "GET /users/me, DELETE /users/me/token (protected, x-auth header)",
            "todos": "/todos[/:id] (protected, x-auth header)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
