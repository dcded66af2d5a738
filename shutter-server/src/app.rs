//! Router assembly and shared request state.

use axum::response::Html;
use axum::routing::{delete, get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::CorsLayer;

use crate::api;
use crate::images;
use crate::model::Database;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub uploads_dir: PathBuf,
}

async fn index() -> Html<&'static str> {
    Html("<p>Photo-sharing API. JSON endpoints live under <code>/api</code>.</p>")
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/images/:file_name", get(images::get_image))
        .route("/images", post(images::upload_image))
        .route("/api/post-count", get(api::post_count))
        .route("/api/posts", get(api::list_posts).post(api::create_post))
        .route(
            "/api/posts/:id",
            get(api::get_post).delete(api::delete_post),
        )
        .route("/api/posts/:id/like", post(api::like_post))
        .route("/api/comments", post(api::create_comment))
        .route("/api/comments/:id", delete(api::delete_comment))
        .route("/api/users", get(api::list_users).post(api::create_user))
        .route("/api/users/:id", get(api::get_user))
        .route("/api/me", get(api::me).patch(api::update_user))
        .route("/api/login", post(api::login))
        .route("/api/logout", post(api::logout))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
