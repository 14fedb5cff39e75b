use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Groups
        .route("/groups", post(handlers::create_group))
        .route(
            "/groups/:group_id",
            get(handlers::get_group).delete(handlers::delete_group),
        )
        .route(
            "/groups/:group_id/members",
            post(handlers::join_group).delete(handlers::leave_group),
        )
        // Movies
        .route(
            "/groups/:group_id/movies",
            get(handlers::list_movies).post(handlers::add_movie),
        )
        .route(
            "/groups/:group_id/movies/:movie_id",
            delete(handlers::remove_movie),
        )
        .route(
            "/groups/:group_id/movies/:movie_id/opinion",
            put(handlers::set_opinion),
        )
        // Spinning
        .route("/groups/:group_id/reel", get(handlers::reel))
        .route("/groups/:group_id/spin", post(handlers::spin))
        // Watch history
        .route(
            "/groups/:group_id/movies/:movie_id/watched",
            post(handlers::mark_watched).delete(handlers::unwatch),
        )
        .route(
            "/groups/:group_id/movies/:movie_id/rating",
            put(handlers::rate_movie),
        )
        .route("/groups/:group_id/history", get(handlers::watch_history))
        .route("/groups/:group_id/stats", get(handlers::stats))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
}
