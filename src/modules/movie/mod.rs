use crate::state::AppState;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

pub mod dto;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

pub fn router(state: AppState) -> Router<AppState> {
    // `/movies/most-viewed` must be registered alongside `/movies/{id}`;
    // axum routes the literal segment before the capture.
    let public_routes = Router::new()
        .route("/movies", get(handler::list_movies))
        .route("/movies/most-viewed", get(handler::most_viewed))
        .route("/movies/{id}", get(handler::get_movie));

    let protected_routes = Router::new()
        .route("/movies", post(handler::create_movie))
        .route(
            "/movies/{id}",
            axum::routing::put(handler::update_movie).delete(handler::delete_movie),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth::auth_middleware,
        ));

    public_routes.merge(protected_routes)
}
