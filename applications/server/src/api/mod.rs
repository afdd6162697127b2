/// API route modules and router assembly
pub mod admin;
pub mod auth;
pub mod favorites;
pub mod health;
pub mod history;
mod json;
pub mod playlists;
pub mod songs;
pub mod stream;
pub mod upload;

pub use json::ApiJson;

use crate::{config::ServerConfig, error::ServerError, middleware, state::AppState};
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, Request, StatusCode},
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceExt;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full application router
pub fn create_router(app_state: AppState, config: &ServerConfig) -> Router {
    let upload_limit = config.upload.max_body_bytes();

    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout));

    // Protected routes (session required)
    let protected_routes = Router::new()
        .route("/me", get(auth::me))
        // Songs
        .route("/songs", get(songs::list_songs))
        .route("/songs/:id", delete(songs::delete_song))
        .route("/upload", post(upload::upload).layer(DefaultBodyLimit::max(upload_limit)))
        .route("/play/:filename", get(stream::play))
        // Playlists
        .route(
            "/playlists",
            get(playlists::list_playlists).post(playlists::create_playlist),
        )
        .route("/playlists/:id", delete(playlists::delete_playlist))
        .route("/playlists/:id/songs", get(playlists::list_playlist_songs))
        .route(
            "/playlists/:id/songs/:song_id",
            post(playlists::add_song).delete(playlists::remove_song),
        )
        // Favorites and history
        .route("/favorites", get(favorites::list_favorites))
        .route(
            "/favorites/:id",
            post(favorites::add_favorite).delete(favorites::remove_favorite),
        )
        .route("/history", get(history::list_history))
        // Admin
        .route(
            "/admin/songs",
            get(admin::list_songs)
                .post(admin::upload_songs)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/admin/songs/reorder", post(admin::reorder_songs))
        .route(
            "/admin/songs/:id",
            delete(admin::delete_song).patch(admin::update_song),
        )
        .route("/admin/stats", get(admin::stats))
        .route("/admin/stats/top", get(admin::top_songs))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:id", delete(admin::delete_user))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::session_middleware,
        ));

    let api_routes = public_routes
        .merge(protected_routes)
        .fallback(|| async { ServerError::NotFound("No such endpoint".to_string()) });

    // Static file serving for the web shell (SPA with fallback to index.html)
    let web_dir = config.server.web_dir.clone();
    let spa_fallback = move |req: Request<Body>| {
        let web_dir = web_dir.clone();
        async move {
            // Try to serve the file directly
            let path = req.uri().path().trim_start_matches('/');
            let file_path = web_dir.join(path);

            if !path.is_empty() && file_path.is_file() {
                return match ServeDir::new(&web_dir).oneshot(req).await {
                    Ok(res) => res.into_response(),
                    Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                };
            }

            match tokio::fs::read(web_dir.join("index.html")).await {
                Ok(contents) => (
                    [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                    contents,
                )
                    .into_response(),
                // No web shell available
                Err(_) => StatusCode::NOT_FOUND.into_response(),
            }
        }
    };

    Router::new()
        .nest("/api", api_routes)
        .fallback(spa_fallback)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
