use crate::{handlers, AppState};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// CORS restricted to the configured frontend origin, with credentials.
/// Other origins get no `access-control-allow-origin` header at all.
pub fn build_cors_layer(frontend_url: &str) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = frontend_url.trim_end_matches('/').parse()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]))
}

pub fn build_router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let cors = build_cors_layer(&state.config.frontend_url)?;
    let audio_limit = DefaultBodyLimit::max(state.config.max_audio_request_bytes());

    // Declared paths hit with another method get the same 404 as unknown paths.
    let api = Router::new()
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::not_found),
        )
        .route(
            "/characters",
            get(handlers::characters::list_characters)
                .post(handlers::characters::create_character)
                .fallback(handlers::not_found),
        )
        .route(
            "/characters/:id",
            delete(handlers::characters::delete_character).fallback(handlers::not_found),
        )
        .route(
            "/evaluate-pronunciation",
            post(handlers::pronunciation::evaluate_pronunciation)
                .fallback(handlers::not_found)
                .layer(audio_limit),
        )
        .route(
            "/generate-sentences",
            post(handlers::sentences::generate_sentences).fallback(handlers::not_found),
        )
        .route(
            "/speak/:text",
            get(handlers::speak).fallback(handlers::not_found),
        );

    Ok(Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(state.config.max_json_body_bytes()))
        .layer(CatchPanicLayer::custom(handlers::handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
