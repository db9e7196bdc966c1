use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod cli;
pub mod db;
pub mod extract;
pub mod routes;
pub mod store;

mod state;
pub use state::*;

use crate::{cli::Cli, store::Store};

fn cors_layer(args: &Cli) -> Result<CorsLayer, anyhow::Error> {
    Ok(match &args.cors_origin {
        None => CorsLayer::permissive(),
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE]),
    })
}

/// The whole HTTP surface: the API routes, the landing page and static
/// assets from `args.assets_dir`, and the request middleware
pub fn app(store: Arc<dyn Store>, args: &Cli) -> Result<Router, anyhow::Error> {
    let app = routes::router()
        .fallback_service(ServeDir::new(&args.assets_dir))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(cors_layer(args)?)
                .map_response(|res: axum::response::Response<_>| res.map(axum::body::Body::new))
                .layer(RequestBodyLimitLayer::new(args.max_body_bytes)),
        )
        .with_state(AppState::new(store));

    Ok(app)
}
