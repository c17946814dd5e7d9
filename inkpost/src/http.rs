use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{api::router::ApiRoutes, app_state::SharedAppState};

fn cors_layer(app_state: &SharedAppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = app_state
        .settings
        .api
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
}

#[cfg(feature = "telemetry")]
fn with_telemetry(app: Router, telemetry_enabled: bool) -> Router {
    use axum_tracing_opentelemetry::middleware::{OtelAxumLayer, OtelInResponseLayer};

    if telemetry_enabled {
        app.layer(OtelInResponseLayer)
            .layer(OtelAxumLayer::default())
    } else {
        app
    }
}

#[cfg(not(feature = "telemetry"))]
fn with_telemetry(app: Router, _telemetry_enabled: bool) -> Router {
    app
}

/// The full application: routes plus the layers every request passes.
pub fn build_app(app_state: SharedAppState, telemetry_enabled: bool) -> Router {
    let app = ApiRoutes::create(app_state.clone())
        .layer(cors_layer(&app_state))
        .layer(TraceLayer::new_for_http());
    with_telemetry(app, telemetry_enabled)
}

pub async fn setup_http_server(
    app_state: SharedAppState,
    bind_address: &str,
    telemetry_enabled: bool,
) -> anyhow::Result<tokio::task::JoinHandle<anyhow::Result<()>>> {
    let app = build_app(app_state.clone(), telemetry_enabled);

    info!("API server starting at {}", bind_address);
    let listener = tokio::net::TcpListener::bind(bind_address).await?;

    let stop_flag = app_state.stop_flag.clone();
    let handle = tokio::spawn(async move {
        info!("Starting HTTP server");
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                stop_flag.wait().await;
                info!("Stop flag was set, shutting down HTTP server gracefully");
            })
            .await?;
        info!("HTTP server is down");
        Ok(())
    });

    Ok(handle)
}
