//! HTTP API server for webvirt.
//!
//! This module provides a small REST-inspired API over the hypervisor session.
//! Every route is a `GET` so that it can be driven from a browser bookmark or
//! a plain `curl`.
//!
//! # Example
//!
//! ```bash
//! # Start the server
//! webvirt --address 127.0.0.1 --port 5000
//!
//! # Query and start a domain
//! curl http://localhost:5000/api/0/state/win10
//! curl http://localhost:5000/api/0/start/win10
//!
//! # Pass a USB device through, filling $VENDOR and $PRODUCT in devices/usb.xml
//! curl 'http://localhost:5000/api/0/attach/win10/usb?vendor=0x046d&product=0xc52b'
//! ```

pub mod error;
pub mod handlers;
pub mod state;
pub mod types;

use axum::{routing::get, Json, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use state::ApiState;

/// OpenAPI description of the HTTP API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "webvirt",
        description = "A REST-inspired API for managing libvirt virtual machines"
    ),
    paths(
        handlers::domains::get_state,
        handlers::domains::start_domain,
        handlers::domains::shutdown_domain,
        handlers::devices::attach_device,
        handlers::devices::detach_device,
        handlers::version::version,
    ),
    components(schemas(types::DeviceResponse, error::ErrorResponse)),
    tags(
        (name = "domains", description = "Domain lifecycle"),
        (name = "devices", description = "Host device passthrough"),
        (name = "meta", description = "Server information")
    )
)]
pub struct ApiDoc;

/// Create the API router with all endpoints.
pub fn create_router(state: Arc<ApiState>) -> Router {
    // API v0 routes
    let api_v0 = Router::new()
        .route("/state/:domain", get(handlers::domains::get_state))
        .route("/start/:domain", get(handlers::domains::start_domain))
        .route("/shutdown/:domain", get(handlers::domains::shutdown_domain))
        .route(
            "/attach/:domain/:xml_name",
            get(handlers::devices::attach_device),
        )
        .route(
            "/detach/:domain/:xml_name",
            get(handlers::devices::detach_device),
        )
        .route("/version", get(handlers::version::version));

    let router = Router::new()
        .nest("/api/0", api_v0)
        .route("/openapi.json", get(openapi_json));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/docs").url("/docs/openapi.json", ApiDoc::openapi()),
    );

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// GET /openapi.json - OpenAPI document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
