//! Domain lifecycle handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ErrorResponse};
use crate::api::state::ApiState;
use crate::hypervisor::DomainState;

/// Get domain state
///
/// Returns the domain state as a string (see libvirt's `virDomainState`).
/// The "no state" and "last" codes both read as an empty string.
#[utoipa::path(
    get,
    path = "/api/0/state/{domain}",
    tag = "domains",
    params(("domain" = String, Path, description = "Domain name")),
    responses(
        (status = 200, description = "Domain state", body = String),
        (status = 500, description = "Lookup or state query failed", body = ErrorResponse)
    )
)]
pub async fn get_state(
    State(state): State<Arc<ApiState>>,
    Path(domain): Path<String>,
) -> Result<Json<String>, ApiError> {
    let hypervisor = state.hypervisor();
    let domain_state = tokio::task::spawn_blocking(move || -> crate::Result<DomainState> {
        hypervisor.lookup(&domain)?.state()
    })
    .await??;

    Ok(Json(domain_state.description().to_string()))
}

/// Start domain
///
/// Boots the domain unless it is already running. Does not wait for the
/// guest to come up.
#[utoipa::path(
    get,
    path = "/api/0/start/{domain}",
    tag = "domains",
    params(("domain" = String, Path, description = "Domain name")),
    responses(
        (status = 200, description = "\"starting\" or \"already running\"", body = String),
        (status = 500, description = "Lookup or start failed", body = ErrorResponse)
    )
)]
pub async fn start_domain(
    State(state): State<Arc<ApiState>>,
    Path(domain): Path<String>,
) -> Result<Json<String>, ApiError> {
    let hypervisor = state.hypervisor();
    let outcome = tokio::task::spawn_blocking(move || -> crate::Result<&'static str> {
        let dom = hypervisor.lookup(&domain)?;
        if dom.state()?.is_running() {
            tracing::debug!(domain = %dom.name(), "domain already running");
            return Ok("already running");
        }
        dom.start()?;
        tracing::info!(domain = %dom.name(), "starting domain");
        Ok("starting")
    })
    .await??;

    Ok(Json(outcome.to_string()))
}

/// Shutdown domain
///
/// Asks a running domain to shut down gracefully. Does not wait for the
/// domain to reach the shut off state.
#[utoipa::path(
    get,
    path = "/api/0/shutdown/{domain}",
    tag = "domains",
    params(("domain" = String, Path, description = "Domain name")),
    responses(
        (status = 200, description = "\"shutting down\" or \"not running\"", body = String),
        (status = 500, description = "Lookup or shutdown failed", body = ErrorResponse)
    )
)]
pub async fn shutdown_domain(
    State(state): State<Arc<ApiState>>,
    Path(domain): Path<String>,
) -> Result<Json<String>, ApiError> {
    let hypervisor = state.hypervisor();
    let outcome = tokio::task::spawn_blocking(move || -> crate::Result<&'static str> {
        let dom = hypervisor.lookup(&domain)?;
        if !dom.state()?.is_running() {
            tracing::debug!(domain = %dom.name(), "domain not running");
            return Ok("not running");
        }
        dom.shutdown()?;
        tracing::info!(domain = %dom.name(), "shutting down domain");
        Ok("shutting down")
    })
    .await??;

    Ok(Json(outcome.to_string()))
}
