//! Host device attach/detach handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ErrorResponse};
use crate::api::state::ApiState;
use crate::api::types::DeviceResponse;
use crate::devices;
use crate::hypervisor::DomainHandle;

/// Device operation selected by the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOperation {
    /// Attach a device to the domain.
    Attach,
    /// Detach a device from the domain.
    Detach,
}

impl DeviceOperation {
    /// Run the operation against a resolved domain.
    fn apply(self, domain: &dyn DomainHandle, xml: &str) -> crate::Result<()> {
        match self {
            DeviceOperation::Attach => domain.attach_device(xml),
            DeviceOperation::Detach => domain.detach_device(xml),
        }
    }

    /// Label reported in [`DeviceResponse::device`].
    pub fn outcome(self) -> &'static str {
        match self {
            DeviceOperation::Attach => "attached",
            DeviceOperation::Detach => "detached",
        }
    }
}

/// Attach host device
///
/// Attach a host device by using an XML template under `devices/`. Query
/// parameters are substituted into the template: `key=value` replaces
/// every `$KEY`.
#[utoipa::path(
    get,
    path = "/api/0/attach/{domain}/{xml_name}",
    tag = "devices",
    params(
        ("domain" = String, Path, description = "Domain name"),
        ("xml_name" = String, Path, description = "Template name, without the .xml extension")
    ),
    responses(
        (status = 200, description = "Device attached", body = DeviceResponse),
        (status = 404, description = "Template not found", body = ErrorResponse),
        (status = 422, description = "Hypervisor rejected the device", body = ErrorResponse),
        (status = 500, description = "Domain lookup failed", body = ErrorResponse)
    )
)]
pub async fn attach_device(
    State(state): State<Arc<ApiState>>,
    Path((domain, xml_name)): Path<(String, String)>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<DeviceResponse>, ApiError> {
    run_device_operation(state, DeviceOperation::Attach, domain, xml_name, params).await
}

/// Detach host device
///
/// Detach a host device by using an XML template under `devices/`. Query
/// parameters are substituted into the template: `key=value` replaces
/// every `$KEY`.
#[utoipa::path(
    get,
    path = "/api/0/detach/{domain}/{xml_name}",
    tag = "devices",
    params(
        ("domain" = String, Path, description = "Domain name"),
        ("xml_name" = String, Path, description = "Template name, without the .xml extension")
    ),
    responses(
        (status = 200, description = "Device detached", body = DeviceResponse),
        (status = 404, description = "Template not found", body = ErrorResponse),
        (status = 422, description = "Hypervisor rejected the device", body = ErrorResponse),
        (status = 500, description = "Domain lookup failed", body = ErrorResponse)
    )
)]
pub async fn detach_device(
    State(state): State<Arc<ApiState>>,
    Path((domain, xml_name)): Path<(String, String)>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<DeviceResponse>, ApiError> {
    run_device_operation(state, DeviceOperation::Detach, domain, xml_name, params).await
}

async fn run_device_operation(
    state: Arc<ApiState>,
    operation: DeviceOperation,
    domain: String,
    xml_name: String,
    params: Vec<(String, String)>,
) -> Result<Json<DeviceResponse>, ApiError> {
    let hypervisor = state.hypervisor();
    let templates = state.templates().clone();

    let response = tokio::task::spawn_blocking(move || -> Result<DeviceResponse, ApiError> {
        let dom = hypervisor.lookup(&domain)?;
        let template = templates.load(&xml_name)?;
        let xml = devices::render(&template, &params);

        tracing::debug!(domain = %domain, template = %xml_name, xml = %xml, "rendered device xml");

        if let Err(e) = operation.apply(dom.as_ref(), &xml) {
            tracing::warn!(domain = %domain, template = %xml_name, ?operation, error = %e, "device operation failed");
            return Err(match e {
                crate::Error::Hypervisor { message, .. } => ApiError::Unprocessable(message),
                other => other.into(),
            });
        }

        tracing::info!(domain = %domain, template = %xml_name, outcome = operation.outcome(), "device operation succeeded");
        Ok(DeviceResponse {
            device: operation.outcome().to_string(),
            xml,
        })
    })
    .await??;

    Ok(Json(response))
}
