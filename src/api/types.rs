//! JSON response types for the API.

use serde::Serialize;
use utoipa::ToSchema;

/// Result of an attach or detach request.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceResponse {
    /// What happened to the device ("attached" or "detached").
    pub device: String,
    /// The XML sent to the hypervisor, after substitution.
    pub xml: String,
}
