//! API server state.

use std::sync::Arc;

use crate::devices::DeviceTemplates;
use crate::hypervisor::Hypervisor;

/// Shared API server state.
///
/// Built once at startup and handed to every handler. The hypervisor session
/// is used without extra locking; the backend is expected to be thread-safe.
pub struct ApiState {
    /// Hypervisor session.
    hypervisor: Arc<dyn Hypervisor>,
    /// Device XML templates.
    templates: DeviceTemplates,
}

impl ApiState {
    /// Create a new API state.
    pub fn new(hypervisor: Arc<dyn Hypervisor>, templates: DeviceTemplates) -> Self {
        Self {
            hypervisor,
            templates,
        }
    }

    /// Shared handle to the hypervisor session, for use in blocking tasks.
    pub fn hypervisor(&self) -> Arc<dyn Hypervisor> {
        self.hypervisor.clone()
    }

    /// Device templates.
    pub fn templates(&self) -> &DeviceTemplates {
        &self.templates
    }
}
