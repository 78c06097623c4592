//! Hypervisor session abstraction.
//!
//! This module provides the seam between the HTTP layer and the hypervisor
//! management library:
//! - [`Hypervisor`]: a process-wide session that resolves domains by name
//! - [`DomainHandle`]: the per-request operations on one resolved domain
//! - [`DomainState`]: the fixed table of hypervisor-reported states
//!
//! Every call is synchronous and is issued exactly once; there is no retry,
//! no waiting for a state transition and no locking around the session.

#[cfg(test)]
pub mod fake;
#[cfg(feature = "libvirt")]
pub mod libvirt;
pub mod state;

use crate::error::Result;
pub use state::DomainState;

/// Handle to a named domain, resolved for the duration of one request.
pub trait DomainHandle {
    /// Domain name.
    fn name(&self) -> &str;

    /// Read the current state.
    fn state(&self) -> Result<DomainState>;

    /// Boot the domain. Returns as soon as the hypervisor accepted the request.
    fn start(&self) -> Result<()>;

    /// Request a graceful shutdown. Returns without waiting for shut off.
    fn shutdown(&self) -> Result<()>;

    /// Attach a device described by `xml`.
    fn attach_device(&self, xml: &str) -> Result<()>;

    /// Detach a device described by `xml`.
    fn detach_device(&self, xml: &str) -> Result<()>;
}

/// Hypervisor session shared by every request.
pub trait Hypervisor: Send + Sync {
    /// Backend name (e.g. "libvirt").
    fn name(&self) -> &'static str;

    /// Resolve a domain by name.
    fn lookup(&self, name: &str) -> Result<Box<dyn DomainHandle>>;
}

/// Open the default hypervisor session.
///
/// `uri` selects the connection; `None` lets the library pick its default.
///
/// # Errors
///
/// Returns an error if the connection cannot be opened, or if this build
/// carries no hypervisor backend.
pub fn default_hypervisor(uri: Option<&str>) -> Result<Box<dyn Hypervisor>> {
    #[cfg(feature = "libvirt")]
    {
        let backend = libvirt::LibvirtHypervisor::open(uri)?;
        return Ok(Box::new(backend));
    }

    #[cfg(not(feature = "libvirt"))]
    {
        let _ = uri;
        Err(crate::error::Error::HypervisorUnavailable(
            "built without the `libvirt` feature".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "libvirt"))]
    #[test]
    fn test_default_hypervisor_without_backend() {
        use crate::error::Error;

        let err = default_hypervisor(None).err().unwrap();
        assert!(matches!(err, Error::HypervisorUnavailable(_)));
    }
}
