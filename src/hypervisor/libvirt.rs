//! libvirt backend.

use virt::connect::Connect;
use virt::domain::Domain;

use crate::error::{Error, Result};
use crate::hypervisor::{DomainHandle, DomainState, Hypervisor};

/// Session backed by a single libvirt connection.
///
/// The connection is opened once and shared by all requests. libvirt
/// connections are thread-safe, so calls are not serialized here.
pub struct LibvirtHypervisor {
    connection: Connect,
}

impl LibvirtHypervisor {
    /// Connect to libvirt.
    ///
    /// Common URIs:
    /// - `qemu:///system` - System-wide QEMU/KVM
    /// - `qemu:///session` - User session QEMU
    /// - `None` - libvirt's own default (`LIBVIRT_DEFAULT_URI`, then probing)
    pub fn open(uri: Option<&str>) -> Result<Self> {
        tracing::info!(uri = uri.unwrap_or("<default>"), "connecting to libvirt");

        let connection =
            Connect::open(uri).map_err(|e| Error::HypervisorUnavailable(e.to_string()))?;

        tracing::info!("connected to libvirt");
        Ok(Self { connection })
    }
}

impl Hypervisor for LibvirtHypervisor {
    fn name(&self) -> &'static str {
        "libvirt"
    }

    fn lookup(&self, name: &str) -> Result<Box<dyn DomainHandle>> {
        let domain = Domain::lookup_by_name(&self.connection, name)
            .map_err(|e| libvirt_error("lookup", e))?;
        Ok(Box::new(LibvirtDomain {
            name: name.to_string(),
            domain,
        }))
    }
}

struct LibvirtDomain {
    name: String,
    domain: Domain,
}

impl DomainHandle for LibvirtDomain {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> Result<DomainState> {
        let (code, _reason) = self
            .domain
            .get_state()
            .map_err(|e| libvirt_error("get state", e))?;
        DomainState::from_code(code).ok_or(Error::UnknownState(code))
    }

    fn start(&self) -> Result<()> {
        self.domain
            .create()
            .map_err(|e| libvirt_error("start", e))?;
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        self.domain
            .shutdown()
            .map_err(|e| libvirt_error("shutdown", e))?;
        Ok(())
    }

    fn attach_device(&self, xml: &str) -> Result<()> {
        self.domain
            .attach_device(xml)
            .map_err(|e| libvirt_error("attach device", e))?;
        Ok(())
    }

    fn detach_device(&self, xml: &str) -> Result<()> {
        self.domain
            .detach_device(xml)
            .map_err(|e| libvirt_error("detach device", e))?;
        Ok(())
    }
}

fn libvirt_error(operation: &str, err: virt::error::Error) -> Error {
    Error::hypervisor(operation, err.message().to_string())
}
