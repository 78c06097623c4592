//! In-memory hypervisor for tests.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::hypervisor::{DomainHandle, DomainState, Hypervisor};

/// A call recorded by [`FakeHypervisor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Start(String),
    Shutdown(String),
    Attach(String, String),
    Detach(String, String),
}

#[derive(Default)]
struct Inner {
    states: HashMap<String, u32>,
    device_error: Option<String>,
    calls: Vec<Call>,
}

/// Hypervisor with a fixed set of domains that records every mutating call.
#[derive(Clone, Default)]
pub struct FakeHypervisor {
    inner: Arc<Mutex<Inner>>,
}

impl FakeHypervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a domain reporting `state`.
    pub fn with_domain(self, name: &str, state: DomainState) -> Self {
        self.with_raw_state(name, state.code())
    }

    /// Add a domain reporting an arbitrary raw state code.
    pub fn with_raw_state(self, name: &str, code: u32) -> Self {
        self.inner.lock().states.insert(name.to_string(), code);
        self
    }

    /// Make every attach/detach fail with `message`.
    pub fn failing_devices(self, message: &str) -> Self {
        self.inner.lock().device_error = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.clone()
    }
}

impl Hypervisor for FakeHypervisor {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn lookup(&self, name: &str) -> Result<Box<dyn DomainHandle>> {
        if !self.inner.lock().states.contains_key(name) {
            return Err(Error::hypervisor(
                "lookup",
                format!("Domain not found: no domain with matching name '{}'", name),
            ));
        }
        Ok(Box::new(FakeDomain {
            name: name.to_string(),
            inner: self.inner.clone(),
        }))
    }
}

struct FakeDomain {
    name: String,
    inner: Arc<Mutex<Inner>>,
}

impl FakeDomain {
    fn device_call(&self, call: Call, operation: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        if let Some(message) = inner.device_error.clone() {
            return Err(Error::hypervisor(operation, message));
        }
        inner.calls.push(call);
        Ok(())
    }
}

impl DomainHandle for FakeDomain {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> Result<DomainState> {
        let code = self.inner.lock().states[&self.name];
        DomainState::from_code(code).ok_or(Error::UnknownState(code))
    }

    fn start(&self) -> Result<()> {
        self.inner.lock().calls.push(Call::Start(self.name.clone()));
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        self.inner.lock().calls.push(Call::Shutdown(self.name.clone()));
        Ok(())
    }

    fn attach_device(&self, xml: &str) -> Result<()> {
        self.device_call(Call::Attach(self.name.clone(), xml.to_string()), "attach device")
    }

    fn detach_device(&self, xml: &str) -> Result<()> {
        self.device_call(Call::Detach(self.name.clone(), xml.to_string()), "detach device")
    }
}
