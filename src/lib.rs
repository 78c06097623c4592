//! webvirt - a REST-inspired HTTP API for managing libvirt virtual machines.
//!
//! The server resolves a named domain through one shared hypervisor session,
//! makes a single library call and turns the outcome into an HTTP response.
//! Host devices are attached and detached from XML templates kept in a
//! `devices/` directory next to the program.

pub mod api;
pub mod devices;
pub mod error;
pub mod hypervisor;

pub use api::ApiDoc;
pub use error::{Error, Result};

/// API version reported by `/api/0/version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
