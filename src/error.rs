//! Error types for webvirt.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using webvirt's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in webvirt operations.
#[derive(Error, Debug)]
pub enum Error {
    // Hypervisor errors
    /// A hypervisor library call failed. `message` is the library's own text.
    #[error("{operation} failed: {message}")]
    Hypervisor {
        /// The operation that failed (e.g. "lookup", "attach device").
        operation: String,
        /// Error message reported by the hypervisor library.
        message: String,
    },

    /// The hypervisor reported a state code outside the known table.
    #[error("unknown domain state code: {0}")]
    UnknownState(u32),

    /// Hypervisor is not available.
    #[error("hypervisor unavailable: {0}")]
    HypervisorUnavailable(String),

    // Device template errors
    /// Device template file does not exist.
    #[error("{} not found", path.display())]
    TemplateNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    // Configuration errors
    /// Generic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    // IO errors
    /// IO error wrapper.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a hypervisor error for a failed library call.
    pub fn hypervisor(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Hypervisor {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error with a message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_not_found_includes_path() {
        let err = Error::TemplateNotFound {
            path: PathBuf::from("/opt/webvirt/devices/usb.xml"),
        };
        assert_eq!(err.to_string(), "/opt/webvirt/devices/usb.xml not found");
    }

    #[test]
    fn test_hypervisor_error_includes_operation_and_message() {
        let err = Error::hypervisor("lookup", "Domain not found: no domain with matching name 'vm1'");
        let msg = err.to_string();
        assert!(msg.contains("lookup"), "Error should include operation");
        assert!(
            msg.contains("no domain with matching name 'vm1'"),
            "Error should include library message"
        );
    }

    #[test]
    fn test_unknown_state_includes_code() {
        assert!(Error::UnknownState(42).to_string().contains("42"));
    }
}
