//! HTTP request handlers.

pub mod devices;
pub mod domains;
pub mod version;
