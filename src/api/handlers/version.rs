//! API version handler.

use axum::Json;

/// Get API version
///
/// The API version (see semantic versioning).
#[utoipa::path(
    get,
    path = "/api/0/version",
    tag = "meta",
    responses((status = 200, description = "API version", body = String))
)]
pub async fn version() -> Json<&'static str> {
    Json(crate::VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_version_is_constant() {
        let Json(v) = version().await;
        assert_eq!(v, "0.1.0");
        assert_eq!(v, crate::VERSION);
    }
}
