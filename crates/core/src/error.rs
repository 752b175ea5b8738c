/// Generic domain errors shared by every layer above `core`.
///
/// Integration-specific failures live in [`crate::grafana::GrafanaError`].
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
