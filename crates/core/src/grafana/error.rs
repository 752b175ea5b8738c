use crate::preference::PreferenceStoreError;

/// Failures of the Grafana integration operations.
///
/// Display strings are user-facing and stable; the attached detail is for logs.
#[derive(Debug, thiserror::Error)]
pub enum GrafanaError {
    /// No credential record, or one without a URL.
    #[error("Grafana URL is not configured")]
    ConfigurationMissing,

    /// A cluster configuration is required but none is valid.
    #[error("No valid kubernetes config found")]
    ClusterConfigMissing,

    /// The validation round-trip failed.
    #[error("Connection to Grafana failed")]
    ConnectivityFailure(String),

    /// Boards could not be listed after a successful validation.
    #[error("Unable to get Grafana boards")]
    ListingFailure(String),

    /// An instant or range query failed upstream.
    #[error("Unable to query Grafana")]
    QueryFailure(String),

    /// Client input could not be decoded.
    #[error("Unable to parse the request body")]
    DecodeFailure(String),

    /// The preference store rejected a read or write.
    #[error("Unable to save user config data")]
    PersistenceFailure(#[from] PreferenceStoreError),
}

impl GrafanaError {
    /// Underlying cause, for logging.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::ConnectivityFailure(d)
            | Self::ListingFailure(d)
            | Self::QueryFailure(d)
            | Self::DecodeFailure(d) => Some(d.clone()),
            Self::PersistenceFailure(e) => Some(e.to_string()),
            Self::ConfigurationMissing | Self::ClusterConfigMissing => None,
        }
    }
}
