pub mod client;
pub mod connectivity;
pub mod response;

pub use client::{DetectionClient, HttpDetectionClient};
pub use connectivity::{ConnectivityProbe, HttpConnectivityProbe, StaticConnectivity};

/// Every way a detection request can fail. Callers treat all of them as
/// "no usable sample"; the variants only matter for logging.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("service answered HTTP {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    #[error("no frame to upload")]
    EmptyFrame,
}
