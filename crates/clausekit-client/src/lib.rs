//! Network layer: multipart upload to the analysis service and health probe.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{AnalysisClient, ClientConfig, ClientError, HealthStatus};
