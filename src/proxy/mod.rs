//! Configuration and pipeline wiring.
//!
//! - [`ProxyConfig`]: immutable settings shared by all exchanges
//! - [`RewritePipeline`]: the request and response hooks the transport calls

pub mod config;
pub mod pipeline;

pub use config::ProxyConfig;
pub use pipeline::{RequestOutcome, RewritePipeline};
