//! quire-server
//!
//! HTTP front end for quire-core: configuration, telemetry and the axum router.

pub mod config;
pub mod error;
pub mod http;
pub mod telemetry;
