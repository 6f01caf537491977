//! UTM attribution - campaign attribution middleware for actix-web
//!
//! Reads `utm_*` query parameters and previously baked attribution cookies,
//! decides which one governs the request, exposes it to handlers as
//! [`attribution::UtmContext`] and writes the attribution cookies back on
//! the response.
//!
//! # Features
//! - **server**: demo HTTP server binary (default)
//!
//! # Architecture
//! - `attribution`: record extraction, precedence policy, cookie baking
//! - `api`: actix middleware and the demo endpoint
//! - `config`: TOML + environment configuration
//! - `system`: logging setup
//! - `runtime`: server startup

pub mod api;
pub mod attribution;
pub mod cli;
pub mod config;
pub mod errors;
#[cfg(feature = "server")]
pub mod runtime;
pub mod system;

pub use api::middleware::UtmAttribution;
pub use attribution::{AttributionRecord, AttributionSettings, UtmContext};
