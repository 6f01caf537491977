//! HTTP layer: the attribution middleware and the demo endpoint.

pub mod middleware;
pub mod services;
