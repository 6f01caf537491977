pub mod attribution;

pub use attribution::{AttributionService, attribution_routes};
