pub mod utm;

pub use utm::{UtmAttribution, UtmAttributionService};
