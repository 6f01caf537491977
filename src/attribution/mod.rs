//! Campaign attribution: extraction, precedence and cookie lifecycle.
//!
//! - `fields`: cookie names and context keys
//! - `record`: the attribution record and its two extraction paths
//! - `selection`: precedence between cookies and query parameters
//! - `cookies`: `Set-Cookie` generation per secondary-cookie policy
//! - `context`: request-scoped view handed to downstream handlers

pub mod context;
pub mod cookies;
pub mod fields;
pub mod record;
pub mod request;
pub mod selection;
pub mod settings;

pub use context::UtmContext;
pub use cookies::{CookieBaker, bake_cookies};
pub use fields::{FIRST_SOURCE_14, FIRST_SOURCE_30, UtmField};
pub use record::AttributionRecord;
pub use request::RequestView;
pub use selection::{Selection, resolve, select};
pub use settings::AttributionSettings;
