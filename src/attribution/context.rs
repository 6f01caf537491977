//! Request-scoped attribution visible to downstream handlers.

use std::collections::BTreeMap;

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorBadRequest};
use futures_util::future::{Ready, ready};
use serde::{Serialize, Serializer};
use strum::IntoEnumIterator;

use super::fields::UtmField;
use super::record::AttributionRecord;

/// Attribution chosen for the current request, stored in request extensions.
///
/// Handlers that also serve unattributed traffic should extract
/// `Option<UtmContext>`; the bare extractor rejects such requests with 400.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtmContext {
    record: AttributionRecord,
}

impl UtmContext {
    pub fn new(record: AttributionRecord) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &AttributionRecord {
        &self.record
    }

    /// Look up a field by context key (`utm.source`, `utm.from`, ...).
    pub fn get(&self, key: &str) -> Option<String> {
        UtmField::from_context_key(key).map(|field| self.record.value(field).into_owned())
    }

    pub fn to_map(&self) -> BTreeMap<&'static str, String> {
        UtmField::iter()
            .map(|field| (field.context_key(), self.record.value(field).into_owned()))
            .collect()
    }
}

impl Serialize for UtmContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

impl FromRequest for UtmContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<UtmContext>()
                .cloned()
                .ok_or_else(|| ErrorBadRequest("request carries no campaign attribution")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> UtmContext {
        UtmContext::new(AttributionRecord {
            source: "google".to_string(),
            medium: "cpc".to_string(),
            referrer: "https://www.google.com/".to_string(),
            captured_at: "42".to_string(),
            landing_path: "/lp".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_get_by_context_key() {
        let ctx = context();
        assert_eq!(ctx.get("utm.source").as_deref(), Some("google"));
        assert_eq!(ctx.get("utm.from").as_deref(), Some("https://www.google.com/"));
        assert_eq!(ctx.get("utm.time").as_deref(), Some("42"));
        assert_eq!(ctx.get("utm.term").as_deref(), Some(""));
        assert_eq!(ctx.get("utm.unknown"), None);
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let json = serde_json::to_value(context()).expect("serializable");
        assert_eq!(json["utm.lp"], "/lp");
        assert_eq!(json["utm.medium"], "cpc");
        assert_eq!(json.as_object().map(|o| o.len()), Some(8));
    }
}
