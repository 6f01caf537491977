use std::borrow::Cow;

use serde::Serialize;

use super::fields::UtmField;
use super::request::RequestView;

/// The campaign touchpoint credited for a visit.
///
/// Built fresh per request from exactly one source, either the query string
/// or the attribution cookies; fields from the two are never mixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributionRecord {
    pub source: String,
    pub medium: String,
    pub term: String,
    pub content: String,
    pub campaign: String,
    /// `Referer` at the time of first capture.
    pub referrer: String,
    /// Unix seconds at the time of first capture, kept as the raw string so
    /// a stored cookie value is re-emitted untouched.
    pub captured_at: String,
    /// Request path at the time of first capture.
    pub landing_path: String,
}

impl AttributionRecord {
    /// A record only counts when it names a source.
    pub fn is_present(&self) -> bool {
        !self.source.is_empty()
    }

    /// `captured_at` as unix seconds, when it holds an integer.
    pub fn captured_at_unix(&self) -> Option<i64> {
        self.captured_at.trim().parse().ok()
    }

    /// Capture attribution from the query string of `req`.
    ///
    /// Values are taken verbatim; anything missing becomes an empty string.
    /// `source_param` names the query key read into `source`.
    pub fn from_params<R: RequestView + ?Sized>(req: &R, source_param: &str) -> Self {
        let param = |name: &str| req.query_value(name).unwrap_or_default();

        Self {
            source: param(source_param),
            medium: param(UtmField::Medium.cookie_name()),
            term: param(UtmField::Term.cookie_name()),
            content: param(UtmField::Content.cookie_name()),
            campaign: param(UtmField::Campaign.cookie_name()),
            referrer: req.referer().unwrap_or_default(),
            captured_at: chrono::Utc::now().timestamp().to_string(),
            landing_path: req.request_path().to_string(),
        }
    }

    /// Read a previously baked record back from the request cookies.
    ///
    /// Returns `None` unless the `utm_source` cookie is non-empty. Companion
    /// cookies are read as-is alongside it.
    pub fn from_cookies<R: RequestView + ?Sized>(req: &R) -> Option<Self> {
        let cookie = |field: UtmField| req.cookie_value(field.cookie_name()).unwrap_or_default();

        let source = cookie(UtmField::Source);
        if source.is_empty() {
            return None;
        }

        Some(Self {
            source,
            medium: cookie(UtmField::Medium),
            term: cookie(UtmField::Term),
            content: cookie(UtmField::Content),
            campaign: cookie(UtmField::Campaign),
            referrer: cookie(UtmField::Referrer),
            captured_at: cookie(UtmField::CapturedAt),
            landing_path: cookie(UtmField::LandingPath),
        })
    }

    /// String form of one field, as written to cookies and the request context.
    pub fn value(&self, field: UtmField) -> Cow<'_, str> {
        match field {
            UtmField::Source => Cow::Borrowed(&self.source),
            UtmField::Medium => Cow::Borrowed(&self.medium),
            UtmField::Term => Cow::Borrowed(&self.term),
            UtmField::Content => Cow::Borrowed(&self.content),
            UtmField::Campaign => Cow::Borrowed(&self.campaign),
            UtmField::Referrer => Cow::Borrowed(&self.referrer),
            UtmField::CapturedAt => Cow::Borrowed(&self.captured_at),
            UtmField::LandingPath => Cow::Borrowed(&self.landing_path),
        }
    }
}
