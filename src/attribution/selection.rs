//! Precedence between cookie-stored and query-supplied attribution.

use super::record::AttributionRecord;
use super::request::RequestView;
use super::settings::AttributionSettings;

/// Outcome of the precedence policy for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Fresh attribution from the query string.
    Params(AttributionRecord),
    /// Attribution carried over from an earlier visit.
    Cookies(AttributionRecord),
    Unattributed,
}

impl Selection {
    pub fn record(&self) -> Option<&AttributionRecord> {
        match self {
            Selection::Params(record) | Selection::Cookies(record) => Some(record),
            Selection::Unattributed => None,
        }
    }

    pub fn into_record(self) -> Option<AttributionRecord> {
        match self {
            Selection::Params(record) | Selection::Cookies(record) => Some(record),
            Selection::Unattributed => None,
        }
    }

    pub fn origin(&self) -> &'static str {
        match self {
            Selection::Params(_) => "params",
            Selection::Cookies(_) => "cookies",
            Selection::Unattributed => "none",
        }
    }
}

/// Pick the record that governs a request.
///
/// Query parameters win when no cookie attribution exists, or when
/// `overwrite` is set; otherwise stored attribution is sticky. `params` is
/// only evaluated when its record is chosen.
pub fn select<F>(
    cookie: Option<AttributionRecord>,
    has_param_tag: bool,
    overwrite: bool,
    params: F,
) -> Selection
where
    F: FnOnce() -> AttributionRecord,
{
    match (cookie, has_param_tag) {
        (cookie, false) => cookie.map_or(Selection::Unattributed, Selection::Cookies),
        (None, true) => Selection::Params(params()),
        (Some(_), true) if overwrite => Selection::Params(params()),
        (Some(cookie), true) => Selection::Cookies(cookie),
    }
}

/// Run extraction and the precedence policy against a live request.
pub fn resolve<R: RequestView + ?Sized>(req: &R, settings: &AttributionSettings) -> Selection {
    let cookie = AttributionRecord::from_cookies(req);
    let has_param_tag = req
        .query_value(settings.source_param())
        .is_some_and(|tag| !tag.is_empty());

    select(cookie, has_param_tag, settings.overwrite(), || {
        AttributionRecord::from_params(req, settings.source_param())
    })
}
