//! Cookie names and request-context keys for the eight attribution fields.

use strum::{EnumIter, IntoStaticStr};

/// One attribution field; converts into its primary cookie name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum UtmField {
    #[strum(serialize = "utm_source")]
    Source,
    #[strum(serialize = "utm_medium")]
    Medium,
    #[strum(serialize = "utm_term")]
    Term,
    #[strum(serialize = "utm_content")]
    Content,
    #[strum(serialize = "utm_campaign")]
    Campaign,
    #[strum(serialize = "utm_from")]
    Referrer,
    #[strum(serialize = "utm_time")]
    CapturedAt,
    #[strum(serialize = "utm_lp")]
    LandingPath,
}

/// Backstop cookie written for `cpc` traffic under the medium-gated policy.
pub const FIRST_SOURCE_14: &str = "first_source14";
/// Backstop cookie written for `cpm` traffic under the medium-gated policy.
pub const FIRST_SOURCE_30: &str = "first_source30";

impl UtmField {
    pub fn cookie_name(self) -> &'static str {
        self.into()
    }

    /// Name of the slower-expiring copy written by the dual-tier policy.
    pub fn secondary_cookie_name(self) -> &'static str {
        match self {
            UtmField::Source => "utm_source_14",
            UtmField::Medium => "utm_medium_14",
            UtmField::Term => "utm_term_14",
            UtmField::Content => "utm_content_14",
            UtmField::Campaign => "utm_campaign_14",
            UtmField::Referrer => "utm_from_14",
            UtmField::CapturedAt => "utm_time_14",
            UtmField::LandingPath => "utm_lp_14",
        }
    }

    /// Key under which the field is exposed to downstream handlers.
    pub fn context_key(self) -> &'static str {
        match self {
            UtmField::Source => "utm.source",
            UtmField::Medium => "utm.medium",
            UtmField::Term => "utm.term",
            UtmField::Content => "utm.content",
            UtmField::Campaign => "utm.campaign",
            UtmField::Referrer => "utm.from",
            UtmField::CapturedAt => "utm.time",
            UtmField::LandingPath => "utm.lp",
        }
    }

    pub fn from_context_key(key: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|field| field.context_key() == key)
    }
}
