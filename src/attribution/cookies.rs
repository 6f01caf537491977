//! Turns an attribution record into `Set-Cookie` headers.

use actix_web::cookie::{
    Cookie,
    time::{Duration, OffsetDateTime},
};
use actix_web::dev::ServiceResponse;
use actix_web::http::header::{HeaderValue, SET_COOKIE};
use strum::IntoEnumIterator;
use tracing::{trace, warn};

use super::fields::{FIRST_SOURCE_14, FIRST_SOURCE_30, UtmField};
use super::record::AttributionRecord;
use super::settings::AttributionSettings;
use crate::config::SecondaryCookiePolicy;

/// Builds the attribution cookie set for one response.
///
/// Expiry is computed from a single `now` so every cookie in a bake shares
/// the same reference time.
pub struct CookieBaker<'a> {
    settings: &'a AttributionSettings,
    now: OffsetDateTime,
}

impl<'a> CookieBaker<'a> {
    pub fn new(settings: &'a AttributionSettings) -> Self {
        Self::at(settings, OffsetDateTime::now_utc())
    }

    pub fn at(settings: &'a AttributionSettings, now: OffsetDateTime) -> Self {
        Self { settings, now }
    }

    fn build_cookie(&self, name: &'static str, value: String, ttl: Duration) -> Cookie<'static> {
        let mut cookie = Cookie::new(name, value);
        cookie.set_path("/");
        cookie.set_expires(self.now + ttl);
        cookie.set_http_only(self.settings.http_only);
        cookie.set_secure(self.settings.secure);
        cookie.set_same_site(self.settings.same_site);
        if let Some(ref domain) = self.settings.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }

    /// Every cookie the active policy writes for `record`.
    pub fn cookies(&self, record: &AttributionRecord) -> Vec<Cookie<'static>> {
        let mut cookies: Vec<Cookie<'static>> = UtmField::iter()
            .map(|field| {
                self.build_cookie(
                    field.cookie_name(),
                    record.value(field).into_owned(),
                    self.settings.primary_ttl,
                )
            })
            .collect();

        match self.settings.policy {
            SecondaryCookiePolicy::DualTier => {
                if !record.medium.is_empty() {
                    cookies.extend(UtmField::iter().map(|field| {
                        self.build_cookie(
                            field.secondary_cookie_name(),
                            record.value(field).into_owned(),
                            self.settings.secondary_ttl,
                        )
                    }));
                }
            }
            SecondaryCookiePolicy::MediumGated => match record.medium.as_str() {
                "cpc" => cookies.push(self.build_cookie(
                    FIRST_SOURCE_14,
                    record.source.clone(),
                    Duration::days(14),
                )),
                "cpm" => cookies.push(self.build_cookie(
                    FIRST_SOURCE_30,
                    record.source.clone(),
                    Duration::days(30),
                )),
                _ => {}
            },
        }

        cookies
    }
}

/// Append the attribution cookies for `record` to `res`.
///
/// Values are percent-encoded, matching how actix decodes request cookies.
/// With no record, nothing is written unless `bake_when_absent` is set, in
/// which case the primary set goes out with empty values.
pub fn bake_cookies<B>(
    res: &mut ServiceResponse<B>,
    settings: &AttributionSettings,
    record: Option<&AttributionRecord>,
) {
    let empty = AttributionRecord::default();
    let record = match record {
        Some(record) => record,
        None if settings.bake_when_absent => &empty,
        None => return,
    };

    for cookie in CookieBaker::new(settings).cookies(record) {
        trace!("Baking cookie {}={:?}", cookie.name(), cookie.value());
        match HeaderValue::from_str(&cookie.encoded().to_string()) {
            Ok(value) => res.headers_mut().append(SET_COOKIE, value),
            Err(e) => warn!("Failed to set cookie {}: {}", cookie.name(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AttributionConfig;
    use actix_web::cookie::SameSite;

    fn record(medium: &str) -> AttributionRecord {
        AttributionRecord {
            source: "google".to_string(),
            medium: medium.to_string(),
            term: "shoes".to_string(),
            content: String::new(),
            campaign: "spring".to_string(),
            referrer: "https://www.google.com/".to_string(),
            captured_at: "1700000000".to_string(),
            landing_path: "/landing".to_string(),
        }
    }

    fn settings(policy: SecondaryCookiePolicy) -> AttributionSettings {
        AttributionSettings::from_config(&AttributionConfig {
            policy,
            ..AttributionConfig::default()
        })
        .expect("valid")
    }

    fn names(cookies: &[Cookie<'_>]) -> Vec<String> {
        cookies.iter().map(|c| c.name().to_string()).collect()
    }

    #[test]
    fn test_primary_cookie_attributes() {
        let settings = settings(SecondaryCookiePolicy::DualTier);
        let now = OffsetDateTime::now_utc();
        let cookies = CookieBaker::at(&settings, now).cookies(&record(""));

        assert_eq!(
            names(&cookies),
            [
                "utm_source", "utm_medium", "utm_term", "utm_content", "utm_campaign",
                "utm_from", "utm_time", "utm_lp"
            ]
        );
        for cookie in &cookies {
            assert_eq!(cookie.path(), Some("/"));
            assert_eq!(cookie.expires_datetime(), Some(now + Duration::days(30)));
            assert_eq!(cookie.http_only(), Some(true));
            assert_eq!(cookie.same_site(), Some(SameSite::Lax));
            assert_eq!(cookie.domain(), None);
            assert_ne!(cookie.secure(), Some(true));
        }
        assert_eq!(cookies[6].value(), "1700000000");
    }

    #[test]
    fn test_dual_tier_mirrors_when_medium_present() {
        let settings = settings(SecondaryCookiePolicy::DualTier);
        let now = OffsetDateTime::now_utc();
        let cookies = CookieBaker::at(&settings, now).cookies(&record("cpc"));

        assert_eq!(cookies.len(), 16);
        let secondary = &cookies[8..];
        for (cookie, field) in secondary.iter().zip(UtmField::iter()) {
            assert_eq!(cookie.name(), field.secondary_cookie_name());
            assert_eq!(cookie.expires_datetime(), Some(now + Duration::days(14)));
        }
        assert_eq!(secondary[0].value(), "google");
        assert_eq!(secondary[1].value(), "cpc");
    }

    #[test]
    fn test_medium_gated_backstops() {
        let settings = settings(SecondaryCookiePolicy::MediumGated);
        let now = OffsetDateTime::now_utc();
        let baker = CookieBaker::at(&settings, now);

        let cpc = baker.cookies(&record("cpc"));
        assert_eq!(cpc.len(), 9);
        assert_eq!(cpc[8].name(), FIRST_SOURCE_14);
        assert_eq!(cpc[8].value(), "google");
        assert_eq!(cpc[8].expires_datetime(), Some(now + Duration::days(14)));

        let cpm = baker.cookies(&record("cpm"));
        assert_eq!(cpm.len(), 9);
        assert_eq!(cpm[8].name(), FIRST_SOURCE_30);
        assert_eq!(cpm[8].expires_datetime(), Some(now + Duration::days(30)));

        for medium in ["", "email", "CPC"] {
            assert_eq!(baker.cookies(&record(medium)).len(), 8, "{}", medium);
        }
    }

    #[test]
    fn test_domain_and_secure_applied() {
        let settings = AttributionSettings::from_config(&AttributionConfig {
            domain: Some(".example.com".to_string()),
            secure: true,
            http_only: false,
            same_site: crate::config::SameSitePolicy::Strict,
            ..AttributionConfig::default()
        })
        .expect("valid");

        for cookie in CookieBaker::new(&settings).cookies(&record("")) {
            assert_eq!(cookie.domain(), Some("example.com"));
            assert_eq!(cookie.secure(), Some(true));
            assert_eq!(cookie.http_only(), Some(false));
            assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        }
    }

    #[test]
    fn test_bake_is_idempotent() {
        let settings = settings(SecondaryCookiePolicy::DualTier);
        let first = CookieBaker::new(&settings).cookies(&record("cpc"));
        let second = CookieBaker::new(&settings).cookies(&record("cpc"));

        let values = |cookies: &[Cookie<'_>]| {
            cookies
                .iter()
                .map(|c| (c.name().to_string(), c.value().to_string()))
                .collect::<Vec<_>>()
        };
        assert_eq!(values(&first), values(&second));
    }
}
