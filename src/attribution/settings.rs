//! Validated middleware settings, built once from [`AttributionConfig`] and shared
//! read-only by every worker.

use actix_web::cookie::{SameSite, time::Duration};

use crate::config::{AttributionConfig, DAY_SECS, SameSitePolicy, SecondaryCookiePolicy};
use crate::errors::{Result, UtmError};

/// Upper bound for any cookie lifetime, keeps `now + ttl` representable.
const MAX_TTL_SECS: u64 = 10 * 365 * DAY_SECS;

/// Validated, immutable middleware settings.
///
/// Built once at wiring time; every problem the cookie layer could hit is
/// rejected here instead of per request.
#[derive(Debug, Clone)]
pub struct AttributionSettings {
    pub(crate) primary_ttl: Duration,
    pub(crate) secondary_ttl: Duration,
    pub(crate) domain: Option<String>,
    pub(crate) overwrite: bool,
    pub(crate) source_param: String,
    pub(crate) policy: SecondaryCookiePolicy,
    pub(crate) http_only: bool,
    pub(crate) secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bake_when_absent: bool,
}

impl AttributionSettings {
    pub fn from_config(config: &AttributionConfig) -> Result<Self> {
        let primary_ttl = ttl_from_secs("ttl", config.ttl)?;
        let secondary_ttl = ttl_from_secs("secondary_ttl", config.secondary_ttl)?;

        let source_param = config.source_param.trim();
        if source_param.is_empty() {
            return Err(UtmError::configuration(
                "source_param must not be empty",
            ));
        }

        let domain = match config.domain.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(domain) => {
                validate_domain(domain)?;
                Some(domain.to_string())
            }
        };

        if config.same_site == SameSitePolicy::None && !config.secure {
            return Err(UtmError::configuration(
                "same_site = None requires secure = true",
            ));
        }

        let same_site = match config.same_site {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::None => SameSite::None,
            SameSitePolicy::Lax => SameSite::Lax,
        };

        Ok(Self {
            primary_ttl,
            secondary_ttl,
            domain,
            overwrite: config.overwrite,
            source_param: source_param.to_string(),
            policy: config.policy,
            http_only: config.http_only,
            secure: config.secure,
            same_site,
            bake_when_absent: config.bake_when_absent,
        })
    }

    pub fn policy(&self) -> SecondaryCookiePolicy {
        self.policy
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn source_param(&self) -> &str {
        &self.source_param
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn bake_when_absent(&self) -> bool {
        self.bake_when_absent
    }
}

impl Default for AttributionSettings {
    fn default() -> Self {
        Self {
            primary_ttl: Duration::days(30),
            secondary_ttl: Duration::days(14),
            domain: None,
            overwrite: true,
            source_param: "utm_source".to_string(),
            policy: SecondaryCookiePolicy::default(),
            http_only: true,
            secure: false,
            same_site: SameSite::Lax,
            bake_when_absent: false,
        }
    }
}

fn ttl_from_secs(name: &str, secs: u64) -> Result<Duration> {
    if secs == 0 {
        return Err(UtmError::configuration(format!("{} must be positive", name)));
    }
    if secs > MAX_TTL_SECS {
        return Err(UtmError::configuration(format!(
            "{} of {}s exceeds the {}s maximum",
            name, secs, MAX_TTL_SECS
        )));
    }
    // bounded above, fits in i64
    Ok(Duration::seconds(secs as i64))
}

/// Accepts host names with an optional leading dot, e.g. `.example.com`.
fn validate_domain(domain: &str) -> Result<()> {
    let host = domain.strip_prefix('.').unwrap_or(domain);

    if host.is_empty() || host.len() > 253 {
        return Err(UtmError::invalid_domain(format!(
            "'{}' is not a valid cookie domain",
            domain
        )));
    }

    for label in host.split('.') {
        let valid = !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-');
        if !valid {
            return Err(UtmError::invalid_domain(format!(
                "'{}' is not a valid cookie domain (bad label '{}')",
                domain, label
            )));
        }
    }

    Ok(())
}
