use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumMessage};

use crate::errors::{Result, UtmError};

/// Cookie SameSite 策略
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter, AsRefStr, EnumMessage,
)]
#[serde(rename_all = "PascalCase")]
#[strum(serialize_all = "PascalCase")]
pub enum SameSitePolicy {
    #[strum(message = "Most secure, only same-site requests carry cookies")]
    Strict,
    #[default]
    #[strum(message = "Default, allows top-level navigation to carry cookies")]
    Lax,
    #[strum(message = "No restrictions, requires Secure attribute")]
    None,
}

impl std::fmt::Display for SameSitePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl std::str::FromStr for SameSitePolicy {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lax" => Ok(Self::Lax),
            "none" => Ok(Self::None),
            _ => Err(format!(
                "Invalid SameSite policy: '{}'. Valid: Strict, Lax, None",
                s
            )),
        }
    }
}

/// Which backstop cookies accompany the primary attribution cookies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter, AsRefStr, EnumMessage,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SecondaryCookiePolicy {
    /// A full `_14`-suffixed copy of the record whenever `medium` is set.
    #[default]
    #[strum(message = "Mirror all fields into *_14 cookies when medium is present")]
    DualTier,
    /// A single `first_source14` / `first_source30` cookie for cpc / cpm traffic.
    #[strum(message = "Write first_source14 for cpc and first_source30 for cpm")]
    MediumGated,
}

impl std::fmt::Display for SecondaryCookiePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl std::str::FromStr for SecondaryCookiePolicy {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "dual_tier" => Ok(Self::DualTier),
            "medium_gated" => Ok(Self::MediumGated),
            _ => Err(format!(
                "Invalid secondary cookie policy: '{}'. Valid: dual_tier, medium_gated",
                s
            )),
        }
    }
}

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 演示服务器地址、端口、worker 数量
/// - logging: 日志配置
/// - attribution: UTM 归因中间件配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub attribution: AttributionConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config file > 默认值
    /// ENV 前缀：UTM，分隔符：__
    /// 示例：UTM__ATTRIBUTION__TTL=86400
    ///
    /// A missing file is fine unless `required` is set; a file that exists but
    /// does not parse is always an error.
    pub fn load_from(path: &str, required: bool) -> Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(required))
            .add_source(
                Environment::with_prefix("UTM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config = settings.try_deserialize::<StaticConfig>()?;
        Ok(config)
    }

    /// 从默认路径 `config.toml` 加载
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml", false)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content).map_err(UtmError::from)
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// Attribution middleware options, as written in the config file.
///
/// Validated into [`crate::attribution::AttributionSettings`] before any
/// request is served.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionConfig {
    /// Primary cookie lifetime in seconds.
    #[serde(default = "default_primary_ttl")]
    pub ttl: u64,
    /// Lifetime of the `_14` cookies under the dual-tier policy, in seconds.
    #[serde(default = "default_secondary_ttl")]
    pub secondary_ttl: u64,
    #[serde(default)]
    pub domain: Option<String>,
    /// Whether fresh query parameters replace attribution already stored in cookies.
    #[serde(default = "default_true")]
    pub overwrite: bool,
    #[serde(default = "default_source_param")]
    pub source_param: String,
    #[serde(default)]
    pub policy: SecondaryCookiePolicy,
    #[serde(default = "default_true")]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub same_site: SameSitePolicy,
    /// Write empty-valued cookies when a request carries no attribution.
    #[serde(default)]
    pub bake_when_absent: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

pub const DAY_SECS: u64 = 60 * 60 * 24;

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_primary_ttl() -> u64 {
    30 * DAY_SECS
}

fn default_secondary_ttl() -> u64 {
    14 * DAY_SECS
}

fn default_source_param() -> String {
    "utm_source".to_string()
}

fn default_true() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            ttl: default_primary_ttl(),
            secondary_ttl: default_secondary_ttl(),
            domain: None,
            overwrite: true,
            source_param: default_source_param(),
            policy: SecondaryCookiePolicy::default(),
            http_only: true,
            secure: false,
            same_site: SameSitePolicy::default(),
            bake_when_absent: false,
        }
    }
}

impl AttributionConfig {
    /// 启动日志用的策略说明
    pub fn describe_policies(&self) -> String {
        format!(
            "secondary cookies {} ({}); SameSite {} ({})",
            self.policy,
            self.policy.get_message().unwrap_or_default(),
            self.same_site,
            self.same_site.get_message().unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_attribution_defaults() {
        let config = AttributionConfig::default();
        assert_eq!(config.ttl, 2_592_000);
        assert_eq!(config.secondary_ttl, 1_209_600);
        assert!(config.overwrite);
        assert!(config.http_only);
        assert!(!config.secure);
        assert!(!config.bake_when_absent);
        assert_eq!(config.same_site, SameSitePolicy::Lax);
        assert_eq!(config.policy, SecondaryCookiePolicy::DualTier);
        assert_eq!(config.source_param, "utm_source");
        assert!(config.domain.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: StaticConfig = toml::from_str(
            r#"
            [attribution]
            overwrite = false
            policy = "medium_gated"
            domain = ".example.com"
            "#,
        )
        .expect("valid toml");

        assert!(!config.attribution.overwrite);
        assert_eq!(config.attribution.policy, SecondaryCookiePolicy::MediumGated);
        assert_eq!(config.attribution.domain.as_deref(), Some(".example.com"));
        assert_eq!(config.attribution.ttl, 30 * DAY_SECS);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "dual-tier".parse::<SecondaryCookiePolicy>(),
            Ok(SecondaryCookiePolicy::DualTier)
        );
        assert_eq!(
            "MEDIUM_GATED".parse::<SecondaryCookiePolicy>(),
            Ok(SecondaryCookiePolicy::MediumGated)
        );
        assert!("both".parse::<SecondaryCookiePolicy>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_from_str() {
        for policy in SameSitePolicy::iter() {
            assert_eq!(policy.to_string().parse::<SameSitePolicy>(), Ok(policy));
        }
        for policy in SecondaryCookiePolicy::iter() {
            assert_eq!(policy.to_string().parse::<SecondaryCookiePolicy>(), Ok(policy));
            assert!(policy.get_message().is_some());
        }
        for policy in SameSitePolicy::iter() {
            assert!(policy.get_message().is_some());
        }
    }

    #[test]
    fn test_describe_policies_includes_messages() {
        let config = AttributionConfig {
            policy: SecondaryCookiePolicy::MediumGated,
            same_site: SameSitePolicy::Strict,
            ..AttributionConfig::default()
        };
        let text = config.describe_policies();
        assert!(text.contains("medium_gated (Write first_source14 for cpc and first_source30 for cpm)"));
        assert!(text.contains("SameSite Strict (Most secure, only same-site requests carry cookies)"));

        let text = AttributionConfig::default().describe_policies();
        assert!(text.contains("dual_tier (Mirror all fields into *_14 cookies when medium is present)"));
        assert!(text.contains("SameSite Lax (Default,"));
    }

    #[test]
    fn test_sample_config_is_parseable() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[attribution]"));
        let parsed: StaticConfig = toml::from_str(&sample).expect("sample parses");
        assert_eq!(parsed.attribution.ttl, 30 * DAY_SECS);
    }
}
