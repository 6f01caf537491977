use std::fmt;

#[derive(Debug, Clone)]
pub enum UtmError {
    Configuration(String),
    InvalidDomain(String),
    FileOperation(String),
    Serialization(String),
}

impl UtmError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            UtmError::Configuration(_) => "E001",
            UtmError::InvalidDomain(_) => "E002",
            UtmError::FileOperation(_) => "E003",
            UtmError::Serialization(_) => "E004",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            UtmError::Configuration(_) => "Configuration Error",
            UtmError::InvalidDomain(_) => "Invalid Cookie Domain",
            UtmError::FileOperation(_) => "File Operation Error",
            UtmError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            UtmError::Configuration(msg)
            | UtmError::InvalidDomain(msg)
            | UtmError::FileOperation(msg)
            | UtmError::Serialization(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for UtmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for UtmError {}

// 便捷的构造函数
impl UtmError {
    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        UtmError::Configuration(msg.into())
    }

    pub fn invalid_domain<T: Into<String>>(msg: T) -> Self {
        UtmError::InvalidDomain(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        UtmError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        UtmError::Serialization(msg.into())
    }
}

impl From<std::io::Error> for UtmError {
    fn from(err: std::io::Error) -> Self {
        UtmError::FileOperation(err.to_string())
    }
}

impl From<config::ConfigError> for UtmError {
    fn from(err: config::ConfigError) -> Self {
        UtmError::Configuration(err.to_string())
    }
}

impl From<toml::ser::Error> for UtmError {
    fn from(err: toml::ser::Error) -> Self {
        UtmError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UtmError>;
