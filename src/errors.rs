use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinktallyError {
    AliasConflict(String),
    AllocationExhausted(String),
    NotFound(String),
    NoRecordsFound(String),
    StoreUnavailable(String),
    Validation(String),
    DatabaseConfig(String),
}

impl LinktallyError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinktallyError::AliasConflict(_) => "E001",
            LinktallyError::AllocationExhausted(_) => "E002",
            LinktallyError::NotFound(_) => "E003",
            LinktallyError::NoRecordsFound(_) => "E004",
            LinktallyError::StoreUnavailable(_) => "E005",
            LinktallyError::Validation(_) => "E006",
            LinktallyError::DatabaseConfig(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinktallyError::AliasConflict(_) => "Alias Conflict",
            LinktallyError::AllocationExhausted(_) => "Code Allocation Exhausted",
            LinktallyError::NotFound(_) => "Link Not Found",
            LinktallyError::NoRecordsFound(_) => "No Records Found",
            LinktallyError::StoreUnavailable(_) => "Store Unavailable",
            LinktallyError::Validation(_) => "Validation Error",
            LinktallyError::DatabaseConfig(_) => "Database Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinktallyError::AliasConflict(msg)
            | LinktallyError::AllocationExhausted(msg)
            | LinktallyError::NotFound(msg)
            | LinktallyError::NoRecordsFound(msg)
            | LinktallyError::StoreUnavailable(msg)
            | LinktallyError::Validation(msg)
            | LinktallyError::DatabaseConfig(msg) => msg,
        }
    }

    /// HTTP 状态码映射（供 HTTP 适配层使用）
    pub fn http_status(&self) -> StatusCode {
        match self {
            LinktallyError::AliasConflict(_) => StatusCode::CONFLICT,
            LinktallyError::AllocationExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            LinktallyError::NotFound(_) | LinktallyError::NoRecordsFound(_) => {
                StatusCode::NOT_FOUND
            }
            LinktallyError::Validation(_) => StatusCode::BAD_REQUEST,
            LinktallyError::StoreUnavailable(_) | LinktallyError::DatabaseConfig(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 格式化为彩色输出（用于启动失败时的终端输出）
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

impl fmt::Display for LinktallyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinktallyError {}

// 便捷的构造函数
impl LinktallyError {
    pub fn alias_conflict<T: Into<String>>(msg: T) -> Self {
        LinktallyError::AliasConflict(msg.into())
    }

    pub fn allocation_exhausted<T: Into<String>>(msg: T) -> Self {
        LinktallyError::AllocationExhausted(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinktallyError::NotFound(msg.into())
    }

    pub fn no_records_found<T: Into<String>>(msg: T) -> Self {
        LinktallyError::NoRecordsFound(msg.into())
    }

    pub fn store_unavailable<T: Into<String>>(msg: T) -> Self {
        LinktallyError::StoreUnavailable(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinktallyError::Validation(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinktallyError::DatabaseConfig(msg.into())
    }
}

impl From<sea_orm::DbErr> for LinktallyError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinktallyError::StoreUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinktallyError>;
