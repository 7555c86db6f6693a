//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::LinktallyError;

/// API 错误码，序列化为数字
///
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 链接错误
/// - 6000-6099: 统计错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    LinkNotFound = 3000,
    LinkAlreadyExists = 3001,
    LinkCodeExhausted = 3002,

    AnalyticsNoRecords = 6000,
}

impl From<&LinktallyError> for ErrorCode {
    fn from(err: &LinktallyError) -> Self {
        match err {
            LinktallyError::AliasConflict(_) => ErrorCode::LinkAlreadyExists,
            LinktallyError::AllocationExhausted(_) => ErrorCode::LinkCodeExhausted,
            LinktallyError::NotFound(_) => ErrorCode::LinkNotFound,
            LinktallyError::NoRecordsFound(_) => ErrorCode::AnalyticsNoRecords,
            LinktallyError::Validation(_) => ErrorCode::BadRequest,
            LinktallyError::StoreUnavailable(_) => ErrorCode::ServiceUnavailable,
            LinktallyError::DatabaseConfig(_) => ErrorCode::InternalServerError,
        }
    }
}
