use thiserror::Error;

use crate::models::ValidationError;

/// 统一的API错误类型
///
/// 浏览控制器只把它当作携带可读消息的失败信号，
/// 绝不自行解读传输层细节。
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401：会话已失效，拦截器已清除本地会话
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 403：当前角色无权执行该操作
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 404：资源不存在
    #[error("Not found: {0}")]
    NotFound(String),

    /// 5xx：服务端错误，对外只给通用消息
    #[error("Server error: {0}")]
    Server(String),

    /// 其他非成功状态码
    #[error("HTTP error: status {0}")]
    Http(u16),

    /// 网络错误
    #[error("Network error: {0}")]
    Network(String),

    /// 请求超时
    #[error("Request timed out")]
    Timeout,

    /// 响应解析失败
    #[error("Invalid response: {0}")]
    Decode(String),

    /// 本地表单验证失败（未发送到服务端）
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// 面向用户的可读消息
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// 是否值得重试（网络/服务端瞬时故障）
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Server(_) | ApiError::Network(_) | ApiError::Timeout
        )
    }
}

// 实现从 reqwest::Error 的转换
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Http(status.as_u16())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Result类型别名
pub type ApiResult<T> = Result<T, ApiError>;
