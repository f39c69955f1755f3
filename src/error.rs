use std::fmt;

// =========================================================
// 错误状态枚举
// =========================================================

/// 错误状态枚举
/// 决定错误在界面上的呈现方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleErrorStatus {
    /// 本地校验失败，不会发出网络请求，显示在对应输入框旁
    Validation,
    /// 登录/注册被服务端拒绝，显示在表单顶部
    Authentication,
    /// 带 token 的请求被拒绝 (401/403)，例如 token 已过期
    Authorization,
    /// 请求无法完成，或服务端返回了其他非 2xx 状态
    Network,
    /// 响应体无法解析
    Serialization,
}

impl ConsoleErrorStatus {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConsoleErrorStatus::Validation => "VALIDATION_FAILED",
            ConsoleErrorStatus::Authentication => "AUTHENTICATION_FAILED",
            ConsoleErrorStatus::Authorization => "UNAUTHORIZED",
            ConsoleErrorStatus::Network => "NETWORK_ERROR",
            ConsoleErrorStatus::Serialization => "JSON_PARSE_ERROR",
        }
    }

    /// 根据 HTTP 状态码归类带 token 请求的失败
    pub fn from_rejected_status(status: u16) -> Self {
        match status {
            401 | 403 => ConsoleErrorStatus::Authorization,
            _ => ConsoleErrorStatus::Network,
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
/// 记录错误发生时的操作和相关细节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "session.login", "api.call"
    pub operation: String,
    /// 额外的细节信息，如请求路径、商品 id 等
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 控制台的统一错误类型
///
/// - status: 错误类型，决定 UI 如何呈现
/// - message: 面向用户的错误消息
/// - source: 原始错误（可选，用于错误链）
/// - spans: 结构化的调用追踪栈
#[derive(Debug)]
pub struct ConsoleError {
    pub status: ConsoleErrorStatus,
    pub message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
}

impl ConsoleError {
    pub fn new(status: ConsoleErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ConsoleErrorStatus::Validation, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ConsoleErrorStatus::Authentication, message)
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ConsoleErrorStatus::Authorization, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ConsoleErrorStatus::Network, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ConsoleErrorStatus::Serialization, message)
    }

    // --- Context builders ---

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    /// 设置原始错误源
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    pub fn is_validation(&self) -> bool {
        self.status == ConsoleErrorStatus::Validation
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ConsoleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

pub type ConsoleResult<T> = std::result::Result<T, ConsoleError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<serde_json::Error> for ConsoleError {
    fn from(e: serde_json::Error) -> Self {
        ConsoleError::serialization(e.to_string()).with_source(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_trace() {
        let err = ConsoleError::network("connection refused")
            .in_op_with("api.call", "GET /api/products")
            .in_op("sync.refresh");
        assert_eq!(
            err.to_string(),
            "[NETWORK_ERROR] connection refused | trace: api.call(GET /api/products) -> sync.refresh"
        );
        assert_eq!(err.spans().len(), 2);
    }

    #[test]
    fn rejected_status_classification() {
        assert_eq!(
            ConsoleErrorStatus::from_rejected_status(401),
            ConsoleErrorStatus::Authorization
        );
        assert_eq!(
            ConsoleErrorStatus::from_rejected_status(403),
            ConsoleErrorStatus::Authorization
        );
        assert_eq!(
            ConsoleErrorStatus::from_rejected_status(500),
            ConsoleErrorStatus::Network
        );
    }

    #[test]
    fn serde_errors_keep_source() {
        let parse = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = ConsoleError::from(parse);
        assert_eq!(err.status, ConsoleErrorStatus::Serialization);
        assert!(std::error::Error::source(&err).is_some());
    }
}
