use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 扫码器相关错误
    Scan(ScanError),
    /// 远程接口调用错误
    Api(ApiError),
    /// 流程状态错误
    Flow(FlowError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Scan(e) => write!(f, "扫码错误: {}", e),
            AppError::Api(e) => write!(f, "接口错误: {}", e),
            AppError::Flow(e) => write!(f, "流程错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Scan(e) => Some(e),
            AppError::Api(e) => Some(e),
            AppError::Flow(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 扫码器相关错误
#[derive(Debug)]
pub enum ScanError {
    /// 相机权限被拒绝
    PermissionDenied,
    /// 扫码器底层故障
    DeviceFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::PermissionDenied => write!(f, "相机权限被拒绝"),
            ScanError::DeviceFailed { source } => write!(f, "扫码设备故障: {}", source),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::DeviceFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 远程接口调用错误
#[derive(Debug)]
pub enum ApiError {
    /// 网络请求失败（含超时）
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 接口返回非成功状态码
    BadStatus {
        endpoint: String,
        status: u16,
    },
    /// 响应不是合法 JSON
    JsonParseFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// JSON 可解析但缺少必需字段
    MalformedPayload {
        reason: String,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::RequestFailed { endpoint, source } => {
                write!(f, "网络请求失败 ({}): {}", endpoint, source)
            }
            ApiError::BadStatus { endpoint, status } => {
                write!(f, "接口返回错误状态码 ({}): {}", endpoint, status)
            }
            ApiError::JsonParseFailed { source } => {
                write!(f, "JSON解析失败: {}", source)
            }
            ApiError::MalformedPayload { reason } => {
                write!(f, "题目数据不完整: {}", reason)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::RequestFailed { source, .. } | ApiError::JsonParseFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 流程状态错误
#[derive(Debug)]
pub enum FlowError {
    /// 扫到的内容不是有效的寻宝码
    InvalidCode {
        payload: String,
    },
    /// 多选题的选项不在候选列表中
    ChoiceNotListed {
        choice: String,
    },
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::InvalidCode { payload } => {
                write!(f, "无效的寻宝码: {}", payload)
            }
            FlowError::ChoiceNotListed { choice } => {
                write!(f, "选项不在候选列表中: {}", choice)
            }
        }
    }
}

impl std::error::Error for FlowError {}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_default();
        AppError::Api(ApiError::RequestFailed {
            endpoint,
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建网络请求失败错误
    pub fn request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建题目数据不完整错误
    pub fn malformed_payload(reason: impl Into<String>) -> Self {
        AppError::Api(ApiError::MalformedPayload {
            reason: reason.into(),
        })
    }

    /// 创建无效寻宝码错误
    pub fn invalid_code(payload: impl Into<String>) -> Self {
        AppError::Flow(FlowError::InvalidCode {
            payload: payload.into(),
        })
    }

    /// 创建权限被拒绝错误
    pub fn permission_denied() -> Self {
        AppError::Scan(ScanError::PermissionDenied)
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
