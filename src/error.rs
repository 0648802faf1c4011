use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 源 PDF 无法打开或解析
    #[error("Failed to open PDF ({path}): {reason}")]
    DocumentOpen { path: String, reason: String },

    /// 题目 PDF 写入失败
    #[error("Failed to render PDF ({path}): {reason}")]
    Render { path: String, reason: String },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 请求构建失败
    #[error("failed to build chat request: {0}")]
    RequestBuild(String),

    /// API 调用失败（网络、鉴权、配额等）
    #[error("LLM API call failed (model: {model}): {reason}")]
    ApiCallFailed { model: String, reason: String },

    /// 返回内容为空
    #[error("LLM returned no content (model: {model})")]
    EmptyContent { model: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建 PDF 打开失败错误
    pub fn document_open(path: impl Into<String>, reason: impl ToString) -> Self {
        AppError::DocumentOpen {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// 创建 PDF 写入失败错误
    pub fn render_failed(path: impl Into<String>, reason: impl ToString) -> Self {
        AppError::Render {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
