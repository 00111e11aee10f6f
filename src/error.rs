use thiserror::Error;

/// 统一错误类型，中继的三种失败都以数据形式返回，不向上抛异常
#[derive(Error, Debug)]
pub enum LandingZoneError {
    /// 入参校验失败（空 prompt 等）
    #[error("校验错误: {0}")]
    ValidationError(String),

    /// 缺少凭据等配置问题
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 提供商调用失败：网络错误、非 2xx、响应格式异常
    #[error("提供商错误: {0}")]
    ProviderError(String),

    #[error("不支持的提供商: {0}")]
    UnsupportedProvider(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("模板渲染错误: {0}")]
    TemplateError(#[from] handlebars::RenderError),
}

impl LandingZoneError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LandingZoneError::ValidationError(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        LandingZoneError::ConfigError(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        LandingZoneError::ProviderError(msg.into())
    }
}
