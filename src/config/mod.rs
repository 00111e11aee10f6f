use crate::error::LandingZoneError;
use crate::Result;
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

/// 出站调用超时，参考行为为 30 秒
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 默认采样温度
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// 支持的 LLM 提供商
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Gemini,
    Groq,
}

/// 每个提供商的静态默认值表
struct ProviderDefaults {
    base_url: &'static str,
    model: &'static str,
    /// 凭据环境变量，按优先级排列：专用变量在前，通用 AI_API_KEY 兜底
    key_vars: &'static [&'static str],
    /// 模型覆盖环境变量（目前只有 Groq 提供）
    model_var: Option<&'static str>,
}

impl Provider {
    /// 解析提供商名称（大小写不敏感）
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "gemini" => Ok(Provider::Gemini),
            "groq" => Ok(Provider::Groq),
            _ => Err(LandingZoneError::UnsupportedProvider(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
            Provider::Groq => "groq",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Gemini => "Gemini",
            Provider::Groq => "Groq",
        }
    }

    /// 凭据环境变量列表，用于错误信息和日志提示
    pub fn key_env_hint(&self) -> String {
        self.defaults().key_vars.join(" / ")
    }

    /// 三个提供商都走 OpenAI 兼容的 chat-completions 接口，
    /// Groq 与 Gemini 的兼容端点见各自文档
    fn defaults(&self) -> ProviderDefaults {
        match self {
            Provider::OpenAi => ProviderDefaults {
                base_url: "https://api.openai.com/v1",
                model: "gpt-4o-mini",
                key_vars: &["AI_API_KEY"],
                model_var: None,
            },
            Provider::Gemini => ProviderDefaults {
                base_url: "https://generativelanguage.googleapis.com/v1beta/openai",
                model: "gemini-2.0-flash",
                key_vars: &["GEMINI_API_KEY", "GOOGLE_API_KEY", "AI_API_KEY"],
                model_var: None,
            },
            Provider::Groq => ProviderDefaults {
                base_url: "https://api.groq.com/openai/v1",
                model: "llama-3.1-8b-instant",
                key_vars: &["GROQ_API_KEY", "AI_API_KEY"],
                model_var: Some("GROQ_MODEL"),
            },
        }
    }
}

/// 活动提供商配置：进程启动时解析一次，之后只读共享
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub api_key: String,
    pub base_url: String,
    pub model_id: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl ProviderConfig {
    /// 从进程环境解析配置
    ///
    /// 未找到凭据时返回 ConfigError，调用方应按"提供商不可用"处理，
    /// 进程照常提供 /health 与页面。
    pub fn resolve(provider: Provider) -> Result<Self> {
        Self::resolve_with(provider, |name| std::env::var(name).ok())
    }

    /// 按给定查找函数解析，测试通过注入查找函数避免改动进程环境
    fn resolve_with<F>(provider: Provider, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = provider.defaults();

        let api_key = defaults
            .key_vars
            .iter()
            .find_map(|name| non_empty(lookup(name)));

        let Some(api_key) = api_key else {
            warn!(
                "未找到 {} 的 API 密钥（尝试了 {}），AI 中继不可用",
                provider.display_name(),
                provider.key_env_hint()
            );
            return Err(LandingZoneError::config(format!(
                "缺少 API 密钥，请设置 {}",
                provider.key_env_hint()
            )));
        };

        let model_id = defaults
            .model_var
            .and_then(|name| non_empty(lookup(name)))
            .unwrap_or_else(|| defaults.model.to_string());

        Ok(Self {
            provider,
            api_key,
            base_url: defaults.base_url.to_string(),
            model_id,
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// 无凭据的占位配置，中继对它的每次调用都会返回配置错误
    pub fn unconfigured(provider: Provider) -> Self {
        let defaults = provider.defaults();
        Self {
            provider,
            api_key: String::new(),
            base_url: defaults.base_url.to_string(),
            model_id: defaults.model.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// 只含空白的环境变量按未设置处理
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 落地区部署展示信息，只在首页展示，核心逻辑不读取
#[derive(Debug, Clone, Serialize)]
pub struct DeployInfo {
    pub app_mode: Option<String>,
    pub deploy_region: Option<String>,
    pub log_level: Option<String>,
    pub vnet_enabled: Option<String>,
}

impl DeployInfo {
    /// 启动时快照一次（App Settings 变更会重启进程，逐请求读取没有意义）
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            app_mode: non_empty(lookup("APP_MODE")),
            deploy_region: non_empty(lookup("DEPLOY_REGION")),
            log_level: non_empty(lookup("LOG_LEVEL")),
            vnet_enabled: non_empty(lookup("VNET_ENABLED")),
        }
    }
}
