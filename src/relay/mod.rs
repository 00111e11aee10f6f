use crate::config::ProviderConfig;
use crate::error::LandingZoneError;
use crate::providers;
use crate::types::{CompletionRequest, Message};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// 中继结果：成功时携带模型回答的原文
pub type ChatResult = crate::Result<String>;

/// 获取全局 HTTP 客户端
///
/// 客户端本身不设超时，单次请求的超时由 ProviderConfig 控制。
fn get_http_client() -> &'static Client {
    static CLIENT: Lazy<Client> = Lazy::new(|| {
        Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .unwrap()
    });
    &CLIENT
}

/// 把一条 prompt 中继给所配置的提供商，返回回答全文
///
/// 只发起一次请求，不重试。prompt 为空或未配置密钥时直接报错，
/// 不会产生任何网络流量。
pub async fn relay(config: &ProviderConfig, prompt: &str) -> ChatResult {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(LandingZoneError::validation("prompt 不能为空"));
    }

    if config.api_key.is_empty() {
        return Err(LandingZoneError::config(format!(
            "未配置 {} 的 API 密钥，请设置 {}",
            config.provider.display_name(),
            config.provider.key_env_hint()
        )));
    }

    let request = CompletionRequest {
        model: config.model_id.clone(),
        messages: vec![Message::user(prompt)],
        temperature: config.temperature,
    };

    let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
    debug!("中继请求: {} (模型: {})", url, config.model_id);

    let response = get_http_client()
        .post(&url)
        .header("Authorization", format!("Bearer {}", config.api_key))
        .header("Content-Type", "application/json")
        .timeout(config.timeout)
        .json(&request)
        .send()
        .await
        .map_err(|e| transport_error(e, config.timeout))?;

    let status = response.status();
    if !status.is_success() {
        // 限制错误响应体大小，防止 DoS 攻击
        let error_body = response
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(4096)
            .collect::<String>();
        return Err(LandingZoneError::provider(providers::decode_error(
            config,
            status.as_u16(),
            &error_body,
        )));
    }

    let raw: Value = response
        .json()
        .await
        .map_err(|e| LandingZoneError::provider(format!("响应不是合法 JSON: {}", e)))?;

    providers::extract_answer(config.provider, &raw)
}

/// 传输层失败归为提供商错误，超时单独点明等待了多久
fn transport_error(e: reqwest::Error, timeout: Duration) -> LandingZoneError {
    if e.is_timeout() {
        LandingZoneError::provider(format!("请求超时（{:?} 内未收到响应）", timeout))
    } else {
        LandingZoneError::provider(format!("请求失败: {}", e))
    }
}
