use crate::config::ProviderConfig;
use crate::error::LandingZoneError;
use crate::Result;
use serde_json::Value;

/// Groq 会定期停用旧模型，此错误码见其 deprecations 公告
const DECOMMISSIONED_CODE: &str = "model_decommissioned";

/// 从 Groq 响应中提取首个 choice 的文本（OpenAI 兼容形态）
pub fn extract_answer(raw: &Value) -> Result<String> {
    raw.get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            LandingZoneError::provider("Groq 响应格式异常: 缺少 choices[0].message.content")
        })
}

/// 解读 Groq 错误响应体
///
/// 模型停用是已知状况：给出点名当前模型、指向 GROQ_MODEL 的可操作提示，
/// 即使响应体里只有 code 没有 message 也要成立。
pub fn decode_error(config: &ProviderConfig, status: u16, body: &str) -> String {
    let payload: Option<Value> = serde_json::from_str(body).ok();
    let error = payload.as_ref().and_then(|value| value.get("error"));
    let code = error.and_then(|e| e.get("code")).and_then(|c| c.as_str());
    let message = error.and_then(|e| e.get("message")).and_then(|m| m.as_str());

    if code == Some(DECOMMISSIONED_CODE) {
        let hint = format!(
            "模型 {} 已被 Groq 停用，请设置 GROQ_MODEL 环境变量切换到受支持的模型",
            config.model_id
        );
        return match message {
            Some(message) => format!("{}（原始错误: {}）", hint, message),
            None => hint,
        };
    }

    match message {
        Some(message) => format!("Groq API 错误 (HTTP {}): {}", status, message),
        None if body.trim().is_empty() => format!("Groq API 错误 (HTTP {})", status),
        None => format!("Groq API 错误 (HTTP {}): {}", status, body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Provider, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT};
    use serde_json::json;

    fn groq_config(model_id: &str) -> ProviderConfig {
        ProviderConfig {
            provider: Provider::Groq,
            api_key: "gsk-test".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model_id: model_id.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[test]
    fn test_extract_answer_success() {
        let raw = json!({
            "id": "chatcmpl-groq",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "OK"},
                "finish_reason": "stop"
            }]
        });

        assert_eq!(extract_answer(&raw).unwrap(), "OK");
    }

    #[test]
    fn test_extract_answer_empty_choices() {
        let raw = json!({"choices": []});
        assert!(extract_answer(&raw).is_err());
    }

    #[test]
    fn test_decode_error_decommissioned_names_model() {
        let config = groq_config("llama3-8b-8192");
        let body = r#"{"error":{"message":"The model `llama3-8b-8192` has been decommissioned","type":"invalid_request_error","code":"model_decommissioned"}}"#;

        let message = decode_error(&config, 400, body);
        assert!(message.contains("llama3-8b-8192"));
        assert!(message.contains("GROQ_MODEL"));
        assert!(message.contains("原始错误"));
    }

    #[test]
    fn test_decode_error_decommissioned_code_only() {
        // 响应体只带 code 时提示也要点名模型
        let config = groq_config("llama3-8b-8192");
        let body = r#"{"error":{"code":"model_decommissioned"}}"#;

        let message = decode_error(&config, 400, body);
        assert!(message.contains("llama3-8b-8192"));
        assert!(message.contains("GROQ_MODEL"));
    }

    #[test]
    fn test_decode_error_other_code() {
        let config = groq_config("llama-3.1-8b-instant");
        let body = r#"{"error":{"message":"Rate limit reached","type":"tokens","code":"rate_limit_exceeded"}}"#;

        let message = decode_error(&config, 429, body);
        assert_eq!(message, "Groq API 错误 (HTTP 429): Rate limit reached");
        assert!(!message.contains("GROQ_MODEL"));
    }

    #[test]
    fn test_decode_error_non_json_body() {
        let config = groq_config("llama-3.1-8b-instant");

        let message = decode_error(&config, 503, "upstream unavailable");
        assert_eq!(message, "Groq API 错误 (HTTP 503): upstream unavailable");
    }
}
