use crate::error::LandingZoneError;
use crate::Result;
use serde_json::Value;

/// 从 Gemini 响应中提取首个 choice 的文本
///
/// 走 OpenAI 兼容端点，形态与 OpenAI 一致。content 为 null 时
/// 通常是安全策略拦截了生成，单独给出提示。
pub fn extract_answer(raw: &Value) -> Result<String> {
    let content = raw
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"));

    match content {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(Value::Null) => Err(LandingZoneError::provider(
            "Gemini 未返回内容，可能被安全策略拦截",
        )),
        _ => Err(LandingZoneError::provider(
            "Gemini 响应格式异常: 缺少 choices[0].message.content",
        )),
    }
}

/// 解读 Gemini 错误响应体
///
/// Gemini 的错误体带有 status 字段（如 INVALID_ARGUMENT），有值时一并报出。
pub fn decode_error(status: u16, body: &str) -> String {
    let payload: Option<Value> = serde_json::from_str(body).ok();
    let error = payload.as_ref().and_then(|value| value.get("error"));
    let message = error.and_then(|e| e.get("message")).and_then(|m| m.as_str());
    let api_status = error.and_then(|e| e.get("status")).and_then(|s| s.as_str());

    match (message, api_status) {
        (Some(message), Some(api_status)) => {
            format!("Gemini API 错误 (HTTP {}, {}): {}", status, api_status, message)
        }
        (Some(message), None) => format!("Gemini API 错误 (HTTP {}): {}", status, message),
        (None, _) if body.trim().is_empty() => format!("Gemini API 错误 (HTTP {})", status),
        (None, _) => format!("Gemini API 错误 (HTTP {}): {}", status, body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_answer_success() {
        let raw = json!({
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "你好！"},
                "finish_reason": "stop"
            }]
        });

        assert_eq!(extract_answer(&raw).unwrap(), "你好！");
    }

    #[test]
    fn test_extract_answer_null_content() {
        // 安全拦截时 content 为 null
        let raw = json!({
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": null},
                "finish_reason": "content_filter"
            }]
        });

        let err = extract_answer(&raw).unwrap_err();
        assert!(err.to_string().contains("安全策略"));
    }

    #[test]
    fn test_extract_answer_missing_choices() {
        let raw = json!({"promptFeedback": {"blockReason": "SAFETY"}});

        let err = extract_answer(&raw).unwrap_err();
        assert!(err.to_string().contains("choices[0].message.content"));
    }

    #[test]
    fn test_decode_error_with_status_field() {
        let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;

        let message = decode_error(400, body);
        assert_eq!(
            message,
            "Gemini API 错误 (HTTP 400, INVALID_ARGUMENT): API key not valid"
        );
    }

    #[test]
    fn test_decode_error_message_only() {
        let body = r#"{"error":{"message":"quota exceeded"}}"#;

        let message = decode_error(429, body);
        assert_eq!(message, "Gemini API 错误 (HTTP 429): quota exceeded");
    }

    #[test]
    fn test_decode_error_non_json_body() {
        let message = decode_error(502, "<html>bad gateway</html>");
        assert_eq!(message, "Gemini API 错误 (HTTP 502): <html>bad gateway</html>");
    }

    #[test]
    fn test_decode_error_empty_body() {
        let message = decode_error(500, "   ");
        assert_eq!(message, "Gemini API 错误 (HTTP 500)");
    }
}
