use crate::error::LandingZoneError;
use crate::Result;
use serde_json::Value;

/// 从 OpenAI 响应中提取首个 choice 的文本
///
/// 期望路径 choices[0].message.content，缺失或类型不符都算响应格式异常。
pub fn extract_answer(raw: &Value) -> Result<String> {
    raw.get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            LandingZoneError::provider("OpenAI 响应格式异常: 缺少 choices[0].message.content")
        })
}

/// 解读 OpenAI 错误响应体，优先取 error.message
pub fn decode_error(status: u16, body: &str) -> String {
    match error_message(body) {
        Some(message) => format!("OpenAI API 错误 (HTTP {}): {}", status, message),
        None if body.trim().is_empty() => format!("OpenAI API 错误 (HTTP {})", status),
        None => format!("OpenAI API 错误 (HTTP {}): {}", status, body.trim()),
    }
}

fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_answer_success() {
        let raw = json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hello! How can I help?"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30}
        });

        assert_eq!(extract_answer(&raw).unwrap(), "Hello! How can I help?");
    }

    #[test]
    fn test_extract_answer_missing_choices() {
        let raw = json!({"id": "chatcmpl-123", "object": "chat.completion"});

        let err = extract_answer(&raw).unwrap_err();
        assert!(matches!(err, LandingZoneError::ProviderError(_)));
        assert!(err.to_string().contains("choices[0].message.content"));
    }

    #[test]
    fn test_extract_answer_content_not_string() {
        let raw = json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": 42}}]
        });

        assert!(extract_answer(&raw).is_err());
    }

    #[test]
    fn test_decode_error_with_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;

        let message = decode_error(401, body);
        assert_eq!(
            message,
            "OpenAI API 错误 (HTTP 401): Incorrect API key provided"
        );
    }

    #[test]
    fn test_decode_error_non_json_body() {
        let message = decode_error(502, "Bad Gateway");
        assert_eq!(message, "OpenAI API 错误 (HTTP 502): Bad Gateway");
    }

    #[test]
    fn test_decode_error_empty_body() {
        let message = decode_error(500, "  ");
        assert_eq!(message, "OpenAI API 错误 (HTTP 500)");
    }
}
