use serde::{Deserialize, Serialize};

/// OpenAI 兼容的 chat-completion 出站请求体
///
/// 三个提供商（OpenAI / Groq / Gemini 兼容层）接受同一种请求格式，
/// 差异只在响应解析侧（见 `providers` 模块）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
}

/// 聊天消息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    /// 创建用户消息
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}
