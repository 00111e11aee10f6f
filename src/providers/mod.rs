pub mod gemini;
pub mod groq;
pub mod openai;

use crate::config::{Provider, ProviderConfig};
use crate::Result;
use serde_json::Value;

/// 从提供商成功响应中提取回答文本，按提供商变体分派
///
/// 交换提供商不改动中继逻辑，响应形态的差异全部收在各自模块里。
pub fn extract_answer(provider: Provider, raw: &Value) -> Result<String> {
    match provider {
        Provider::OpenAi => openai::extract_answer(raw),
        Provider::Groq => groq::extract_answer(raw),
        Provider::Gemini => gemini::extract_answer(raw),
    }
}

/// 把非 2xx 响应体解读成人类可读的错误信息，按提供商变体分派
pub fn decode_error(config: &ProviderConfig, status: u16, body: &str) -> String {
    match config.provider {
        Provider::OpenAi => openai::decode_error(status, body),
        Provider::Groq => groq::decode_error(config, status, body),
        Provider::Gemini => gemini::decode_error(status, body),
    }
}
