use crate::metrics;
use crate::relay;
use crate::server::AppState;
use crate::templates::{AiTestPage, IndexPage};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 对外上报的应用名，健康检查与日志共用
const APP_NAME: &str = "landing-zone-demo";

/// JSON 接口未带 q 参数时发送的默认问候
const DEFAULT_PROMPT: &str = "你好，只需回复 OK";

/// 处理 HTTP 请求的主路由
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, BoxError> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, "/") => Ok(home(&state)),
        (&Method::GET, "/health") => Ok(health_check(&state)),
        (&Method::GET, "/metrics") => Ok(metrics_endpoint()),
        (&Method::GET, "/ai-test") => Ok(ai_test_page(&state)),
        (&Method::POST, "/ai-test") => {
            let whole_body = req.collect().await?.to_bytes();
            let form = String::from_utf8_lossy(&whole_body).into_owned();
            Ok(ai_test_submit(&form, &state).await)
        }
        (&Method::GET, "/api/openai-test") => {
            let query = req.uri().query().map(str::to_string);
            Ok(api_openai_test(query.as_deref(), &state).await)
        }
        _ => Ok(not_found()),
    }
}

/// 首页：展示部署环境变量与提供商信息
fn home(state: &AppState) -> Response<Full<Bytes>> {
    let page = IndexPage {
        deploy: &state.deploy,
        provider: state.config.provider.name(),
        model: &state.config.model_id,
        configured: state.config.is_configured(),
    };
    render_or_500(page.render(&state.templates))
}

/// 健康检查端点，无论密钥是否配置都返回 200
fn health_check(state: &AppState) -> Response<Full<Bytes>> {
    let mut body = json!({
        "status": "healthy",
        "app": APP_NAME
    });
    if state.config.is_configured() {
        body["provider"] = json!(state.config.provider.name());
    }

    json_response(StatusCode::OK, &body)
}

/// 指标端点
fn metrics_endpoint() -> Response<Full<Bytes>> {
    let body = metrics::global_metrics().export_prometheus();

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// AI 测试页（GET）：只渲染表单
fn ai_test_page(state: &AppState) -> Response<Full<Bytes>> {
    let page = AiTestPage {
        provider: state.config.provider.name(),
        model: &state.config.model_id,
        answer: None,
        warning: None,
    };
    render_or_500(page.render(&state.templates))
}

/// AI 测试页（POST）：中继表单里的 prompt，结果嵌回页面
async fn ai_test_submit(form: &str, state: &AppState) -> Response<Full<Bytes>> {
    let metrics = metrics::global_metrics();
    let request_id = uuid::Uuid::new_v4();

    let prompt = form_value(form, "prompt").unwrap_or_default();
    info!("[{}] 表单中继请求（{} 字符）", request_id, prompt.chars().count());

    let (answer, warning) = match relay::relay(&state.config, &prompt).await {
        Ok(answer) => {
            metrics.record_success();
            info!("[{}] 中继成功", request_id);
            (Some(answer), None)
        }
        Err(e) => {
            metrics.record_failure();
            warn!("[{}] 中继失败: {}", request_id, e);
            (None, Some(format!("⚠️ {}", e)))
        }
    };

    let page = AiTestPage {
        provider: state.config.provider.name(),
        model: &state.config.model_id,
        answer,
        warning,
    };
    render_or_500(page.render(&state.templates))
}

/// JSON 接口：中继 q 参数指定的问题，空白视为未传
async fn api_openai_test(query: Option<&str>, state: &AppState) -> Response<Full<Bytes>> {
    let metrics = metrics::global_metrics();
    let request_id = uuid::Uuid::new_v4();

    let question = query
        .and_then(|query| form_value(query, "q"))
        .filter(|q| !q.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PROMPT.to_string());

    info!("[{}] JSON 中继请求", request_id);

    match relay::relay(&state.config, &question).await {
        Ok(answer) => {
            metrics.record_success();
            json_response(
                StatusCode::OK,
                &json!({
                    "status": "ok",
                    "question": question,
                    "answer": answer
                }),
            )
        }
        Err(e) => {
            metrics.record_failure();
            warn!("[{}] 中继失败: {}", request_id, e);
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({
                    "status": "error",
                    "error": e.to_string()
                }),
            )
        }
    }
}

/// 404 响应
fn not_found() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Full::new(Bytes::from("Not Found")))
        .unwrap()
}

fn html_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

fn json_response(status: StatusCode, body: &serde_json::Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

/// 渲染失败记日志并退化为 500，不向客户端暴露细节
fn render_or_500(result: crate::Result<String>) -> Response<Full<Bytes>> {
    match result {
        Ok(html) => html_response(StatusCode::OK, html),
        Err(e) => {
            error!("模板渲染失败: {}", e);
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Full::new(Bytes::from("Internal Server Error")))
                .unwrap()
        }
    }
}

/// 从 application/x-www-form-urlencoded 内容里取一个键的值
fn form_value(body: &str, key: &str) -> Option<String> {
    body.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        if name == key {
            Some(percent_decode(value))
        } else {
            None
        }
    })
}

/// 百分号解码，'+' 按空格处理，非法序列原样保留
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}
