use clap::Parser;
use landing_zone_demo::config::{DeployInfo, Provider, ProviderConfig};
use landing_zone_demo::server::{self, AppState};
use landing_zone_demo::templates::Templates;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "landing-zone-demo")]
#[command(about = "云落地区演示应用（App Service 环境展示 + AI 聊天中继）", long_about = None)]
struct Args {
    /// AI 提供商（openai、gemini 或 groq），缺省读 AI_PROVIDER
    #[arg(short, long)]
    provider: Option<String>,

    /// 监听地址
    #[arg(short, long, default_value = "0.0.0.0:8000")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // 解析命令行参数
    let args = Args::parse();

    // 提供商选择：命令行参数优先于 AI_PROVIDER 环境变量
    let provider_name = args
        .provider
        .or_else(|| std::env::var("AI_PROVIDER").ok())
        .unwrap_or_else(|| "openai".to_string());
    let provider = Provider::parse(&provider_name)?;

    // 密钥缺失不阻止启动，健康检查与页面仍需可用
    let config = ProviderConfig::resolve(provider)
        .unwrap_or_else(|_| ProviderConfig::unconfigured(provider));
    info!(
        "AI 提供商: {}（模型: {}，密钥{}）",
        provider.name(),
        config.model_id,
        if config.is_configured() { "已配置" } else { "未配置" }
    );

    let state = Arc::new(AppState {
        config,
        deploy: DeployInfo::from_env(),
        templates: Templates::new(),
    });

    // 解析监听地址
    let addr: SocketAddr = args.bind.parse()?;

    // 启动服务器
    server::start_server(state, addr).await?;

    Ok(())
}
