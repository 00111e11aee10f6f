use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// AI 中继调用的指标收集器
#[derive(Debug, Default)]
pub struct Metrics {
    relay_requests: AtomicU64,
    relay_successful: AtomicU64,
    relay_failed: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次成功的中继调用
    pub fn record_success(&self) {
        self.relay_requests.fetch_add(1, Ordering::Relaxed);
        self.relay_successful.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录一次失败的中继调用
    pub fn record_failure(&self) {
        self.relay_requests.fetch_add(1, Ordering::Relaxed);
        self.relay_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// 导出 Prometheus 格式
    pub fn export_prometheus(&self) -> String {
        format!(
            "# HELP landing_zone_relay_requests_total Total number of relay requests\n\
             # TYPE landing_zone_relay_requests_total counter\n\
             landing_zone_relay_requests_total {}\n\
             # HELP landing_zone_relay_successful Successful relay requests\n\
             # TYPE landing_zone_relay_successful counter\n\
             landing_zone_relay_successful {}\n\
             # HELP landing_zone_relay_failed Failed relay requests\n\
             # TYPE landing_zone_relay_failed counter\n\
             landing_zone_relay_failed {}\n",
            self.relay_requests.load(Ordering::Relaxed),
            self.relay_successful.load(Ordering::Relaxed),
            self.relay_failed.load(Ordering::Relaxed)
        )
    }
}

/// 获取全局指标实例
pub fn global_metrics() -> &'static Arc<Metrics> {
    use once_cell::sync::Lazy;
    static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| Arc::new(Metrics::new()));
    &METRICS
}
