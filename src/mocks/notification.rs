use super::{query_value, MockResponse, QueryParams};
use crate::infrastructure::{Clock, RandomSource, ThreadRandom, TokioClock};
use phf::phf_set;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// 允许的订单状态
pub static ALLOWED_STATUSES: phf::Set<&'static str> = phf_set! {
    "waiting",
    "preparation",
    "ready",
    "delivered",
    "canceled",
};

const MIN_DELAY_SECS: f64 = 4.0;
const MAX_DELAY_SECS: f64 = 8.0;

/// 通知接口模拟
pub struct NotificationMock {
    random: Box<dyn RandomSource>,
    clock: Box<dyn Clock>,
}

impl NotificationMock {
    pub fn new(random: Box<dyn RandomSource>, clock: Box<dyn Clock>) -> Self {
        Self { random, clock }
    }

    /// 处理一次请求
    ///
    /// 参数校验失败立即返回 400，不等待
    pub async fn handle(&self, query: &QueryParams) -> MockResponse {
        let Some(status) = query_value(query, "status") else {
            return MockResponse::new(
                400,
                json!({ "error": "Missing required query parameter: status" }),
            );
        };

        if !ALLOWED_STATUSES.contains(status.as_str()) {
            return MockResponse::new(
                400,
                json!({
                    "error": format!(
                        "Invalid status '{}'. Allowed values: {}",
                        status,
                        allowed_statuses().join(", ")
                    )
                }),
            );
        }

        let delay = Duration::from_secs_f64(self.random.uniform(MIN_DELAY_SECS, MAX_DELAY_SECS));
        debug!("通知接口模拟延迟 {:?}", delay);
        self.clock.sleep(delay).await;

        MockResponse::new(
            200,
            json!({ "message": format!("The email was sent with the status {}", status) }),
        )
    }
}

impl Default for NotificationMock {
    fn default() -> Self {
        Self::new(Box::new(ThreadRandom), Box::new(TokioClock))
    }
}

/// 按字母序排列的允许状态
pub fn allowed_statuses() -> Vec<&'static str> {
    let mut statuses: Vec<_> = ALLOWED_STATUSES.iter().copied().collect();
    statuses.sort_unstable();
    statuses
}
