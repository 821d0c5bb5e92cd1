use super::{query_value, MockResponse, QueryParams};
use crate::infrastructure::{Clock, RandomSource, ThreadRandom, TokioClock};
use serde_json::json;
use std::time::Duration;

const PROCESSING_DELAY: Duration = Duration::from_secs(1);
const FAILURE_PROBABILITY: f64 = 0.3;

/// 支付接口模拟
pub struct PaymentMock {
    random: Box<dyn RandomSource>,
    clock: Box<dyn Clock>,
}

impl PaymentMock {
    pub fn new(random: Box<dyn RandomSource>, clock: Box<dyn Clock>) -> Self {
        Self { random, clock }
    }

    /// 处理一次请求：固定延迟后，30% 概率返回 500
    pub async fn handle(&self, query: &QueryParams) -> MockResponse {
        let value = query_value(query, "value");

        self.clock.sleep(PROCESSING_DELAY).await;

        if self.random.next_unit() < FAILURE_PROBABILITY {
            return MockResponse::new(
                500,
                json!({ "success": false, "error": "Could not process the payment" }),
            );
        }

        MockResponse::new(
            200,
            json!({
                "success": true,
                "message": format!(
                    "The payment of {} was processed successfully",
                    value.as_deref().unwrap_or("none")
                ),
            }),
        )
    }
}

impl Default for PaymentMock {
    fn default() -> Self {
        Self::new(Box::new(ThreadRandom), Box::new(TokioClock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{FixedRandom, SeededRandom};

    fn query(value: &str) -> QueryParams {
        [("value".to_string(), value.to_string())].into_iter().collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_forced_failure() {
        let mock = PaymentMock::new(Box::new(FixedRandom(0.29)), Box::new(TokioClock));
        let response = mock.handle(&query("42.50")).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(response.body["success"], false);
    }

    #[tokio::test(start_paused = true)]
    async fn test_forced_success_echoes_value() {
        let mock = PaymentMock::new(Box::new(FixedRandom(0.3)), Box::new(TokioClock));
        let response = mock.handle(&query("USD 10")).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body["success"], true);
        assert_eq!(
            response.body["message"],
            "The payment of usd 10 was processed successfully"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_one_second() {
        let mock = PaymentMock::new(Box::new(FixedRandom(0.9)), Box::new(TokioClock));
        let started = tokio::time::Instant::now();
        mock.handle(&QueryParams::new()).await;
        assert!(started.elapsed() >= PROCESSING_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_rate_roughly_thirty_percent() {
        let mock = PaymentMock::new(Box::new(SeededRandom::new(7)), Box::new(TokioClock));
        let mut failures = 0;
        for _ in 0..1000 {
            if mock.handle(&query("1")).await.status_code == 500 {
                failures += 1;
            }
        }
        assert!((200..400).contains(&failures), "failures = {failures}");
    }
}
