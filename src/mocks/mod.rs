//! 模拟外部接口
//!
//! 供候选人项目联调使用的两个无状态接口：
//! - `notification`：校验 status，延迟 4-8 秒后返回确认
//! - `payment`：延迟 1 秒，30% 概率返回 500
//!
//! 随机数和等待都通过基础设施层注入，测试可以强制走任意分支且不真正睡眠。

pub mod notification;
pub mod payment;

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

pub use notification::NotificationMock;
pub use payment::PaymentMock;

/// 查询参数
pub type QueryParams = HashMap<String, String>;

/// 模拟接口响应
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockResponse {
    pub status_code: u16,
    pub body: Value,
}

impl MockResponse {
    pub fn new(status_code: u16, body: Value) -> Self {
        Self { status_code, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// 取查询参数并转成小写；缺失或为空时返回 None
fn query_value(query: &QueryParams, key: &str) -> Option<String> {
    query
        .get(key)
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}
