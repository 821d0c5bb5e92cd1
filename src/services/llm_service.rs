//! LLM 服务 - 业务能力层
//!
//! 只负责"把一段指令发给 LLM 并拿回文本"，不关心候选人和文件
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Groq 等）

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;

/// 反馈文本生成能力
///
/// 单次调用：指令进，叙述文本出；失败即返回错误，不重试
#[async_trait]
pub trait FeedbackGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// LLM 服务
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    has_api_key: bool,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            has_api_key: !config.llm_api_key.trim().is_empty(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 发送单条用户消息
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    ///
    /// # 返回
    /// 返回去掉首尾空白的响应内容；内容为空视为失败
    pub async fn send_to_llm(&self, user_message: &str) -> Result<String> {
        if !self.has_api_key {
            anyhow::bail!("LLM_API_KEY 未配置");
        }

        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(self.temperature)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("LLM 返回内容为空"))?;

        let content = content.trim();
        if content.is_empty() {
            anyhow::bail!("LLM 返回内容为空");
        }

        Ok(content.to_string())
    }
}

#[async_trait]
impl FeedbackGenerator for LlmService {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.send_to_llm(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let service = LlmService::new(&Config::default());
        let err = service.generate("hello").await.unwrap_err();
        assert!(err.to_string().contains("LLM_API_KEY"));
    }

    /// 真实 API 调用
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_send_to_llm_live -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_send_to_llm_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env().unwrap();
        let service = LlmService::new(&config);

        let response = service
            .send_to_llm("Reply with the single word: ready")
            .await
            .unwrap();
        println!("LLM 响应: {}", response);
        assert!(!response.is_empty());
    }
}
