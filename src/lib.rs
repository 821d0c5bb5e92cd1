//! # Candidate Grading
//!
//! 技术测评仓库的成绩汇总与反馈追加工具
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 只暴露能力：等待（`Clock`）与随机数（`RandomSource`）
//!
//! ### ② 业务能力层（Services）
//! - `score_extractor` - 从一份报告中提取 "Total of Points"
//! - `CandidateScanner` - 扫描候选人目录，全部成功或整体失败
//! - `AggregateReporter` - 排名、统计、渲染汇总文档
//! - `LlmService` - 调用 LLM 生成反馈文本
//! - `FeedbackAugmentor` - 为单个候选人追加反馈（幂等）
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/grading_run` - 成绩汇总流程
//! - `orchestrator/feedback_run` - 单个 / 批量反馈流程
//!
//! ### 其他
//! - `mocks/` - 供候选人项目联调的模拟接口（通知、支付）
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod mocks;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AggregateSummary, CandidateFolder, ScoreRecord};
pub use orchestrator::{FeedbackRun, FeedbackStats, GradingOutcome, GradingRun};
pub use services::{FeedbackAugmentor, FeedbackOutcome, LlmService, RenderMode};
