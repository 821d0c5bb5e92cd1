//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `grading_run` - 成绩汇总
//! - 扫描所有候选人目录（全部成功或整体失败）
//! - 排名、统计、写入汇总文档
//! - 输出控制台汇总
//!
//! ### `feedback_run` - 反馈生成
//! - 单个候选人模式：失败即退出
//! - 批量模式：单个失败只记录，按固定间隔调用外部服务
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator (处理所有候选人)
//!     ↓
//! services (能力层：extract / scan / report / llm / feedback)
//!     ↓
//! infrastructure (基础设施：Clock / RandomSource)
//! ```

pub mod feedback_run;
pub mod grading_run;

pub use feedback_run::{FeedbackRun, FeedbackStats};
pub use grading_run::{GradingOutcome, GradingRun};
