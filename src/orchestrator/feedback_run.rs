//! 反馈生成流程 - 编排层
//!
//! ## 两种模式
//!
//! - 单个候选人：任何失败都直接返回错误
//! - 批量：逐个处理所有候选人目录，单个失败只记录并继续；
//!   两次外部调用之间固定等待一段时间
//!
//! 每个候选人的处理互相独立，重复运行不会产生重复反馈。

use crate::config::Config;
use crate::error::FeedbackError;
use crate::infrastructure::Clock;
use crate::models::CandidateFolder;
use crate::services::candidate_scanner::list_candidate_folders;
use crate::services::feedback_augmentor::{FeedbackAugmentor, FeedbackOutcome};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tracing::{error, info, warn};

/// 批量处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackStats {
    /// 新生成反馈
    pub processed: usize,
    /// 已有反馈而跳过
    pub skipped: usize,
    /// 缺少报告文件而跳过
    pub missing: usize,
    /// 生成或写入失败
    pub failed: usize,
}

/// 反馈生成流程
pub struct FeedbackRun {
    root_dir: PathBuf,
    excluded_dir_names: Vec<String>,
    pacing: Duration,
    augmentor: FeedbackAugmentor,
    clock: Box<dyn Clock>,
}

impl FeedbackRun {
    pub fn new(config: &Config, augmentor: FeedbackAugmentor, clock: Box<dyn Clock>) -> Self {
        Self {
            root_dir: config.root_dir.clone(),
            excluded_dir_names: config.excluded_dir_names.clone(),
            pacing: Duration::from_millis(config.feedback_pacing_ms),
            augmentor,
            clock,
        }
    }

    /// 处理指定的候选人目录
    pub async fn run_single(&self, folder_name: &str) -> Result<FeedbackOutcome, FeedbackError> {
        let path = self.root_dir.join(folder_name);
        let is_dir = fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false);
        if !is_dir {
            return Err(FeedbackError::CandidateFolderNotFound {
                folder: folder_name.to_string(),
            });
        }

        let folder = CandidateFolder::new(path);
        let outcome = self.augmentor.augment_folder(&folder).await?;

        match &outcome {
            FeedbackOutcome::AlreadyFed => {
                println!("Feedback for {} already exists. Skipping...", folder.display_name);
            }
            FeedbackOutcome::Appended { report_path } => {
                println!("\nFeedback generated for {}!", folder_name);
                println!("Feedback saved to: {}", report_path.display());
            }
        }

        Ok(outcome)
    }

    /// 处理所有候选人目录
    ///
    /// 只有根目录无法读取时返回错误
    pub async fn run_batch(&self) -> Result<FeedbackStats, FeedbackError> {
        let folders = list_candidate_folders(&self.root_dir, &self.excluded_dir_names)
            .await
            .map_err(|source| FeedbackError::RootUnreadable {
                path: self.root_dir.display().to_string(),
                source,
            })?;

        println!("\n=== Generating AI Feedback for All Candidates ===\n");

        let mut stats = FeedbackStats::default();
        for (idx, folder) in folders.iter().enumerate() {
            let called_service = match self.augmentor.augment_folder(folder).await {
                Ok(FeedbackOutcome::AlreadyFed) => {
                    println!("✓ Skipping {}: feedback already exists", folder.name);
                    stats.skipped += 1;
                    false
                }
                Ok(FeedbackOutcome::Appended { report_path }) => {
                    println!("✓ Feedback saved to: {}", report_path.display());
                    stats.processed += 1;
                    true
                }
                Err(FeedbackError::MissingReport { .. }) => {
                    println!(
                        "✗ Skipping {}: no {} file found",
                        folder.name,
                        self.augmentor.report_file_name()
                    );
                    warn!("⚠️ {} 缺少报告文件", folder);
                    stats.missing += 1;
                    false
                }
                Err(e) => {
                    println!("✗ Error for {}: {}", folder.name, e);
                    error!("❌ {}", e);
                    stats.failed += 1;
                    // 写入失败发生在生成调用之后，同样需要间隔
                    matches!(
                        e,
                        FeedbackError::ExternalCallFailed { .. } | FeedbackError::WriteFailed { .. }
                    )
                }
            };

            if called_service && idx + 1 < folders.len() {
                self.clock.sleep(self.pacing).await;
            }
        }

        info!(
            "批量反馈完成: 生成 {}，跳过 {}，缺少报告 {}，失败 {}",
            stats.processed, stats.skipped, stats.missing, stats.failed
        );

        Ok(stats)
    }
}
