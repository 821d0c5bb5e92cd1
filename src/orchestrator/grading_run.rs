//! 成绩汇总流程 - 编排层
//!
//! 扫描 → 提取 → 校验 → 汇总 → 发布。
//! 扫描失败直接返回错误，不会对不完整的候选人集合输出统计；
//! 文档写入失败只记为警告。

use crate::config::Config;
use crate::error::GradingError;
use crate::services::aggregate_reporter::{
    AggregateReporter, GradingReport, PublishOutcome, RenderMode,
};
use crate::services::CandidateScanner;
use crate::utils::logging::print_grading_summary;
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

/// 汇总流程的结果
#[derive(Debug)]
pub enum GradingOutcome {
    /// 没有候选人目录，未写任何文档
    NoCandidates,
    /// 完成汇总
    Completed {
        report: GradingReport,
        publish: PublishOutcome,
    },
}

/// 成绩汇总流程
pub struct GradingRun {
    config: Config,
    scanner: CandidateScanner,
    reporter: AggregateReporter,
}

impl GradingRun {
    pub fn new(config: Config, mode: RenderMode) -> Self {
        Self {
            scanner: CandidateScanner::new(&config),
            reporter: AggregateReporter::from_config(&config, mode),
            config,
        }
    }

    /// 使用当天日期运行
    pub async fn run(&self) -> Result<GradingOutcome, GradingError> {
        self.run_on(Local::now().date_naive()).await
    }

    /// 指定报告日期运行
    pub async fn run_on(&self, generated_on: NaiveDate) -> Result<GradingOutcome, GradingError> {
        info!("\n📁 正在扫描候选人目录...");
        let records = self.scanner.scan(&self.config.root_dir).await?;

        if records.is_empty() {
            println!("No candidate directories found.");
            return Ok(GradingOutcome::NoCandidates);
        }

        let report = GradingReport::build(records, generated_on);
        print_grading_summary(&report.summary);

        let publish = self.reporter.publish(&report).await;
        for warning in &publish.warnings {
            println!("WARNING: {}", warning);
        }
        if !publish.warnings.is_empty() {
            warn!("⚠️ {} 个汇总文档未能更新", publish.warnings.len());
        }

        Ok(GradingOutcome::Completed { report, publish })
    }
}
