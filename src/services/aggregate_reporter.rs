//! 汇总报告 - 业务能力层
//!
//! 负责排名、统计和文档渲染。两种输出方式实现同一个 [`RenderStrategy`]：
//! - [`StandaloneDocument`]：生成独立的汇总文档（统计表 + 完整排名表）
//! - [`SectionReplace`]：在已有文档中原地替换结果段落
//!
//! 写入失败只产生警告，不影响运行结果。

use crate::config::Config;
use crate::error::ReportError;
use crate::models::summary::format_grade;
use crate::models::{rank, AggregateSummary, ScoreRecord};
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// 排名后的完整成绩集合
#[derive(Debug, Clone)]
pub struct GradingReport {
    pub ranked: Vec<ScoreRecord>,
    pub summary: AggregateSummary,
    pub generated_on: NaiveDate,
}

impl GradingReport {
    /// 对成绩排序并计算统计
    pub fn build(mut records: Vec<ScoreRecord>, generated_on: NaiveDate) -> Self {
        rank(&mut records);
        let summary = AggregateSummary::compute(&records);
        Self {
            ranked: records,
            summary,
            generated_on,
        }
    }
}

/// 文档渲染策略
pub trait RenderStrategy: Send + Sync {
    /// 输出文档路径
    fn target_path(&self) -> &Path;

    /// 是否需要基于已有文档渲染
    fn needs_existing(&self) -> bool;

    /// 渲染新文档；`existing` 为目标路径上的当前内容
    fn render(&self, report: &GradingReport, existing: Option<&str>) -> Result<String, ReportError>;
}

/// 输出方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RenderMode {
    /// 独立汇总文档
    #[default]
    Standalone,
    /// 原地更新 README 结果段落
    Readme,
    /// 两者都输出
    Both,
}

/// 发布结果
#[derive(Debug, Default)]
pub struct PublishOutcome {
    pub written: Vec<PathBuf>,
    pub warnings: Vec<ReportError>,
}

/// 汇总报告发布器
pub struct AggregateReporter {
    strategies: Vec<Box<dyn RenderStrategy>>,
}

impl AggregateReporter {
    pub fn new(strategies: Vec<Box<dyn RenderStrategy>>) -> Self {
        Self { strategies }
    }

    /// 按配置和输出方式创建
    pub fn from_config(config: &Config, mode: RenderMode) -> Self {
        let mut strategies: Vec<Box<dyn RenderStrategy>> = Vec::new();
        if matches!(mode, RenderMode::Standalone | RenderMode::Both) {
            strategies.push(Box::new(StandaloneDocument::new(config.standalone_output_path())));
        }
        if matches!(mode, RenderMode::Readme | RenderMode::Both) {
            strategies.push(Box::new(SectionReplace::new(
                config.readme_output_path(),
                &config.results_section_start,
                &config.results_section_end,
            )));
        }
        Self::new(strategies)
    }

    /// 渲染并写入所有文档
    ///
    /// 每个策略独立执行，失败记为警告
    pub async fn publish(&self, report: &GradingReport) -> PublishOutcome {
        let mut outcome = PublishOutcome::default();

        for strategy in &self.strategies {
            let path = strategy.target_path();
            match publish_one(strategy.as_ref(), report).await {
                Ok(()) => {
                    info!("📝 已更新汇总文档: {}", path.display());
                    outcome.written.push(path.to_path_buf());
                }
                Err(e) => {
                    warn!("⚠️ {}", e);
                    outcome.warnings.push(e);
                }
            }
        }

        outcome
    }
}

async fn publish_one(strategy: &dyn RenderStrategy, report: &GradingReport) -> Result<(), ReportError> {
    let path = strategy.target_path();

    let existing = if strategy.needs_existing() {
        match fs::read_to_string(path).await {
            Ok(content) => Some(content),
            Err(source) => {
                return Err(ReportError::ReadFailed {
                    path: path.display().to_string(),
                    source,
                })
            }
        }
    } else {
        None
    };

    let document = strategy.render(report, existing.as_deref())?;

    fs::write(path, document)
        .await
        .map_err(|source| ReportError::WriteFailed {
            path: path.display().to_string(),
            source,
        })
}

// ========== 独立文档 ==========

/// 独立汇总文档：标题、时间戳、统计表、排名表
pub struct StandaloneDocument {
    path: PathBuf,
}

impl StandaloneDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RenderStrategy for StandaloneDocument {
    fn target_path(&self) -> &Path {
        &self.path
    }

    fn needs_existing(&self) -> bool {
        false
    }

    fn render(&self, report: &GradingReport, _existing: Option<&str>) -> Result<String, ReportError> {
        Ok(render_standalone(report))
    }
}

pub fn render_standalone(report: &GradingReport) -> String {
    let summary = &report.summary;
    let mut doc = format!(
        "# Candidate Evaluation Results\n\n*Last updated: {}*\n\n",
        report.generated_on.format("%Y-%m-%d")
    );

    let (Some(pass_rate), Some(fail_rate)) = (summary.pass_rate(), summary.fail_rate()) else {
        doc.push_str("No candidates evaluated.\n");
        return doc;
    };

    let _ = write!(
        doc,
        "## Summary Statistics\n\n\
         | Metric | Value |\n\
         |--------|-------|\n\
         | Total candidates | {} |\n\
         | Top grade | {} |\n\
         | Minimum grade | {} |\n\
         | Average grade | {:.2} |\n\
         | Median grade | {} |\n\
         | Approved candidates | {} ({:.1}%) |\n\
         | Failed candidates | {} ({:.1}%) |\n\n",
        summary.total_candidates,
        summary.top_grade,
        summary.min_grade,
        summary.mean_grade,
        format_grade(summary.median_grade),
        summary.passed_count,
        pass_rate,
        summary.failed_count,
        fail_rate,
    );

    doc.push_str("## All Candidates\n\n| Candidate | Grade | Status |\n|-----------|-------|--------|\n");
    for record in &report.ranked {
        let _ = writeln!(
            doc,
            "| {} | {} | {} |",
            record.candidate_name,
            record.points,
            record.status_label()
        );
    }

    doc
}

// ========== 段落替换 ==========

/// 在已有文档中替换 `start` 与其后第一个 `end` 标题之间的内容
///
/// 没有 `start` 时，把段落插到第一个一级标题之后
pub struct SectionReplace {
    path: PathBuf,
    start_marker: String,
    end_marker: String,
}

impl SectionReplace {
    pub fn new(path: impl Into<PathBuf>, start_marker: &str, end_marker: &str) -> Self {
        Self {
            path: path.into(),
            start_marker: start_marker.to_string(),
            end_marker: end_marker.to_string(),
        }
    }

    /// 渲染结果段落（以起始标记开头）
    pub fn render_section(&self, report: &GradingReport) -> String {
        let summary = &report.summary;
        let mut section = format!(
            "{}\n\n*Last updated: {}*\n\n### Summary Statistics\n",
            self.start_marker,
            report.generated_on.format("%Y-%m-%d")
        );

        match (summary.pass_rate(), summary.fail_rate()) {
            (Some(pass_rate), Some(fail_rate)) => {
                let _ = write!(
                    section,
                    "- **Total candidates evaluated:** {}\n\
                     - **Average score:** {:.2} points\n\
                     - **Pass rate:** {}/{} ({:.1}%)\n\
                     - **Failed candidates:** {} ({:.1}%)\n\n",
                    summary.total_candidates,
                    summary.mean_grade,
                    summary.passed_count,
                    summary.total_candidates,
                    pass_rate,
                    summary.failed_count,
                    fail_rate,
                );
            }
            _ => section.push_str("- No candidates evaluated.\n\n"),
        }

        section
    }
}

impl RenderStrategy for SectionReplace {
    fn target_path(&self) -> &Path {
        &self.path
    }

    fn needs_existing(&self) -> bool {
        true
    }

    fn render(&self, report: &GradingReport, existing: Option<&str>) -> Result<String, ReportError> {
        let existing = existing.unwrap_or_default();
        let section = self.render_section(report);
        replace_section(existing, &self.start_marker, &self.end_marker, &section).ok_or_else(|| {
            ReportError::UnterminatedSection {
                path: self.path.display().to_string(),
                start: self.start_marker.clone(),
                end: self.end_marker.clone(),
            }
        })
    }
}

/// 替换 `start` 行到下一个 `end` 行之间的内容
///
/// 只做字符串切片拼接，`section` 中的任何字符都原样写入。
/// 有 `start` 但后面没有 `end` 时返回 None，文档保持不变。
pub fn replace_section(document: &str, start: &str, end: &str, section: &str) -> Option<String> {
    let Some(start_at) = find_line_start(document, start, 0) else {
        return Some(insert_after_title(document, section));
    };

    let end_at = find_line_start(document, end, start_at + start.len())?;

    let mut out = String::with_capacity(document.len() + section.len());
    out.push_str(&document[..start_at]);
    out.push_str(section);
    out.push_str(&document[end_at..]);
    Some(out)
}

/// 在 `from` 之后查找独占一行的 `marker`（允许行尾空白）
fn find_line_start(document: &str, marker: &str, from: usize) -> Option<usize> {
    document[from..]
        .match_indices(marker)
        .map(|(i, _)| from + i)
        .find(|&i| {
            let at_line_start = i == 0 || document[..i].ends_with('\n');
            let tail = document[i + marker.len()..].split('\n').next().unwrap_or_default();
            at_line_start && tail.trim().is_empty()
        })
}

/// 把段落插到第一个一级标题（`# `）所在行之后；没有标题时放在文档开头
fn insert_after_title(document: &str, section: &str) -> String {
    let mut offset = 0;
    for line in document.split_inclusive('\n') {
        if line.starts_with("# ") {
            let head_end = offset + line.len();
            let mut out = String::with_capacity(document.len() + section.len() + 2);
            out.push_str(&document[..head_end]);
            if !line.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
            out.push_str(section);
            out.push_str(&document[head_end..]);
            return out;
        }
        offset += line.len();
    }

    format!("{}{}", section, document)
}
