//! 反馈追加 - 业务能力层
//!
//! 只处理单个候选人的报告：
//! 1. 读取磁盘上的当前内容
//! 2. 已有反馈标记 → 跳过
//! 3. 否则构建指令、调用一次生成服务、把结果追加到报告末尾
//!
//! 标记是唯一的"已处理"依据，每次都从磁盘重新检查，不做缓存。

use crate::config::Config;
use crate::error::FeedbackError;
use crate::models::CandidateFolder;
use crate::services::llm_service::FeedbackGenerator;
use crate::utils::truncate_text;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// 单个候选人的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// 报告中已有反馈，未做任何修改
    AlreadyFed,
    /// 已生成并追加反馈
    Appended { report_path: PathBuf },
}

/// 反馈追加器
pub struct FeedbackAugmentor {
    generator: Box<dyn FeedbackGenerator>,
    marker: String,
    report_file_name: String,
    passing_threshold: u32,
}

impl FeedbackAugmentor {
    pub fn new(config: &Config, generator: Box<dyn FeedbackGenerator>) -> Self {
        Self {
            generator,
            marker: config.feedback_marker.clone(),
            report_file_name: config.report_file_name.clone(),
            passing_threshold: config.passing_threshold,
        }
    }

    pub fn report_file_name(&self) -> &str {
        &self.report_file_name
    }

    /// 报告中是否已有反馈
    pub fn has_feedback(&self, report_text: &str) -> bool {
        contains_marker(report_text, &self.marker)
    }

    /// 为一份报告文本生成待追加的反馈块
    ///
    /// 已有反馈时返回 None，不调用生成服务
    pub async fn feedback_block(
        &self,
        report_text: &str,
        candidate_name: &str,
    ) -> Result<Option<String>, FeedbackError> {
        if self.has_feedback(report_text) {
            return Ok(None);
        }

        let prompt = build_prompt(report_text, candidate_name, self.passing_threshold);
        debug!("[{}] 指令长度: {} 字符", candidate_name, prompt.len());

        let narrative = self
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| FeedbackError::external_call_failed(candidate_name, e))?;

        let narrative = narrative.trim();
        if narrative.is_empty() {
            return Err(FeedbackError::external_call_failed(
                candidate_name,
                "generation service returned no content",
            ));
        }

        debug!("[{}] 反馈预览: {}", candidate_name, truncate_text(narrative, 80));
        Ok(Some(format_feedback_block(&self.marker, narrative)))
    }

    /// 处理一个候选人目录
    pub async fn augment_folder(&self, folder: &CandidateFolder) -> Result<FeedbackOutcome, FeedbackError> {
        let report_path = folder.report_path(&self.report_file_name);

        let report_text = match fs::read_to_string(&report_path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(FeedbackError::MissingReport {
                    candidate: folder.display_name.clone(),
                    report_file: self.report_file_name.clone(),
                });
            }
            Err(source) => {
                return Err(FeedbackError::ReadFailed {
                    candidate: folder.display_name.clone(),
                    source,
                });
            }
        };

        if self.has_feedback(&report_text) {
            info!("✓ {} 的反馈已存在，跳过", folder.display_name);
            return Ok(FeedbackOutcome::AlreadyFed);
        }

        info!("🤖 正在为 {} 生成反馈...", folder.display_name);
        let Some(block) = self
            .feedback_block(&report_text, &folder.display_name)
            .await?
        else {
            return Ok(FeedbackOutcome::AlreadyFed);
        };

        append_to_report(&report_path, &block)
            .await
            .map_err(|source| FeedbackError::WriteFailed {
                candidate: folder.display_name.clone(),
                source,
            })?;

        info!("✓ 反馈已追加到 {}", report_path.display());
        Ok(FeedbackOutcome::Appended { report_path })
    }
}

async fn append_to_report(path: &std::path::Path, block: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().append(true).open(path).await?;
    file.write_all(block.as_bytes()).await?;
    file.flush().await
}

/// 逐行比较，忽略行内多余空白：`#  Feedback` 与 `# Feedback` 视为同一标记，
/// `## Feedback` 不是
pub fn contains_marker(text: &str, marker: &str) -> bool {
    let marker = normalize_heading(marker);
    text.lines().any(|line| normalize_heading(line) == marker)
}

fn normalize_heading(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 追加到报告末尾的反馈块
pub fn format_feedback_block(marker: &str, narrative: &str) -> String {
    format!("\n\n---\n\n{}\n\n{}", marker, narrative)
}

/// 构建生成指令
///
/// 输出只依赖输入，同一份报告总是得到同一条指令
pub fn build_prompt(evaluation_text: &str, candidate_name: &str, passing_threshold: u32) -> String {
    format!(
        r#"You are a senior technical interviewer writing feedback on a candidate's technical assessment.
Review the evaluation below for {candidate_name} and provide:

1. A summary of their strengths (2-3 bullet points)
2. Areas for improvement (2-3 bullet points)
3. An overall assessment (2-3 sentences)

HOW TO READ THE EVALUATION:
- Every criterion has a checkbox: [x] means the candidate met it, [ ] means they did not
- The value in parentheses after a checkbox, e.g. *(2.0)*, is the maximum points for that criterion
- A checked criterion earned exactly those points; an unchecked criterion earned 0 points
- "Total of Points" is the candidate's overall score
- The PASS / FAIL checkbox is the final result (PASS requires {passing_threshold} points or more)

GROUND RULES:
- Base the feedback ONLY on what is checked in the evaluation
- Do not credit the candidate with anything that is not explicitly marked [x]
- If a section has no checked items, the candidate showed no strengths in that section
- Give extra weight to Code Quality & Maintainability, Solution, and Tests
- Call out high-value unchecked criteria as the most important gaps

Examples:
- [x] Feature implemented correctly *(1.0)* = earned 1.0 point, mention as a strength
- [ ] Documentation complete *(2.0)* = earned 0 points, mention as an area for improvement

Evaluation to analyze:

{evaluation_text}

Count the [x] marks before writing. If there are none or very few, say so and focus on areas for improvement.

Format the response exactly as:

## Strengths
- (only items marked [x]; if there are few or none, say the submission showed limited strengths)

## Areas for Improvement
- (the most important unchecked items, especially high-value ones, and how to address them)

## Overall Assessment
(2-3 honest, constructive sentences based only on what was checked)
"#
    )
}
