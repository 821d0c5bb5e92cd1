//! 候选人扫描 - 业务能力层
//!
//! 枚举根目录下的候选人目录，逐个提取分数。
//! 任何一个候选人失败都会让整次扫描失败，不会返回部分结果。

use crate::config::Config;
use crate::error::GradingError;
use crate::models::{CandidateFolder, ScoreRecord};
use crate::services::score_extractor::extract_points;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// 候选人扫描器
pub struct CandidateScanner {
    report_file_name: String,
    passing_threshold: u32,
    excluded_dir_names: Vec<String>,
}

impl CandidateScanner {
    pub fn new(config: &Config) -> Self {
        Self {
            report_file_name: config.report_file_name.clone(),
            passing_threshold: config.passing_threshold,
            excluded_dir_names: config.excluded_dir_names.clone(),
        }
    }

    /// 扫描所有候选人目录并生成成绩记录
    ///
    /// 目录按名称排序后处理，因此"第一个出错的候选人"是确定的
    pub async fn scan(&self, root: &Path) -> Result<Vec<ScoreRecord>, GradingError> {
        let folders = list_candidate_folders(root, &self.excluded_dir_names)
            .await
            .map_err(|source| GradingError::RootUnreadable {
                path: root.display().to_string(),
                source,
            })?;

        info!("✓ 找到 {} 个候选人目录", folders.len());

        let mut records = Vec::with_capacity(folders.len());
        for folder in &folders {
            let record = self.grade_folder(folder).await?;
            debug!(
                "{} → {} 分 ({})",
                folder,
                record.points,
                record.status_label()
            );
            records.push(record);
        }

        Ok(records)
    }

    /// 读取单个候选人的报告并提取分数
    pub async fn grade_folder(&self, folder: &CandidateFolder) -> Result<ScoreRecord, GradingError> {
        let report_path = folder.report_path(&self.report_file_name);

        let content = match fs::read_to_string(&report_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(GradingError::MissingReport {
                    candidate: folder.display_name.clone(),
                    folder: folder.name.clone(),
                    report_file: self.report_file_name.clone(),
                });
            }
            Err(source) => {
                return Err(GradingError::ReportUnreadable {
                    candidate: folder.display_name.clone(),
                    folder: folder.name.clone(),
                    source,
                });
            }
        };

        let points = extract_points(&content).map_err(|source| GradingError::Extraction {
            candidate: folder.display_name.clone(),
            folder: folder.name.clone(),
            source,
        })?;

        Ok(ScoreRecord::new(
            folder.display_name.clone(),
            folder.name.clone(),
            points,
            self.passing_threshold,
        ))
    }
}

/// 枚举根目录下的候选人目录
///
/// 跳过非目录、以 `.` 开头的目录以及 `excluded` 中的目录名，结果按目录名排序
pub async fn list_candidate_folders(
    root: &Path,
    excluded: &[String],
) -> std::io::Result<Vec<CandidateFolder>> {
    let mut folders = Vec::new();
    let mut entries = fs::read_dir(root).await?;

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        if !is_candidate_name(&name, excluded) {
            continue;
        }
        // metadata 会跟随符号链接
        let is_dir = fs::metadata(entry.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if is_dir {
            folders.push(CandidateFolder::new(entry.path()));
        }
    }

    folders.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(folders)
}

/// 目录名是否可能是候选人目录
pub fn is_candidate_name(name: &str, excluded: &[String]) -> bool {
    !name.starts_with('.') && !excluded.iter().any(|e| e == name)
}
