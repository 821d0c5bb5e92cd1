use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 成绩扫描错误
    #[error(transparent)]
    Grading(#[from] GradingError),
    /// 汇总报告错误
    #[error(transparent)]
    Report(#[from] ReportError),
    /// 反馈生成错误
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// 分数提取错误
///
/// 只描述"这段文本里为什么拿不到分数"，不包含候选人信息
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// 找不到 "Total of Points" 字段
    #[error("Total points field not found")]
    NotFound,
    /// 字段存在但值为空
    #[error("Total points field is empty")]
    Empty,
    /// 字段值无法转换为整数
    #[error("Total points value '{value}' is not a valid integer")]
    Malformed { value: String },
}

/// 成绩扫描错误
///
/// 任何一个都会让整次扫描失败，不会产生部分统计
#[derive(Debug, Error)]
pub enum GradingError {
    /// 根目录无法读取
    #[error("Cannot read candidate root '{path}': {source}")]
    RootUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 候选人目录缺少报告文件
    #[error("Candidate '{candidate}' (folder: {folder}) is missing a {report_file} file")]
    MissingReport {
        candidate: String,
        folder: String,
        report_file: String,
    },
    /// 报告文件读取失败
    #[error("Error grading candidate '{candidate}' (folder: {folder}): error reading report file: {source}")]
    ReportUnreadable {
        candidate: String,
        folder: String,
        #[source]
        source: std::io::Error,
    },
    /// 分数提取失败
    #[error("Error grading candidate '{candidate}' (folder: {folder}): {source}")]
    Extraction {
        candidate: String,
        folder: String,
        #[source]
        source: ExtractionError,
    },
}

/// 汇总报告错误（只产生警告，不影响退出码）
#[derive(Debug, Error)]
pub enum ReportError {
    /// 读取已有文档失败
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文档失败
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 找到了起始标记但没有结束标记
    #[error("Found '{start}' in {path} but no following '{end}' heading")]
    UnterminatedSection {
        path: String,
        start: String,
        end: String,
    },
}

/// 反馈生成错误
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// 根目录无法读取
    #[error("Cannot read candidate root '{path}': {source}")]
    RootUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 指定的候选人目录不存在
    #[error("Candidate folder '{folder}' not found")]
    CandidateFolderNotFound { folder: String },
    /// 候选人目录缺少报告文件
    #[error("Candidate {candidate} is missing a {report_file} file")]
    MissingReport {
        candidate: String,
        report_file: String,
    },
    /// 读取报告失败
    #[error("Error reading evaluation file for {candidate}: {source}")]
    ReadFailed {
        candidate: String,
        #[source]
        source: std::io::Error,
    },
    /// 调用外部生成服务失败
    #[error("Feedback generation failed for {candidate}: {reason}")]
    ExternalCallFailed { candidate: String, reason: String },
    /// 追加反馈失败
    #[error("Error updating report with feedback for {candidate}: {source}")]
    WriteFailed {
        candidate: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("Environment variable {var_name} has value '{value}' which is not a valid {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("Cannot read config file {path}: {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("Cannot parse config file {path}: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl FeedbackError {
    /// 创建外部调用失败错误
    pub fn external_call_failed(candidate: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        FeedbackError::ExternalCallFailed {
            candidate: candidate.into(),
            reason: reason.to_string(),
        }
    }
}

impl ConfigError {
    /// 创建环境变量解析错误
    pub fn env_parse_failed(
        var_name: impl Into<String>,
        value: impl Into<String>,
        expected_type: impl Into<String>,
    ) -> Self {
        ConfigError::EnvVarParseFailed {
            var_name: var_name.into(),
            value: value.into(),
            expected_type: expected_type.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grading_error_names_candidate_and_folder() {
        let err = GradingError::Extraction {
            candidate: "Jane Doe".to_string(),
            folder: "jane_doe".to_string(),
            source: ExtractionError::NotFound,
        };
        assert_eq!(
            err.to_string(),
            "Error grading candidate 'Jane Doe' (folder: jane_doe): Total points field not found"
        );
    }

    #[test]
    fn test_app_error_is_transparent() {
        let err: AppError = FeedbackError::CandidateFolderNotFound {
            folder: "ghost".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Candidate folder 'ghost' not found");
    }
}
