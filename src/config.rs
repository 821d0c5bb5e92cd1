use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 程序配置
///
/// 加载顺序：默认值 → TOML 文件（可选）→ 环境变量 → 命令行参数
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 候选人目录所在的根目录
    pub root_dir: PathBuf,
    /// 每个候选人目录下的评估报告文件名
    pub report_file_name: String,
    /// 及格分数线
    pub passing_threshold: u32,
    /// 扫描时跳过的目录名（以 `.` 开头的目录总是跳过）
    pub excluded_dir_names: Vec<String>,
    /// 独立汇总文档路径（相对 root_dir）
    pub standalone_output: PathBuf,
    /// 需要原地替换结果段落的文档路径（相对 root_dir）
    pub readme_output: PathBuf,
    /// 结果段落起始标记
    pub results_section_start: String,
    /// 结果段落之后的下一个标题
    pub results_section_end: String,
    /// 反馈段落标题，同时作为"已处理"的唯一标记
    pub feedback_marker: String,
    /// 批量模式下两次外部调用之间的间隔（毫秒）
    pub feedback_pacing_ms: u64,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            report_file_name: "README.md".to_string(),
            passing_threshold: 28,
            excluded_dir_names: vec!["venv".to_string()],
            standalone_output: PathBuf::from("candidates.md"),
            readme_output: PathBuf::from("README.md"),
            results_section_start: "## Evaluation Results".to_string(),
            results_section_end: "## Overview".to_string(),
            feedback_marker: "# Feedback".to_string(),
            feedback_pacing_ms: 500,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.groq.com/openai/v1".to_string(),
            llm_model_name: "llama3-70b-8192".to_string(),
            llm_temperature: 0.5,
        }
    }
}

impl Config {
    /// 从默认值出发，应用环境变量覆盖
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides(|name| std::env::var(name).ok())
    }

    /// 读取 TOML 配置文件，再应用环境变量覆盖
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        base.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// 解析 TOML 配置文件，缺失的字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖配置
    ///
    /// `lookup` 可替换，测试时无需修改进程环境
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("GRADING_ROOT") {
            self.root_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("REPORT_FILE_NAME") {
            self.report_file_name = v;
        }
        if let Some(v) = lookup("PASSING_THRESHOLD") {
            self.passing_threshold = parse_env("PASSING_THRESHOLD", &v, "u32")?;
        }
        if let Some(v) = lookup("FEEDBACK_PACING_MS") {
            self.feedback_pacing_ms = parse_env("FEEDBACK_PACING_MS", &v, "u64")?;
        }
        if let Some(v) = lookup("LLM_API_KEY") {
            self.llm_api_key = v;
        }
        if let Some(v) = lookup("LLM_API_BASE_URL") {
            self.llm_api_base_url = v;
        }
        if let Some(v) = lookup("LLM_MODEL_NAME") {
            self.llm_model_name = v;
        }
        if let Some(v) = lookup("LLM_TEMPERATURE") {
            self.llm_temperature = parse_env("LLM_TEMPERATURE", &v, "f32")?;
        }
        Ok(self)
    }

    /// 独立汇总文档的完整路径
    pub fn standalone_output_path(&self) -> PathBuf {
        self.root_dir.join(&self.standalone_output)
    }

    /// 结果段落所在文档的完整路径
    pub fn readme_output_path(&self) -> PathBuf {
        self.root_dir.join(&self.readme_output)
    }
}

fn parse_env<T: std::str::FromStr>(var_name: &str, value: &str, expected_type: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::env_parse_failed(var_name, value, expected_type))
}
