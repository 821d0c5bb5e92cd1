use std::fmt::Display;
use std::path::{Path, PathBuf};

/// 候选人目录
///
/// 由目录枚举产生，运行期间不可变，程序从不删除它
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFolder {
    /// 原始目录名
    pub name: String,
    /// 展示用名称（下划线转空格，单词首字母大写）
    pub display_name: String,
    /// 目录完整路径
    pub path: PathBuf,
}

impl CandidateFolder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            display_name: display_name(&name),
            name,
            path,
        }
    }

    /// 评估报告文件路径
    pub fn report_path(&self, report_file_name: &str) -> PathBuf {
        self.path.join(report_file_name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Display for CandidateFolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (folder: {})", self.display_name, self.name)
    }
}

/// 目录名 → 展示名
///
/// 下划线替换为空格后按单词首字母大写：字母前一个字符不是字母时大写，否则小写。
/// `jane_doe` → `Jane Doe`，`MARY_o'neil` → `Mary O'Neil`
pub fn display_name(folder_name: &str) -> String {
    let mut out = String::with_capacity(folder_name.len());
    let mut prev_is_alpha = false;
    for c in folder_name.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(c);
            prev_is_alpha = false;
        }
    }
    out
}
