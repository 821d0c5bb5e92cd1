use serde::Serialize;
use std::cmp::Ordering;

/// 单个候选人的成绩记录
///
/// 每次运行都从评估报告重新计算，不单独持久化
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreRecord {
    /// 展示用名称
    pub candidate_name: String,
    /// 原始目录名
    pub folder_name: String,
    /// 总分
    pub points: u32,
    /// 是否及格（points >= 及格线）
    pub passed: bool,
}

impl ScoreRecord {
    pub fn new(
        candidate_name: impl Into<String>,
        folder_name: impl Into<String>,
        points: u32,
        passing_threshold: u32,
    ) -> Self {
        Self {
            candidate_name: candidate_name.into(),
            folder_name: folder_name.into(),
            points,
            passed: points >= passing_threshold,
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.passed {
            "PASS"
        } else {
            "FAIL"
        }
    }

    /// 排名顺序：分数降序，同分按展示名（忽略大小写）升序
    ///
    /// 展示名完全相同时再按目录名排序，保证结果确定
    pub fn ranking_cmp(&self, other: &Self) -> Ordering {
        other
            .points
            .cmp(&self.points)
            .then_with(|| {
                self.candidate_name
                    .to_lowercase()
                    .cmp(&other.candidate_name.to_lowercase())
            })
            .then_with(|| self.folder_name.cmp(&other.folder_name))
    }
}

/// 按排名规则排序
pub fn rank(records: &mut [ScoreRecord]) {
    records.sort_by(ScoreRecord::ranking_cmp);
}
