use crate::models::ScoreRecord;
use serde::Serialize;

/// 汇总统计
///
/// 每次运行基于完整成绩集合重新计算，没有增量状态
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub total_candidates: usize,
    pub total_points: u64,
    pub top_grade: u32,
    pub min_grade: u32,
    pub mean_grade: f64,
    pub median_grade: f64,
    pub passed_count: usize,
    pub failed_count: usize,
}

impl AggregateSummary {
    /// 计算汇总统计；空集合时各项为 0
    pub fn compute(records: &[ScoreRecord]) -> Self {
        let mut points: Vec<u32> = records.iter().map(|r| r.points).collect();
        points.sort_unstable();

        let total_candidates = points.len();
        let total_points: u64 = points.iter().map(|&p| u64::from(p)).sum();
        let passed_count = records.iter().filter(|r| r.passed).count();

        let mean_grade = if total_candidates == 0 {
            0.0
        } else {
            total_points as f64 / total_candidates as f64
        };

        Self {
            total_candidates,
            total_points,
            top_grade: points.last().copied().unwrap_or(0),
            min_grade: points.first().copied().unwrap_or(0),
            mean_grade,
            median_grade: median(&points),
            passed_count,
            failed_count: total_candidates - passed_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_candidates == 0
    }

    /// 及格率（百分比），无候选人时为 None
    pub fn pass_rate(&self) -> Option<f64> {
        percentage(self.passed_count, self.total_candidates)
    }

    /// 不及格率（百分比），无候选人时为 None
    pub fn fail_rate(&self) -> Option<f64> {
        percentage(self.failed_count, self.total_candidates)
    }
}

fn percentage(part: usize, total: usize) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(part as f64 / total as f64 * 100.0)
    }
}

/// 中位数：偶数个时取中间两个的平均值
///
/// `sorted` 必须已升序排列
fn median(sorted: &[u32]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        f64::from(sorted[n / 2])
    } else {
        (f64::from(sorted[n / 2 - 1]) + f64::from(sorted[n / 2])) / 2.0
    }
}

/// 整数值显示为整数，否则保留必要的小数
///
/// `28.0` → `28`，`28.5` → `28.5`
pub fn format_grade(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.2}", value);
        s.trim_end_matches('0').to_string()
    }
}
