//! 分数提取 - 业务能力层
//!
//! 只负责"从一份报告文本中拿到总分"，不关心文件和候选人

use crate::error::ExtractionError;
use regex::Regex;
use std::sync::LazyLock;

static TOTAL_POINTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)total\s+of\s+points:\s*(\d+)").expect("total points pattern is valid")
});

static TOTAL_POINTS_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)total\s+of\s+points:").expect("total points label pattern is valid")
});

/// 从报告文本中提取 "Total of Points: N"
///
/// - 标签大小写不敏感，取第一个带数字的匹配
/// - 标签不存在 → `NotFound`
/// - 标签后都没有值 → `Empty`
/// - 值不是合法整数 → `Malformed`
///
/// 不会用默认分数兜底
pub fn extract_points(text: &str) -> Result<u32, ExtractionError> {
    if let Some(digits) = TOTAL_POINTS.captures(text).and_then(|caps| caps.get(1)) {
        let digits = digits.as_str();
        return digits.parse::<u32>().map_err(|_| ExtractionError::Malformed {
            value: digits.to_string(),
        });
    }

    let label = TOTAL_POINTS_LABEL
        .find(text)
        .ok_or(ExtractionError::NotFound)?;
    Err(classify_missing_value(&text[label.end()..]))
}

/// 没有任何标签带数字时，根据第一个标签后的内容区分空值和非法值
fn classify_missing_value(rest: &str) -> ExtractionError {
    let value = rest.trim_start();
    let crossed_line = rest[..rest.len() - value.len()].contains('\n');

    // 同一行里没有值视为空；换行后的内容属于别的字段
    if value.is_empty() || crossed_line {
        return ExtractionError::Empty;
    }

    let token = value.split_whitespace().next().unwrap_or_default();
    ExtractionError::Malformed {
        value: token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple() {
        assert_eq!(extract_points("Total of Points: 32"), Ok(32));
        assert_eq!(extract_points("total OF points:7\n"), Ok(7));
        assert_eq!(extract_points("Total  of\tPoints:   0"), Ok(0));
    }

    #[test]
    fn test_extract_from_report() {
        let report = "# Evaluation\n\n- [x] Tests written *(2.0)*\n- [ ] Docs *(1.0)*\n\nTotal of Points: 29\n\n- [x] PASS\n";
        assert_eq!(extract_points(report), Ok(29));
    }

    #[test]
    fn test_first_match_wins() {
        let report = "Total of Points: 12\nTotal of Points: 40\n";
        assert_eq!(extract_points(report), Ok(12));
    }

    #[test]
    fn test_value_on_next_line_is_accepted() {
        assert_eq!(extract_points("Total of Points:\n  31\n"), Ok(31));
    }

    #[test]
    fn test_missing_label() {
        assert_eq!(extract_points("# Evaluation\nScore: 30"), Err(ExtractionError::NotFound));
        assert_eq!(extract_points(""), Err(ExtractionError::NotFound));
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(extract_points("Total of Points:"), Err(ExtractionError::Empty));
        assert_eq!(extract_points("Total of Points:   \n"), Err(ExtractionError::Empty));
        assert_eq!(
            extract_points("Total of Points: \n\n## Next section"),
            Err(ExtractionError::Empty)
        );
    }

    #[test]
    fn test_malformed_value() {
        assert_eq!(
            extract_points("Total of Points: thirty"),
            Err(ExtractionError::Malformed {
                value: "thirty".to_string()
            })
        );
        assert!(matches!(
            extract_points("Total of Points: 99999999999999"),
            Err(ExtractionError::Malformed { .. })
        ));
    }

    #[test]
    fn test_decimal_keeps_integer_part() {
        assert_eq!(extract_points("Total of Points: 28.5"), Ok(28));
    }

    #[test]
    fn test_placeholder_label_before_real_score() {
        let report = "Total of Points: (fill in)\n\n## Criteria\n\nTotal of Points: 30\n";
        assert_eq!(extract_points(report), Ok(30));
    }

    #[test]
    fn test_blank_label_before_real_score() {
        let report = "Total of Points:\n\n## Criteria\n\nTotal of Points: 29\n";
        assert_eq!(extract_points(report), Ok(29));
    }

    #[test]
    fn test_placeholder_only_is_malformed() {
        assert_eq!(
            extract_points("Total of Points: (fill in)\n"),
            Err(ExtractionError::Malformed {
                value: "(fill".to_string()
            })
        );
    }
}
