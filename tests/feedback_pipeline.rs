use async_trait::async_trait;
use candidate_grading::error::FeedbackError;
use candidate_grading::infrastructure::RecordingClock;
use candidate_grading::services::FeedbackGenerator;
use candidate_grading::{Config, FeedbackAugmentor, FeedbackOutcome, FeedbackRun, FeedbackStats};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

/// 对指定候选人返回失败，其余返回固定反馈
struct ScriptedGenerator {
    fail_for: Option<&'static str>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl FeedbackGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(name) = self.fail_for {
            if prompt.contains(&format!("for {name} and provide")) {
                anyhow::bail!("500 Internal Server Error");
            }
        }
        Ok("## Strengths\n- Clear tests\n\n## Areas for Improvement\n- Docs\n\n## Overall Assessment\nSolid.".to_string())
    }
}

/// 生成期间删除指定候选人的报告，使随后的追加写入失败
struct VanishingReportGenerator {
    report_path: std::path::PathBuf,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl FeedbackGenerator for VanishingReportGenerator {
    async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = fs::remove_file(&self.report_path);
        Ok("## Strengths\n- Tests".to_string())
    }
}

struct Harness {
    run: FeedbackRun,
    calls: Arc<AtomicUsize>,
    clock: Arc<RecordingClock>,
}

fn harness(root: &Path, fail_for: Option<&'static str>) -> Harness {
    let config = Config {
        root_dir: root.to_path_buf(),
        ..Config::default()
    };
    let calls = Arc::new(AtomicUsize::new(0));
    let clock = Arc::new(RecordingClock::new());
    let generator = ScriptedGenerator {
        fail_for,
        calls: calls.clone(),
    };
    let augmentor = FeedbackAugmentor::new(&config, Box::new(generator));
    Harness {
        run: FeedbackRun::new(&config, augmentor, Box::new(clock.clone())),
        calls,
        clock,
    }
}

fn add_candidate(root: &Path, folder: &str, report: Option<&str>) {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).unwrap();
    if let Some(report) = report {
        fs::write(dir.join("README.md"), report).unwrap();
    }
}

fn read_report(root: &Path, folder: &str) -> String {
    fs::read_to_string(root.join(folder).join("README.md")).unwrap()
}

#[tokio::test]
async fn test_batch_isolates_failures_and_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    add_candidate(root, "amy", Some("Total of Points: 30\n"));
    add_candidate(root, "ben", Some("Total of Points: 20\n\n---\n\n# Feedback\n\nAlready here."));
    add_candidate(root, "cy", None);
    add_candidate(root, "dee", Some("Total of Points: 12\n"));
    add_candidate(root, ".git", None);

    let h = harness(root, Some("Dee"));

    let stats = assert_ok!(h.run.run_batch().await);
    assert_eq!(
        stats,
        FeedbackStats {
            processed: 1,
            skipped: 1,
            missing: 1,
            failed: 1,
        }
    );
    assert_eq!(h.calls.load(Ordering::SeqCst), 2);
    assert_eq!(h.clock.sleeps(), vec![Duration::from_millis(500)]);

    let amy = read_report(root, "amy");
    assert!(amy.starts_with("Total of Points: 30\n\n\n---\n\n# Feedback\n\n## Strengths"));
    assert_eq!(read_report(root, "dee"), "Total of Points: 12\n");

    let ben_before = read_report(root, "ben");

    // 第二次运行：已追加的不再重复
    let stats = assert_ok!(h.run.run_batch().await);
    assert_eq!(stats.processed, 0);
    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(read_report(root, "amy"), amy);
    assert_eq!(read_report(root, "ben"), ben_before);
    assert_eq!(amy.matches("# Feedback").count(), 1);
}

#[tokio::test]
async fn test_single_candidate_appends_once() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    add_candidate(root, "jane_doe", Some("Total of Points: 31\n"));

    let h = harness(root, None);

    let first = assert_ok!(h.run.run_single("jane_doe").await);
    assert!(matches!(first, FeedbackOutcome::Appended { .. }));
    let after_first = read_report(root, "jane_doe");

    let second = assert_ok!(h.run.run_single("jane_doe").await);
    assert_eq!(second, FeedbackOutcome::AlreadyFed);
    assert_eq!(read_report(root, "jane_doe"), after_first);
    assert_eq!(h.calls.load(Ordering::SeqCst), 1);
    assert!(h.clock.sleeps().is_empty());
}

#[tokio::test]
async fn test_single_candidate_unknown_folder() {
    let tmp = TempDir::new().unwrap();
    let h = harness(tmp.path(), None);

    let err = assert_err!(h.run.run_single("ghost").await);
    assert!(matches!(err, FeedbackError::CandidateFolderNotFound { .. }));
    assert_eq!(err.to_string(), "Candidate folder 'ghost' not found");
}

#[tokio::test]
async fn test_single_candidate_missing_report_is_fatal() {
    let tmp = TempDir::new().unwrap();
    add_candidate(tmp.path(), "no_readme", None);
    let h = harness(tmp.path(), None);

    let err = assert_err!(h.run.run_single("no_readme").await);
    assert!(matches!(err, FeedbackError::MissingReport { .. }));
    assert_eq!(h.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_single_candidate_generation_failure_is_fatal() {
    let tmp = TempDir::new().unwrap();
    add_candidate(tmp.path(), "jane_doe", Some("Total of Points: 31\n"));
    let h = harness(tmp.path(), Some("Jane Doe"));

    let err = assert_err!(h.run.run_single("jane_doe").await);
    assert!(matches!(err, FeedbackError::ExternalCallFailed { .. }));
    assert_eq!(read_report(tmp.path(), "jane_doe"), "Total of Points: 31\n");
}

#[tokio::test]
async fn test_write_failure_still_paces_next_call() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    add_candidate(root, "amy", Some("Total of Points: 30\n"));
    add_candidate(root, "ben", Some("Total of Points: 31\n"));

    let config = Config {
        root_dir: root.to_path_buf(),
        ..Config::default()
    };
    let calls = Arc::new(AtomicUsize::new(0));
    let clock = Arc::new(RecordingClock::new());
    let generator = VanishingReportGenerator {
        report_path: root.join("amy").join("README.md"),
        calls: calls.clone(),
    };
    let augmentor = FeedbackAugmentor::new(&config, Box::new(generator));
    let run = FeedbackRun::new(&config, augmentor, Box::new(clock.clone()));

    let stats = assert_ok!(run.run_batch().await);
    assert_eq!(stats.processed, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(clock.sleeps(), vec![Duration::from_millis(500)]);
    assert!(read_report(root, "ben").contains("# Feedback"));
}
