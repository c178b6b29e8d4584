// tests/watch_polling.rs

mod common;
use crate::common::builders::TreeBuilder;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::sync::Arc;
use std::time::SystemTime;

use proptest::prelude::*;
use tokio::time::{Duration, sleep, timeout};

use gorun::engine::coalescer;
use gorun::watch::{Baseline, Scanner, spawn_poller};

type TestResult = Result<(), Box<dyn Error>>;

/// `a.go` gets an mtime 150ms after the baseline: the next poll fires once
/// and moves the baseline past it; an identical poll afterwards is silent.
#[test]
fn single_edit_fires_once_and_baseline_moves_forward() -> TestResult {
    init_tracing();

    let t0 = SystemTime::now() - Duration::from_secs(30);
    let tree = TreeBuilder::new().file("a.go", t0 - Duration::from_secs(1));
    let scanner = Scanner::new(&tree.watch_config("go"));
    let baseline = Baseline::new(t0);

    assert!(scanner.poll(&baseline).is_none(), "untouched file must not fire");

    tree.touch("a.go", t0 + Duration::from_millis(150));
    let change = scanner.poll(&baseline).expect("edit must be observed");
    assert!(change.path.ends_with("a.go"));
    assert!(baseline.get() > t0);
    assert!(baseline.get() >= t0 + Duration::from_millis(150));

    assert!(scanner.poll(&baseline).is_none(), "no edits, no restart");
    Ok(())
}

#[test]
fn baseline_is_monotonic_across_polls() -> TestResult {
    init_tracing();

    let t0 = SystemTime::now() - Duration::from_secs(30);
    let tree = TreeBuilder::new();
    let scanner = Scanner::new(&tree.watch_config("go"));
    let baseline = Baseline::new(t0);

    let mut last = baseline.get();
    for step in 1..=3u64 {
        std::thread::sleep(Duration::from_millis(10));
        tree.touch(&format!("pkg{step}/f.go"), SystemTime::now());
        assert!(scanner.poll(&baseline).is_some());
        assert!(baseline.get() > last);
        last = baseline.get();
    }

    // A file at or before the baseline never fires.
    tree.touch("late.go", last);
    assert!(scanner.poll(&baseline).is_none());
    Ok(())
}

#[test]
fn skipped_hidden_and_foreign_files_never_fire() -> TestResult {
    init_tracing();

    let t0 = SystemTime::now() - Duration::from_secs(30);
    let later = t0 + Duration::from_secs(1);
    let tree = TreeBuilder::new()
        .file(".git/objects/x.go", later)
        .file(".venv/site/y.go", later)
        .file("vendor/z.go", later)
        .file("cmd/.secret.go", later)
        .file("docs/readme.md", later);

    let config = tree.watch_config("go").with_skip_dir("vendor");
    let baseline = Baseline::new(t0);
    assert!(Scanner::new(&config).poll(&baseline).is_none());
    assert_eq!(baseline.get(), t0, "baseline untouched without a hit");

    tree.touch("cmd/main.go", later);
    assert!(Scanner::new(&config).poll(&baseline).is_some());
    Ok(())
}

#[tokio::test]
async fn poller_emits_one_notification_per_edit() -> TestResult {
    init_tracing();

    let tree = TreeBuilder::new().file("main.go", SystemTime::now() - Duration::from_secs(60));
    let baseline = Arc::new(Baseline::starting_now());
    let (notifier, mut changes) = coalescer::channel();

    let poller = spawn_poller(
        Scanner::new(&tree.watch_config("go")),
        Arc::clone(&baseline),
        notifier,
        Duration::from_millis(25),
    );

    // Nothing newer than the baseline yet.
    assert!(timeout(Duration::from_millis(150), changes.next_batch()).await.is_err());

    sleep(Duration::from_millis(20)).await;
    tree.touch("main.go", SystemTime::now());

    let collapsed = with_timeout(changes.next_batch()).await;
    assert_eq!(collapsed, Some(1));

    // No further edits: no further notifications.
    assert!(timeout(Duration::from_millis(200), changes.next_batch()).await.is_err());

    poller.abort();
    Ok(())
}

#[tokio::test]
async fn poller_stops_when_consumer_is_gone() -> TestResult {
    init_tracing();

    let tree = TreeBuilder::new();
    let baseline = Arc::new(Baseline::new(SystemTime::UNIX_EPOCH));
    let (notifier, changes) = coalescer::channel();
    drop(changes);

    tree.touch("main.go", SystemTime::now());
    let poller = spawn_poller(
        Scanner::new(&tree.watch_config("go")),
        baseline,
        notifier,
        Duration::from_millis(10),
    );

    with_timeout(poller).await?;
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn only_the_watched_extension_fires(ext in "[a-z]{1,4}") {
        let t0 = SystemTime::now() - Duration::from_secs(30);
        let tree = TreeBuilder::new().file(&format!("src/file.{ext}"), t0 + Duration::from_secs(1));
        let scanner = Scanner::new(&tree.watch_config("go"));

        let fired = scanner.find_change(t0).is_some();
        prop_assert_eq!(fired, ext == "go");

        let all_files = Scanner::new(&tree.watch_config("go").with_all_files(true));
        prop_assert!(all_files.find_change(t0).is_some());
    }
}
