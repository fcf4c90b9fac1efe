//! Snapshot side-channel: commit analysis appends NDJSON records when the
//! repository has a resolvable HEAD, and never lets the writer interfere
//! with the analysis result.

mod common;

use arcsight::analyze_commit;
use arcsight::snapshot::SnapshotRecord;
use common::{commit_all, init_repo, write};
use serial_test::serial;

#[test]
#[serial]
fn commit_analysis_appends_one_record_per_run() {
    let cache = tempfile::tempdir().expect("cache dir");
    // Cache location is process-global state; this test owns the variable
    // for its whole body.
    unsafe {
        std::env::set_var("ARCSIGHT_CACHE_DIR", cache.path());
    }

    let fixture = init_repo();
    let root = fixture.root();
    write(root, "src/a.ts", "import './b';\n");
    write(root, "src/b.ts", "import './a';\n");
    commit_all(&fixture.repo, "cycle");

    let first = analyze_commit(root);
    let second = analyze_commit(root);
    assert_eq!(first, second);

    unsafe {
        std::env::remove_var("ARCSIGHT_CACHE_DIR");
    }

    let snapshots_dir = cache.path().join("snapshots");
    let mut files: Vec<_> = std::fs::read_dir(&snapshots_dir)
        .expect("snapshots dir exists")
        .filter_map(Result::ok)
        .map(|e| e.path())
        .collect();
    files.sort();
    assert_eq!(files.len(), 1, "one file per repo id");

    let content = std::fs::read_to_string(&files[0]).expect("read ndjson");
    assert!(content.ends_with('\n'));
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2, "append-only, one line per analysis");

    for line in lines {
        let record: SnapshotRecord = serde_json::from_str(line).expect("valid record");
        assert_eq!(record.canonical_cycles, vec!["src/a.ts → src/b.ts → src/a.ts"]);
        assert_eq!(record.confidence, 0.0);
        assert_eq!(record.commit_sha.len(), 40);
        assert!(record.timestamp.ends_with('Z'));
    }
}

#[test]
#[serial]
fn non_git_directories_produce_no_snapshot_but_full_results() {
    let cache = tempfile::tempdir().expect("cache dir");
    unsafe {
        std::env::set_var("ARCSIGHT_CACHE_DIR", cache.path());
    }

    let tmp = tempfile::tempdir().expect("tmp dir");
    write(tmp.path(), "src/a.ts", "import './a';\n");
    let result = analyze_commit(tmp.path());

    unsafe {
        std::env::remove_var("ARCSIGHT_CACHE_DIR");
    }

    assert_eq!(result.canonical_cycles, vec!["src/a.ts → src/a.ts"]);
    assert!(!cache.path().join("snapshots").exists());
}
