//! Pipeline orchestration for commit-level and PR-level analysis.
//!
//! Both entry points are total functions: no error, panic, or collaborator
//! failure ever crosses the boundary. Every doubt collapses to the uniform
//! empty result.

use std::collections::HashSet;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::time::Instant;

use super::cycles::{self, parse_canonical_cycle};
use super::extract;
use super::tsconfig;
use crate::attribution::attribute_root_causes;
use crate::confidence;
use crate::diff::diff_cycles;
use crate::git::GitRepo;
use crate::paths::normalize_lexical;
use crate::safety::{SafetySwitchContext, should_silence, validate_invariants};
use crate::snapshot;
use crate::types::{
    CommitAnalysis, FileStats, MAX_CYCLE_NODES, MIN_CYCLE_NODES, PrCycleAnalysis,
};

/// Analyze one repository snapshot (the current working tree).
///
/// Pipeline: load aliases (best-effort) -> extract imports -> detect cycles
/// -> score segmentation quality. Any hard failure or stage error yields the
/// zero result. A snapshot record is appended best-effort when the path is a
/// git repository; snapshot failures are swallowed.
pub fn analyze_commit(repo_path: &Path) -> CommitAnalysis {
    catch_unwind(AssertUnwindSafe(|| analyze_commit_inner(repo_path)))
        .unwrap_or_else(|_| CommitAnalysis::empty())
}

/// Analyze a PR: does the head introduce new cycles attributable to a
/// changed file? Silent (all-empty, zero confidence) in every doubtful or
/// failing case; never raises.
pub fn analyze_pr(
    repo_path: &Path,
    base_sha: &str,
    head_sha: &str,
    changed_files: &[String],
) -> PrCycleAnalysis {
    let started = Instant::now();
    catch_unwind(AssertUnwindSafe(|| {
        analyze_pr_inner(repo_path, base_sha, head_sha, changed_files, started)
    }))
    .unwrap_or_else(|_| PrCycleAnalysis::empty())
}

/// Commit analysis plus the flags the PR pipeline aggregates.
struct CommitProbe {
    analysis: CommitAnalysis,
    stats: FileStats,
    error: bool,
    hard_failed: bool,
}

impl CommitProbe {
    fn failed(hard: bool, stats: FileStats) -> Self {
        Self {
            analysis: CommitAnalysis::empty(),
            stats,
            error: true,
            hard_failed: hard,
        }
    }
}

fn commit_probe(repo_path: &Path) -> CommitProbe {
    let config = tsconfig::load_project_config(repo_path);
    let extraction = match extract::extract_import_graph(repo_path, &config.aliases) {
        Ok(result) => result,
        Err(_) => return CommitProbe::failed(true, FileStats::default()),
    };
    let detection = cycles::detect_cycles(&extraction.graph);
    if detection.error_detected {
        return CommitProbe::failed(false, extraction.stats);
    }
    let quality = confidence::segmentation_quality(&extraction.stats, config.is_monorepo);
    let score = confidence::score_segmentation(&quality);
    CommitProbe {
        analysis: CommitAnalysis {
            canonical_cycles: detection.canonical_cycles,
            import_graph: extraction.graph,
            confidence: score,
        },
        stats: extraction.stats,
        error: false,
        hard_failed: false,
    }
}

fn analyze_commit_inner(repo_path: &Path) -> CommitAnalysis {
    let probe = commit_probe(repo_path);
    if probe.error {
        return CommitAnalysis::empty();
    }
    write_snapshot_best_effort(repo_path, &probe.analysis);
    probe.analysis
}

fn write_snapshot_best_effort(repo_path: &Path, analysis: &CommitAnalysis) {
    let Ok(repo) = GitRepo::discover(repo_path) else {
        return;
    };
    let Ok(sha) = repo.head_commit() else {
        return;
    };
    let repo_id = repo_path
        .canonicalize()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| repo_path.display().to_string());
    let _ = snapshot::append_snapshot(
        &repo_id,
        &sha,
        &analysis.canonical_cycles,
        analysis.confidence,
    );
}

fn analyze_pr_inner(
    repo_path: &Path,
    base_sha: &str,
    head_sha: &str,
    changed_files: &[String],
    started: Instant,
) -> PrCycleAnalysis {
    let Ok(repo) = GitRepo::discover(repo_path) else {
        return PrCycleAnalysis::empty();
    };

    if repo.checkout(base_sha).is_err() {
        return PrCycleAnalysis::empty();
    }
    let base = commit_probe(repo.path());

    if repo.checkout(head_sha).is_err() {
        return PrCycleAnalysis::empty();
    }
    let head = commit_probe(repo.path());

    let diff = diff_cycles(
        &base.analysis.canonical_cycles,
        &head.analysis.canonical_cycles,
    );

    // Changed files arrive from the caller in arbitrary shape; compare in
    // normalized lowercase form only (no second case-folding path exists).
    let changed: HashSet<String> = changed_files
        .iter()
        .filter_map(|file| normalize_lexical(file))
        .collect();

    // New cycles must sit in the size window and touch a changed file.
    let mut structural_error = false;
    let mut candidates: Vec<String> = Vec::new();
    for cycle in &diff.new_cycles {
        match parse_canonical_cycle(cycle) {
            Some(nodes) => {
                if !(MIN_CYCLE_NODES..=MAX_CYCLE_NODES).contains(&nodes.len()) {
                    continue;
                }
                if !nodes.iter().any(|node| changed.contains(*node)) {
                    continue;
                }
                candidates.push(cycle.clone());
            }
            None => {
                structural_error = true;
                break;
            }
        }
    }

    let hunks = match repo.added_lines(base_sha, head_sha) {
        Ok(hunks) => hunks,
        Err(_) => return PrCycleAnalysis::empty(),
    };

    let attribution = attribute_root_causes(
        &candidates,
        &changed,
        &head.analysis.import_graph,
        &base.analysis.import_graph,
        &hunks,
    );

    // Cycles without an attributed edge were dropped inside the attributor.
    let relevant_cycles: Vec<String> = attribution
        .root_cause_edges
        .iter()
        .map(|edge| edge.canonical_cycle.clone())
        .collect();

    let confidence = base.analysis.confidence.min(head.analysis.confidence);

    let context = SafetySwitchContext {
        determinism_consistent: true,
        runtime_seconds: started.elapsed().as_secs_f64(),
        alias_ambiguity_detected: base.stats.alias_ambiguity_detected
            || head.stats.alias_ambiguity_detected,
        import_graph_complete: !base.hard_failed && !head.hard_failed,
        root_cause_detection_stable: true,
        component_error_detected: base.error
            || head.error
            || diff.error_detected
            || attribution.error_detected
            || structural_error,
    };
    if should_silence(&context) {
        return PrCycleAnalysis::empty();
    }

    let report = validate_invariants(
        &relevant_cycles,
        &head.analysis.import_graph,
        &attribution.root_cause_edges,
    );
    if !report.all_invariants_satisfied {
        return PrCycleAnalysis::empty();
    }

    PrCycleAnalysis {
        relevant_cycles,
        root_causes: attribution.root_cause_edges,
        confidence,
    }
}
