//! Thin CLI over the arcsight library: run an analysis, print JSON.
//!
//! The analysis itself never fails visibly - doubtful runs print the empty
//! result, matching the library's silence policy. Only argument mistakes
//! produce a non-zero exit.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail};

const USAGE: &str = "\
arcsight - PR-time dependency-cycle analyzer for JS/TS repositories

USAGE:
    arcsight commit [PATH]
        Analyze the working tree at PATH (default: current directory).

    arcsight pr BASE_SHA HEAD_SHA [--repo PATH] [--changed FILE]...
        Analyze a PR between two commits. --changed may repeat; it names
        the files the PR modifies, repo-relative.

    arcsight --help
        Show this text.

Results are printed to stdout as JSON. A silent (empty) result means
either a clean analysis or one arcsight was not certain enough about.
";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            println!("{}", message);
            println!("{}", USAGE);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("--help") | Some("-h") | Some("help") => {
            println!("{}", USAGE);
            Ok(())
        }
        Some("commit") => run_commit(&args[1..]),
        Some("pr") => run_pr(&args[1..]),
        Some(other) => bail!("unknown command: {}", other),
    }
}

fn run_commit(args: &[String]) -> Result<()> {
    if args.len() > 1 {
        bail!("commit takes at most one PATH argument");
    }
    let path = args
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let result = arcsight::analyze_commit(&path);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn run_pr(args: &[String]) -> Result<()> {
    let mut positional: Vec<&str> = Vec::new();
    let mut changed: Vec<String> = Vec::new();
    let mut repo = PathBuf::from(".");

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--changed" => match iter.next() {
                Some(file) => changed.push(file.clone()),
                None => bail!("--changed requires a FILE argument"),
            },
            "--repo" => match iter.next() {
                Some(path) => repo = PathBuf::from(path),
                None => bail!("--repo requires a PATH argument"),
            },
            other if other.starts_with("--") => bail!("unknown option: {}", other),
            other => positional.push(other),
        }
    }

    let [base, head] = positional.as_slice() else {
        bail!("pr requires exactly BASE_SHA and HEAD_SHA");
    };

    let result = arcsight::analyze_pr(&repo, base, head, &changed);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
