//! Shared fixtures: temporary git repositories driven through real commits.

// Each test binary compiles its own copy; not every binary uses every helper.
#![allow(dead_code)]

use std::path::Path;

use git2::{IndexAddOption, Repository};

pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

pub fn init_repo() -> TestRepo {
    let dir = tempfile::tempdir().expect("tmp dir");
    let repo = Repository::init(dir.path()).expect("init repo");
    {
        let mut config = repo.config().expect("config");
        config.set_str("user.name", "arcsight-tests").expect("name");
        config.set_str("user.email", "tests@arcsight.dev").expect("email");
    }
    TestRepo { dir, repo }
}

pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("mkdir");
    }
    std::fs::write(path, content).expect("write file");
}

pub fn commit_all(repo: &Repository, message: &str) -> String {
    let mut index = repo.index().expect("index");
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .expect("add all");
    index.write().expect("write index");
    let tree_id = index.write_tree().expect("write tree");
    let tree = repo.find_tree(tree_id).expect("find tree");
    let sig = repo.signature().expect("signature");
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("commit")
        .to_string()
}

pub fn changed(files: &[&str]) -> Vec<String> {
    files.iter().map(|s| s.to_string()).collect()
}
