use anyhow::{Context, Result};
use git2::{BranchType, Oid, Repository, Sort};
use tracing::debug;

use crate::core::Commit;

/// Reads commit history out of a repository in graph order
pub struct GitWalker {
    repo: Repository,
}

impl GitWalker {
    pub fn new(repo_path: Option<&str>) -> Result<Self> {
        let repo = match repo_path {
            Some(path) => Repository::open(path),
            None => Repository::open_from_env(),
        }
        .context("Failed to open repository")?;

        Ok(Self { repo })
    }

    /// Commits reachable from HEAD and local branches, children first.
    ///
    /// HEAD's commit is flagged as the current head and seeds the merged
    /// state; the layout engine carries it down the mainline.
    pub fn history(&self, limit: Option<usize>, first_parent_only: bool) -> Result<Vec<Commit>> {
        let head = self.head_id()?;

        let mut revwalk = self.repo.revwalk()?;
        // Sorting resets the walk, so it goes before any push
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        if first_parent_only {
            revwalk.simplify_first_parent()?;
        }

        let mut tips = 0;
        if let Some(head) = head {
            revwalk.push(head)?;
            tips += 1;
        }
        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            if let Some(target) = branch.get().target() {
                revwalk.push(target)?;
                tips += 1;
            }
        }

        if tips == 0 {
            debug!("repository has no commits yet");
            return Ok(Vec::new());
        }

        let mut commits = Vec::new();
        for oid in revwalk.take(limit.unwrap_or(usize::MAX)) {
            let oid = oid.context("Failed to walk history")?;
            let commit = self
                .repo
                .find_commit(oid)
                .with_context(|| format!("Failed to read commit {oid}"))?;

            let mut record = Commit::new(
                oid.to_string(),
                commit.parent_ids().map(|id| id.to_string()),
            );
            if Some(oid) == head {
                record = record.head();
            }
            commits.push(record);
        }

        debug!(commits = commits.len(), tips, first_parent_only, "walked history");
        Ok(commits)
    }

    /// Commit HEAD points at, `None` for an unborn branch
    pub fn head_id(&self) -> Result<Option<Oid>> {
        match self.repo.head() {
            Ok(head) => Ok(head.target()),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => Ok(None),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e).context("Failed to resolve HEAD"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use tempfile::TempDir;

    fn create_test_repo() -> Result<(TempDir, Repository)> {
        let dir = TempDir::new()?;
        let repo = Repository::init(dir.path())?;

        let mut config = repo.config()?;
        config.set_str("user.name", "Test User")?;
        config.set_str("user.email", "test@example.com")?;

        Ok((dir, repo))
    }

    fn commit_to_repo(
        repo: &Repository,
        message: &str,
        parents: &[&git2::Commit<'_>],
        update_ref: Option<&str>,
    ) -> Result<Oid> {
        let sig = Signature::now("Test User", "test@example.com")?;
        let tree_id = {
            let mut index = repo.index()?;
            index.write_tree()?
        };
        let tree = repo.find_tree(tree_id)?;

        Ok(repo.commit(update_ref, &sig, &sig, message, &tree, parents)?)
    }

    fn walker_for(dir: &TempDir) -> Result<GitWalker> {
        GitWalker::new(dir.path().to_str())
    }

    #[test]
    fn test_empty_repository() -> Result<()> {
        let (dir, _repo) = create_test_repo()?;

        let walker = walker_for(&dir)?;
        assert_eq!(walker.head_id()?, None);
        assert!(walker.history(None, false)?.is_empty());

        Ok(())
    }

    #[test]
    fn test_linear_history() -> Result<()> {
        let (dir, repo) = create_test_repo()?;

        let oid1 = commit_to_repo(&repo, "First commit", &[], Some("HEAD"))?;
        let commit1 = repo.find_commit(oid1)?;
        let oid2 = commit_to_repo(&repo, "Second commit", &[&commit1], Some("HEAD"))?;
        let commit2 = repo.find_commit(oid2)?;
        let oid3 = commit_to_repo(&repo, "Third commit", &[&commit2], Some("HEAD"))?;

        let commits = walker_for(&dir)?.history(None, false)?;
        let shas: Vec<_> = commits.iter().map(|c| c.sha.clone()).collect();
        assert_eq!(shas, vec![oid3.to_string(), oid2.to_string(), oid1.to_string()]);

        assert!(commits[0].is_current_head);
        assert!(commits[0].is_merged);
        assert!(!commits[1].is_current_head);
        assert!(commits[2].is_root());

        Ok(())
    }

    #[test]
    fn test_limit() -> Result<()> {
        let (dir, repo) = create_test_repo()?;

        let oid1 = commit_to_repo(&repo, "First commit", &[], Some("HEAD"))?;
        let commit1 = repo.find_commit(oid1)?;
        commit_to_repo(&repo, "Second commit", &[&commit1], Some("HEAD"))?;

        let commits = walker_for(&dir)?.history(Some(1), false)?;
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].parents.as_slice(), &[oid1.to_string()]);

        Ok(())
    }

    #[test]
    fn test_merge_commit() -> Result<()> {
        let (dir, repo) = create_test_repo()?;

        let base_oid = commit_to_repo(&repo, "Base commit", &[], Some("HEAD"))?;
        let base_commit = repo.find_commit(base_oid)?;

        let branch1_oid = commit_to_repo(&repo, "Branch 1", &[&base_commit], Some("HEAD"))?;
        let branch1_commit = repo.find_commit(branch1_oid)?;

        // Branch 2 is only reachable through the merge
        let branch2_oid = commit_to_repo(&repo, "Branch 2", &[&base_commit], None)?;
        let branch2_commit = repo.find_commit(branch2_oid)?;

        let merge_oid = commit_to_repo(
            &repo,
            "Merge",
            &[&branch1_commit, &branch2_commit],
            Some("HEAD"),
        )?;

        let walker = walker_for(&dir)?;
        let commits = walker.history(None, false)?;
        assert_eq!(commits.len(), 4);
        assert_eq!(commits[0].sha, merge_oid.to_string());
        assert!(commits[0].is_merge());
        assert_eq!(commits.last().map(|c| c.sha.clone()), Some(base_oid.to_string()));

        let first_parent = walker.history(None, true)?;
        let shas: Vec<_> = first_parent.iter().map(|c| c.sha.clone()).collect();
        assert_eq!(
            shas,
            vec![merge_oid.to_string(), branch1_oid.to_string(), base_oid.to_string()]
        );

        Ok(())
    }

    #[test]
    fn test_history_feeds_layout() -> Result<()> {
        use crate::layout::GraphLayoutEngine;

        let (dir, repo) = create_test_repo()?;
        let base_oid = commit_to_repo(&repo, "Base commit", &[], Some("HEAD"))?;
        let base_commit = repo.find_commit(base_oid)?;
        commit_to_repo(&repo, "Tip", &[&base_commit], Some("HEAD"))?;

        let commits = walker_for(&dir)?.history(None, false)?;
        let output = GraphLayoutEngine::default().layout(&commits);

        assert_eq!(output.graph.dots.len(), 2);
        assert_eq!(output.graph.paths.len(), 1);
        assert!(output.rows.iter().all(|r| r.is_merged));

        Ok(())
    }
}
