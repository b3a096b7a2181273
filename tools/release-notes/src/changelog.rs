//! Changelog collection and workflow-output encoding

use crate::error::ReleaseError;
use std::io::Write;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Run git in `repo` and return its stdout
async fn git(repo: &Path, args: &[&str]) -> Result<String, ReleaseError> {
    debug!("git {}", args.join(" "));
    let output = Command::new("git")
        .args(args)
        .current_dir(repo)
        .output()
        .await
        .map_err(ReleaseError::Spawn)?;

    if !output.status.success() {
        return Err(ReleaseError::Git {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// All tags of the repository
pub async fn list_tags(repo: &Path) -> Result<Vec<String>, ReleaseError> {
    let out = git(repo, &["tag", "--list"]).await?;
    Ok(out.lines().map(str::trim).filter(|t| !t.is_empty()).map(str::to_string).collect())
}

/// One `- <subject>` line per commit in `previous..current`
///
/// Without a previous tag the whole history up to `current` is listed.
pub async fn commit_log(
    repo: &Path,
    previous: Option<&str>,
    current: &str,
) -> Result<String, ReleaseError> {
    let range = match previous {
        Some(previous) => format!("{}..{}", previous, current),
        None => current.to_string(),
    };
    let out = git(repo, &["log", "--pretty=format:- %s", &range]).await?;
    Ok(out.trim_end().to_string())
}

/// Escape text for a single-line workflow output
///
/// `%` is escaped first so the escapes introduced for line breaks survive.
pub fn escape_output(text: &str) -> String {
    text.replace('%', "%25")
        .replace('\n', "%0A")
        .replace('\r', "%0D")
}

/// Append `name=value` to the workflow output file
pub fn append_output(path: &Path, name: &str, value: &str) -> Result<(), ReleaseError> {
    let to_err = |source| ReleaseError::Output {
        path: path.to_path_buf(),
        source,
    };
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_err)?;
    writeln!(file, "{}={}", name, value).map_err(to_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_output() {
        assert_eq!(escape_output("- a\n- b"), "- a%0A- b");
        assert_eq!(escape_output("100%\r\n"), "100%25%0D%0A");
        // Already escaped text is escaped again, not passed through
        assert_eq!(escape_output("%0A"), "%250A");
        assert_eq!(escape_output(""), "");
    }

    #[test]
    fn test_append_output_keeps_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_output");
        std::fs::write(&path, "other=1\n").unwrap();

        append_output(&path, "changelog", "- a%0A- b").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "other=1\nchangelog=- a%0A- b\n");
    }

    async fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    async fn commit(repo: &Path, message: &str) {
        git(
            repo,
            &[
                "-c",
                "user.name=Release Bot",
                "-c",
                "user.email=release@example.com",
                "commit",
                "--allow-empty",
                "-q",
                "-m",
                message,
            ],
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_commit_log_between_tags() {
        if !git_available().await {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path();
        git(repo, &["init", "-q"]).await.unwrap();

        commit(repo, "Initial import").await;
        git(repo, &["tag", "v0.1.0"]).await.unwrap();
        commit(repo, "Add VLAN sync").await;
        commit(repo, "Fix 100% CPU on pagination").await;
        git(repo, &["tag", "v0.2.0"]).await.unwrap();

        let mut tags = list_tags(repo).await.unwrap();
        tags.sort();
        assert_eq!(tags, vec!["v0.1.0", "v0.2.0"]);

        let log = commit_log(repo, Some("v0.1.0"), "v0.2.0").await.unwrap();
        assert_eq!(log, "- Fix 100% CPU on pagination\n- Add VLAN sync");

        let full = commit_log(repo, None, "v0.1.0").await.unwrap();
        assert_eq!(full, "- Initial import");
    }

    #[tokio::test]
    async fn test_unknown_revision_is_a_git_error() {
        if !git_available().await {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        git(dir.path(), &["init", "-q"]).await.unwrap();

        let err = commit_log(dir.path(), None, "v9.9.9").await.unwrap_err();
        assert!(matches!(err, ReleaseError::Git { .. }));
    }
}
