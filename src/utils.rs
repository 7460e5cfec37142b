use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::process::Command;

use git2::{Repository, RepositoryOpenFlags};
use reqwest::Client;
use tracing::{debug, info};

use crate::error::{ReleaseCheckError, Result};
use crate::structs::{IndexMetadata, VersionFile};

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| ReleaseCheckError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads `version` and `root_version` from the version declaration file.
pub fn load_version_file(path: &Path) -> Result<VersionFile> {
    let content = read_text(path)?;
    toml::from_str(&content)
        .map_err(|e| ReleaseCheckError::config(format!("{}: {}", path.display(), e)))
}

/// Runs the root version helper in `project_dir` and returns its trimmed
/// standard output.
pub fn compute_root_version(project_dir: &Path, command: &[String]) -> Result<String> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| ReleaseCheckError::config("root_version_command must not be empty"))?;
    let rendered = command.join(" ");

    debug!("Running root version helper `{}`", rendered);
    let output = Command::new(program)
        .args(args)
        .current_dir(project_dir)
        .output()
        .map_err(|e| ReleaseCheckError::Helper {
            command: rendered.clone(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ReleaseCheckError::Helper {
            command: rendered,
            reason: format!("exit code {:?}: {}", output.status.code(), stderr.trim()),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Lists every tag of the repository containing `project_dir`.
pub fn list_tags(project_dir: &Path) -> Result<Vec<String>> {
    list_tags_below(project_dir, std::iter::empty::<&Path>())
}

/// Like [`list_tags`], but repository discovery stops at `ceilings`.
fn list_tags_below<I, C>(project_dir: &Path, ceilings: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = C>,
    C: AsRef<OsStr>,
{
    let repo = Repository::open_ext(project_dir, RepositoryOpenFlags::empty(), ceilings)?;
    let tags = repo.tag_names(None)?;
    let tags: Vec<String> = tags.iter().flatten().map(str::to_string).collect();
    debug!("Found {} tags in {:?}", tags.len(), repo.path());
    Ok(tags)
}

/// Fetches the project's release metadata from the package index.
pub async fn fetch_index_metadata(url: &str) -> Result<IndexMetadata> {
    let client = Client::new();

    debug!("Fetching release metadata from {}", url);
    let metadata = client
        .get(url)
        .header(
            "User-Agent",
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
        )
        .send()
        .await?
        .error_for_status()?
        .json::<IndexMetadata>()
        .await?;

    info!("Package index lists {} releases", metadata.releases.len());
    Ok(metadata)
}
