use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{ReleaseCheckError, Result};

pub const CONFIG_FILE_NAME: &str = "release-check.toml";
pub const DEFAULT_CHANGELOG: &str = "doc/changelog.rst";
pub const DEFAULT_TAG_PREFIX: &str = "v";
pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/pypi/{project}/json";

fn default_root_version_command() -> Vec<String> {
    vec!["python3".to_string(), ".ci/root_version.py".to_string()]
}

/// Contents of `release-check.toml`. Every field is optional.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub project: Option<String>,
    pub version_file: Option<PathBuf>,
    pub changelog: Option<PathBuf>,
    pub root_version_command: Option<Vec<String>>,
    pub tag_prefix: Option<String>,
    pub index_url: Option<String>,
}

/// Values given on the command line or through the environment. They win
/// over the config file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub project: Option<String>,
    pub version_file: Option<PathBuf>,
    pub changelog: Option<PathBuf>,
    pub root_version_command: Option<Vec<String>>,
    pub tag_prefix: Option<String>,
    pub index_url: Option<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub project_dir: PathBuf,
    pub project: String,
    pub version_file: PathBuf,
    pub changelog: PathBuf,
    pub root_version_command: Vec<String>,
    pub tag_prefix: String,
    pub index_url: String,
}

/// Reads the config file, if any.
///
/// An explicit `config_path` must exist and is taken as given, relative to
/// the working directory. Otherwise `release-check.toml` in the project
/// directory is used when present.
pub fn load_file_config(project_dir: &Path, config_path: Option<&Path>) -> Result<FileConfig> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => {
            let path = project_dir.join(CONFIG_FILE_NAME);
            if !path.exists() {
                debug!("No {} in {:?}, using defaults", CONFIG_FILE_NAME, project_dir);
                return Ok(FileConfig::default());
            }
            path
        }
    };

    let content = fs::read_to_string(&path).map_err(|source| ReleaseCheckError::ReadFile {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&content)
        .map_err(|e| ReleaseCheckError::config(format!("{}: {}", path.display(), e)))
}

/// Resolves settings: overrides, then the config file, then defaults.
pub fn load_settings(
    project_dir: &Path,
    config_path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<Settings> {
    let project_dir = dunce::canonicalize(project_dir).map_err(|source| {
        ReleaseCheckError::ReadFile {
            path: project_dir.to_path_buf(),
            source,
        }
    })?;
    let file = load_file_config(&project_dir, config_path)?;
    resolve(project_dir, file, overrides)
}

pub fn resolve(project_dir: PathBuf, file: FileConfig, overrides: ConfigOverrides) -> Result<Settings> {
    let project = overrides
        .project
        .or(file.project)
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| {
            ReleaseCheckError::config("project name is not set (use --project or `project` in release-check.toml)")
        })?;

    let version_file = overrides
        .version_file
        .or(file.version_file)
        .unwrap_or_else(|| PathBuf::from("src").join(&project).join("version.py"));
    let changelog = overrides
        .changelog
        .or(file.changelog)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CHANGELOG));

    let root_version_command = overrides
        .root_version_command
        .or(file.root_version_command)
        .unwrap_or_else(default_root_version_command);
    if root_version_command.is_empty() {
        return Err(ReleaseCheckError::config("root_version_command must not be empty"));
    }

    let tag_prefix = overrides
        .tag_prefix
        .or(file.tag_prefix)
        .unwrap_or_else(|| DEFAULT_TAG_PREFIX.to_string());
    let index_url = overrides
        .index_url
        .or(file.index_url)
        .unwrap_or_else(|| DEFAULT_INDEX_URL.to_string())
        .replace("{project}", &project);

    Ok(Settings {
        version_file: project_dir.join(version_file),
        changelog: project_dir.join(changelog),
        project_dir,
        project,
        root_version_command,
        tag_prefix,
        index_url,
    })
}
