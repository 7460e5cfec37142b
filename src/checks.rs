//! The release gate: five checks run in order, stopping at the first failure.

use std::io::Write;
use std::path::Path;

use semver::Version;
use tracing::info;

use crate::config::Settings;
use crate::error::{ReleaseCheckError, Result};
use crate::structs::{PublishedReleases, Report};
use crate::{utils, version};

pub fn check_root_version(documented: &str, actual: &str) -> Result<()> {
    if documented != actual {
        return Err(ReleaseCheckError::RootVersionMismatch {
            documented: documented.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

pub fn check_changelog(changelog: &str, version: &Version, path: &Path) -> Result<()> {
    let version = version.to_string();
    if !changelog.contains(&version) {
        return Err(ReleaseCheckError::ChangelogEntryMissing {
            version,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

pub fn check_tag_absent<S: AsRef<str>>(tags: &[S], prefix: &str, version: &Version) -> Result<()> {
    let tag = format!("{prefix}{version}");
    if tags.iter().any(|t| t.as_ref() == tag) {
        return Err(ReleaseCheckError::TagExists(tag));
    }
    Ok(())
}

pub fn check_unpublished(published: &PublishedReleases, version: &Version) -> Result<()> {
    if published.contains(version) {
        return Err(ReleaseCheckError::AlreadyPublished(version.to_string()));
    }
    Ok(())
}

/// Runs every check against the project described by `settings`.
///
/// Diagnostic lines go to `out` as soon as each value is known, so a failed
/// run still shows what was compared.
pub async fn run<W: Write>(settings: &Settings, out: &mut W) -> Result<Report> {
    let version_file = utils::load_version_file(&settings.version_file)?;
    let declared = version::parse_declared_version(&version_file.version)?;
    writeln!(out, "{} version: {}", settings.project, declared)?;
    writeln!(out, "root version: {}", version_file.root_version)?;

    let actual_root =
        utils::compute_root_version(&settings.project_dir, &settings.root_version_command)?;
    check_root_version(&version_file.root_version, &actual_root)?;
    info!("Root version {} is up to date", actual_root);

    let changelog = utils::read_text(&settings.changelog)?;
    check_changelog(&changelog, &declared, &settings.changelog)?;
    info!("Changelog mentions {}", declared);

    let tags = utils::list_tags(&settings.project_dir)?;
    check_tag_absent(&tags, &settings.tag_prefix, &declared)?;
    info!("No tag {}{} yet", settings.tag_prefix, declared);

    let metadata = utils::fetch_index_metadata(&settings.index_url).await?;
    let published = PublishedReleases::from_metadata(&metadata);
    match published.latest() {
        Some(latest) => writeln!(out, "index version: {}", latest)?,
        None => writeln!(out, "index version: none")?,
    }
    check_unpublished(&published, &declared)?;
    info!("{} {} has not been published", settings.project, declared);

    Ok(Report {
        declared,
        root_version: actual_root,
        latest_published: published.latest().cloned(),
    })
}
