use std::collections::BTreeMap;

use semver::Version;
use serde::Deserialize;
use tracing::debug;

use crate::version;

/// The two values read from the project's version declaration.
#[derive(Debug, Deserialize)]
pub struct VersionFile {
    pub version: String,
    pub root_version: String,
}

/// Release metadata as served by the package index JSON API.
#[derive(Debug, Deserialize)]
pub struct IndexMetadata {
    pub releases: BTreeMap<String, serde_json::Value>,
}

/// Versions already published, sorted ascending.
#[derive(Debug, Default)]
pub struct PublishedReleases {
    versions: Vec<Version>,
    unparsed: Vec<String>,
}

impl PublishedReleases {
    pub fn from_metadata(metadata: &IndexMetadata) -> Self {
        Self::from_keys(metadata.releases.keys().map(String::as_str))
    }

    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut releases = PublishedReleases::default();
        for key in keys {
            match version::parse_lenient(key) {
                Some(version) => releases.versions.push(version),
                None => {
                    debug!("Ignoring unparseable release {:?} for ordering", key);
                    releases.unparsed.push(key.to_string());
                }
            }
        }
        releases.versions.sort();
        releases
    }

    pub fn latest(&self) -> Option<&Version> {
        self.versions.last()
    }

    pub fn contains(&self, version: &Version) -> bool {
        let rendered = version.to_string();
        let canonical = version::index_form(version);
        self.versions.contains(version)
            || self.versions.contains(&canonical)
            || self.unparsed.iter().any(|raw| *raw == rendered)
    }
}

/// What a successful run established.
#[derive(Debug)]
pub struct Report {
    pub declared: Version,
    pub root_version: String,
    pub latest_published: Option<Version>,
}
