use semver::Version;

use crate::error::{ReleaseCheckError, Result};

/// Parses the declared release version.
///
/// Only already-normalized versions are accepted. Input the lenient reader
/// would still understand (`1.0`, `v1.2.3`, `1.0.0.0`, `2.0.0rc1`) is
/// rejected with the normalized form in the message.
pub fn parse_declared_version(raw: &str) -> Result<Version> {
    match Version::parse(raw) {
        Ok(version) => Ok(version),
        Err(err) => match normalize(raw) {
            Some(normalized) => Err(ReleaseCheckError::invalid_version(
                raw,
                format!("not a normalized version, would be read as '{normalized}'"),
            )),
            None => Err(ReleaseCheckError::invalid_version(raw, err.to_string())),
        },
    }
}

/// Reads a version as published to the package index, where short and
/// PEP 440 style versions are common.
pub fn parse_lenient(raw: &str) -> Option<Version> {
    Version::parse(raw).ok().or_else(|| normalize(raw))
}

/// The form the package index gives `version`, so `5.0.0-rc1` and
/// `5.0.0-a.1` compare equal to published `5.0.0rc1` and `5.0.0a1`.
pub fn index_form(version: &Version) -> Version {
    if version.pre.is_empty() {
        return version.clone();
    }
    suffix(version.pre.as_str())
        .and_then(|suffix| {
            Version::parse(&format!(
                "{}.{}.{}{}",
                version.major, version.minor, version.patch, suffix
            ))
            .ok()
        })
        .unwrap_or_else(|| version.clone())
}

fn normalize(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);

    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (release, rest) = trimmed.split_at(split);

    // "1.0.0.dev0" leaves a dangling separator on the release part
    let release = if rest.is_empty() {
        release
    } else {
        release.strip_suffix('.').unwrap_or(release)
    };

    let mut parts = release
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    while parts.len() > 3 {
        if parts.last() != Some(&0) {
            return None;
        }
        parts.pop();
    }
    while parts.len() < 3 {
        parts.push(0);
    }

    let suffix = suffix(rest)?;
    Version::parse(&format!("{}.{}.{}{}", parts[0], parts[1], parts[2], suffix)).ok()
}

fn suffix(rest: &str) -> Option<String> {
    if rest.is_empty() {
        return Some(String::new());
    }
    if rest.starts_with(['-', '+']) {
        return Some(rest.to_string());
    }

    let rest = rest.trim_start_matches(['.', '_']).to_ascii_lowercase();
    let split = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
    let (label, number) = rest.split_at(split);
    let label = label.trim_end_matches(['.', '-', '_']);
    let number: u64 = if number.is_empty() { 0 } else { number.parse().ok()? };

    let label = match label {
        "a" | "alpha" => "-alpha",
        "b" | "beta" => "-beta",
        "c" | "rc" | "pre" | "preview" => "-rc",
        "dev" => "-dev",
        "post" | "rev" | "r" => "+post",
        _ => return None,
    };
    Some(format!("{label}.{number}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_normalized_versions() {
        assert_eq!(parse_declared_version("5.0.0").unwrap(), Version::new(5, 0, 0));
        let pre = parse_declared_version("2.1.0-rc.1").unwrap();
        assert_eq!(pre.pre.as_str(), "rc.1");
    }

    #[test]
    fn test_rejects_short_version_with_warning() {
        let err = parse_declared_version("1.0").unwrap_err();
        match err {
            ReleaseCheckError::InvalidVersion { version, reason } => {
                assert_eq!(version, "1.0");
                assert!(reason.contains("'1.0.0'"), "unexpected reason: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_four_component_version() {
        let err = parse_declared_version("1.0.0.0").unwrap_err();
        assert!(matches!(err, ReleaseCheckError::InvalidVersion { .. }));
        assert!(err.to_string().contains("not a normalized version"));
    }

    #[test]
    fn test_rejects_prefixed_and_padded_versions() {
        assert!(parse_declared_version("v1.2.3").is_err());
        assert!(parse_declared_version(" 1.2.3").is_err());
        assert!(parse_declared_version("2.0.0rc1").is_err());
    }

    #[test]
    fn test_rejects_garbage_with_parser_message() {
        let err = parse_declared_version("not-a-version").unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("invalid version 'not-a-version'"));
        assert!(!msg.contains("would be read as"));
    }

    #[test]
    fn test_lenient_reads_index_versions() {
        assert_eq!(parse_lenient("0.1"), Some(Version::new(0, 1, 0)));
        assert_eq!(parse_lenient("1.3.8"), Some(Version::new(1, 3, 8)));
        assert_eq!(parse_lenient("2.0.0.0"), Some(Version::new(2, 0, 0)));
        assert_eq!(parse_lenient("2.0.0rc1").unwrap().pre.as_str(), "rc.1");
        assert_eq!(parse_lenient("1.4b2").unwrap().pre.as_str(), "beta.2");
        assert_eq!(parse_lenient("1.0.0.dev0").unwrap().pre.as_str(), "dev.0");
        assert_eq!(parse_lenient("1.0.0.post1").unwrap().build.as_str(), "post.1");
    }

    #[test]
    fn test_index_form_uses_canonical_labels() {
        let rc = parse_declared_version("5.0.0-rc1").unwrap();
        assert_eq!(index_form(&rc).pre.as_str(), "rc.1");
        let alpha = parse_declared_version("5.0.0-a.1").unwrap();
        assert_eq!(index_form(&alpha).pre.as_str(), "alpha.1");
        let beta = parse_declared_version("5.0.0-beta").unwrap();
        assert_eq!(index_form(&beta).pre.as_str(), "beta.0");
    }

    #[test]
    fn test_index_form_keeps_unknown_labels() {
        let numeric = parse_declared_version("5.0.0-1").unwrap();
        assert_eq!(index_form(&numeric), numeric);
        let custom = parse_declared_version("5.0.0-nightly.3").unwrap();
        assert_eq!(index_form(&custom), custom);
        let plain = Version::new(5, 0, 0);
        assert_eq!(index_form(&plain), plain);
    }

    #[test]
    fn test_lenient_gives_up_on_nonzero_extra_components() {
        assert_eq!(parse_lenient("1.0.0.1"), None);
        assert_eq!(parse_lenient("1..2"), None);
        assert_eq!(parse_lenient("latest"), None);
    }
}
