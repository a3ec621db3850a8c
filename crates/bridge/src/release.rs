//! Release lookup against the GitHub releases API.
//!
//! Not part of the command path; the front-end uses it to show the release
//! date of the running version and to offer updates.

use serde::{Deserialize, Serialize};
use semver::Version;
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://api.github.com";

#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    #[error("timeout")]
    Timeout,
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("network error: {0}")]
    Network(String),
    #[error("not a semantic version: {version}")]
    Version {
        version: String,
        #[source]
        source: semver::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReleaseChecker {
    owner: String,
    repo: String,
    timeout: Duration,
    api_base: String,
}

impl ReleaseChecker {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            timeout: Duration::from_secs(10),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point at a GitHub Enterprise host or a local mock.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn latest_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base, self.owner, self.repo
        )
    }

    pub fn tag_url(&self, version: &str) -> String {
        format!(
            "{}/repos/{}/{}/releases/tags/v{}",
            self.api_base,
            self.owner,
            self.repo,
            version.trim_start_matches('v')
        )
    }

    pub async fn latest(&self) -> Result<ReleaseInfo, ReleaseError> {
        self.fetch(&self.latest_url()).await
    }

    pub async fn for_version(&self, version: &str) -> Result<ReleaseInfo, ReleaseError> {
        self.fetch(&self.tag_url(version)).await
    }

    async fn fetch(&self, url: &str) -> Result<ReleaseInfo, ReleaseError> {
        // reqwest is built without a bundled provider; already-installed is fine.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("sweeper/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReleaseError::Network(format!("failed to build HTTP client: {}", e)))?;

        tracing::debug!(%url, "fetching release");
        let resp = client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReleaseError::Timeout
                } else {
                    ReleaseError::Network(format!("GET {}: {}", url, e))
                }
            })?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(ReleaseError::Status {
                url: url.to_string(),
                status,
            });
        }

        resp.json::<ReleaseInfo>()
            .await
            .map_err(|e| ReleaseError::Network(format!("reading body: {}", e)))
    }
}

// ---------------------------------------------------------------------------
// Version comparison
// ---------------------------------------------------------------------------

/// True when `candidate` is a strictly newer release than `current`.
/// A leading `v` is ignored; pre-releases order before their final release.
pub fn is_newer(current: &str, candidate: &str) -> Result<bool, ReleaseError> {
    Ok(parse_version(candidate)? > parse_version(current)?)
}

fn parse_version(raw: &str) -> Result<Version, ReleaseError> {
    let trimmed = raw.trim();
    Version::parse(trimmed.strip_prefix('v').unwrap_or(trimmed)).map_err(|source| {
        ReleaseError::Version {
            version: raw.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let c = ReleaseChecker::new("acme", "sweeper");
        assert_eq!(
            c.latest_url(),
            "https://api.github.com/repos/acme/sweeper/releases/latest"
        );
        assert_eq!(
            c.tag_url("1.2.0"),
            "https://api.github.com/repos/acme/sweeper/releases/tags/v1.2.0"
        );
        assert_eq!(c.tag_url("v1.2.0"), c.tag_url("1.2.0"));
    }

    #[test]
    fn test_api_base_override() {
        let c = ReleaseChecker::new("acme", "sweeper").with_api_base("http://127.0.0.1:9/");
        assert_eq!(
            c.latest_url(),
            "http://127.0.0.1:9/repos/acme/sweeper/releases/latest"
        );
    }

    #[test]
    fn test_is_newer() {
        assert!(is_newer("0.1.0", "v0.2.0").unwrap());
        assert!(is_newer("1.9.9", "1.10.0").unwrap());
        assert!(!is_newer("2.0.0", "v1.99.0").unwrap());
        assert!(!is_newer("1.2.0", "v1.2.0").unwrap());
        assert!(!is_newer("1.0.0", "1.0.0-rc.1").unwrap());
    }

    #[test]
    fn test_final_release_supersedes_its_prerelease() {
        assert!(is_newer("1.0.0-rc.1", "v1.0.0").unwrap());
        assert!(is_newer("1.0.0-rc.1", "1.0.0-rc.2").unwrap());
    }

    #[test]
    fn test_unparseable_tag_is_an_error() {
        let err = is_newer("1.0.0", "nightly-2024-05-01").unwrap_err();
        assert!(matches!(err, ReleaseError::Version { ref version, .. } if version == "nightly-2024-05-01"));
        assert!(is_newer("1.2", "1.2.1").is_err());
    }

    #[test]
    fn test_release_info_tolerates_missing_fields() {
        let info: ReleaseInfo =
            serde_json::from_str(r#"{"tag_name":"v0.3.0","draft":false}"#).unwrap();
        assert_eq!(info.tag_name, "v0.3.0");
        assert!(info.published_at.is_none());
    }
}
