//! Source fetcher: local rule files and remote rule lists.
//!
//! Every source resolves to raw text content. Failures never propagate:
//! a source that cannot be loaded contributes no content and its status
//! records why.

use anyhow::{Context, Result};
use reqwest::Client;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::FetchConfig;
use crate::error::BlacklistError;
use crate::fs_abstraction::{real_fs, FileSystem};
use crate::source::{RuleSource, SourceKind};
use crate::utils::format_count;

/// Outcome of loading one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    /// Content was read (possibly empty)
    Loaded,
    /// Missing file or empty path, silently ignored
    Skipped,
    /// Read or fetch failed
    Failed(BlacklistError),
}

impl SourceStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, SourceStatus::Loaded)
    }
}

/// Result of fetching a single source
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub source: RuleSource,
    pub content: String,
    pub status: SourceStatus,
}

impl FetchResult {
    fn loaded(source: &RuleSource, content: String) -> Self {
        Self {
            source: source.clone(),
            content,
            status: SourceStatus::Loaded,
        }
    }

    fn empty(source: &RuleSource, status: SourceStatus) -> Self {
        Self {
            source: source.clone(),
            content: String::new(),
            status,
        }
    }
}

/// Loads rule sources; one HTTP attempt per remote source, no retries
pub struct Fetcher {
    client: Client,
    max_body_bytes: usize,
    max_concurrent: usize,
}

impl Fetcher {
    /// Create a new fetcher with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(&FetchConfig::default())
    }

    /// Create a fetcher from the configured fetch policy
    pub fn with_config(config: &FetchConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("domain-blacklist/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
            max_concurrent: config.max_concurrent,
        })
    }

    /// Load one source. Never fails; problems are reported in the status.
    pub async fn fetch_source(&self, source: &RuleSource) -> FetchResult {
        match source.kind() {
            SourceKind::File => {
                let path = Path::new(source.locator());
                match read_local_file(path, real_fs()) {
                    Ok(Some(content)) => {
                        debug!("Read {} ({} bytes)", source, content.len());
                        FetchResult::loaded(source, content)
                    }
                    Ok(None) => {
                        debug!("Skipping {}: file not found", source);
                        FetchResult::empty(source, SourceStatus::Skipped)
                    }
                    Err(e) => {
                        warn!("Failed to read {}: {}", source, e);
                        FetchResult::empty(source, SourceStatus::Failed(e))
                    }
                }
            }
            SourceKind::Remote => {
                info!("Fetching {}...", source);
                match self.fetch_remote(source.locator()).await {
                    Ok(content) => {
                        info!("Fetched {} - {} bytes", source, format_count(content.len()));
                        FetchResult::loaded(source, content)
                    }
                    Err(e) => {
                        warn!("Failed to fetch {}: {}", source, e);
                        FetchResult::empty(source, SourceStatus::Failed(e))
                    }
                }
            }
        }
    }

    /// Load all sources concurrently with limited parallelism.
    ///
    /// Results are returned in the same order as `sources`.
    pub async fn fetch_sources(&self, sources: &[RuleSource]) -> Vec<FetchResult> {
        use futures::stream::{self, StreamExt};

        stream::iter(sources.iter().map(|source| self.fetch_source(source)))
            .buffered(self.max_concurrent)
            .collect()
            .await
    }

    /// Single GET with size validation
    async fn fetch_remote(&self, url: &str) -> Result<String, BlacklistError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BlacklistError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BlacklistError::HttpStatus(response.status().as_u16()));
        }

        // Check Content-Length header if available
        if let Some(content_length) = response.content_length() {
            if content_length > self.max_body_bytes as u64 {
                return Err(BlacklistError::TooLarge {
                    size: content_length,
                    max: self.max_body_bytes,
                });
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| BlacklistError::Network(e.to_string()))?;

        // Double-check actual size after download
        if body.len() > self.max_body_bytes {
            return Err(BlacklistError::TooLarge {
                size: body.len() as u64,
                max: self.max_body_bytes,
            });
        }

        Ok(body)
    }
}

// Note: Default is intentionally not implemented for Fetcher
// because new() can fail and we want explicit error handling.

/// Read a local file through an injected FileSystem.
///
/// Returns `Ok(None)` for an empty path or a path that is not a regular
/// file. Invalid UTF-8 sequences are replaced with U+FFFD so the valid lines
/// of a file still classify.
pub fn read_local_file<F: FileSystem + ?Sized>(
    path: &Path,
    fs: &F,
) -> Result<Option<String>, BlacklistError> {
    if path.as_os_str().is_empty() || !fs.is_file(path) {
        return Ok(None);
    }

    match fs.read(path) {
        Ok(bytes) => Ok(Some(decode_lossy(bytes))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(BlacklistError::Io(format!("{:?}: {}", path, e))),
    }
}

fn decode_lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_abstraction::MockFileSystem;
    use std::io;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn small_fetcher(max_body_bytes: usize) -> Fetcher {
        Fetcher::with_config(&FetchConfig {
            timeout_secs: 1,
            max_concurrent: 2,
            max_body_bytes,
        })
        .unwrap()
    }

    #[test]
    fn test_read_local_file_empty_path() {
        let mut mock = MockFileSystem::new();
        mock.expect_is_file().never();
        assert_eq!(read_local_file(Path::new(""), &mock), Ok(None));
    }

    #[test]
    fn test_read_local_file_missing() {
        let mut mock = MockFileSystem::new();
        mock.expect_is_file().returning(|_| false);
        mock.expect_read().never();
        assert_eq!(read_local_file(Path::new("/missing.txt"), &mock), Ok(None));
    }

    #[test]
    fn test_read_local_file_race_with_deletion() {
        let mut mock = MockFileSystem::new();
        mock.expect_is_file().returning(|_| true);
        mock.expect_read()
            .returning(|_| Err(io::Error::new(ErrorKind::NotFound, "gone")));
        assert_eq!(read_local_file(Path::new("/gone.txt"), &mock), Ok(None));
    }

    #[test]
    fn test_read_local_file_invalid_utf8_keeps_valid_lines() {
        let mut mock = MockFileSystem::new();
        mock.expect_is_file().returning(|_| true);
        mock.expect_read()
            .returning(|_| Ok(b"# caf\xe9\nads.example.com\ntracker.example.net\n".to_vec()));

        let content = read_local_file(Path::new("/latin1.txt"), &mock)
            .unwrap()
            .unwrap();
        assert_eq!(
            content,
            "# caf\u{FFFD}\nads.example.com\ntracker.example.net\n"
        );
    }

    #[test]
    fn test_read_local_file_permission_denied() {
        let mut mock = MockFileSystem::new();
        mock.expect_is_file().returning(|_| true);
        mock.expect_read()
            .returning(|_| Err(io::Error::new(ErrorKind::PermissionDenied, "denied")));
        let result = read_local_file(Path::new("/root.txt"), &mock);
        assert!(matches!(result, Err(BlacklistError::Io(_))));
    }

    #[tokio::test]
    async fn test_fetch_file_source() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.txt");
        std::fs::write(&file, "example.com\n# comment\n").unwrap();

        let fetcher = Fetcher::new().unwrap();
        let source = RuleSource::file(file.to_string_lossy().to_string());
        let result = fetcher.fetch_source(&source).await;

        assert_eq!(result.status, SourceStatus::Loaded);
        assert_eq!(result.content, "example.com\n# comment\n");
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_skipped() {
        let fetcher = Fetcher::new().unwrap();
        let result = fetcher
            .fetch_source(&RuleSource::parse("file:/nonexistent/rules.txt"))
            .await;
        assert_eq!(result.status, SourceStatus::Skipped);
        assert!(result.content.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_directory_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = Fetcher::new().unwrap();
        let source = RuleSource::file(temp_dir.path().to_string_lossy().to_string());

        let result = fetcher.fetch_source(&source).await;
        assert_eq!(result.status, SourceStatus::Skipped);
        assert!(result.content.is_empty());
    }

    #[test]
    fn test_with_config_rejects_invalid_policy() {
        let zero_timeout = FetchConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(Fetcher::with_config(&zero_timeout).is_err());

        let zero_concurrency = FetchConfig {
            max_concurrent: 0,
            ..Default::default()
        };
        assert!(Fetcher::with_config(&zero_concurrency).is_err());
    }

    #[tokio::test]
    async fn test_fetch_remote_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("||ads.example.com^\n"))
            .mount(&server)
            .await;

        let fetcher = small_fetcher(1024);
        let source = RuleSource::remote(format!("{}/list.txt", server.uri()));
        let result = fetcher.fetch_source(&source).await;

        assert_eq!(result.status, SourceStatus::Loaded);
        assert_eq!(result.content, "||ads.example.com^\n");
    }

    #[tokio::test]
    async fn test_fetch_remote_error_status_no_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = small_fetcher(1024);
        let result = fetcher
            .fetch_source(&RuleSource::remote(server.uri()))
            .await;

        assert_eq!(
            result.status,
            SourceStatus::Failed(BlacklistError::HttpStatus(503))
        );
        assert!(result.content.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_remote_too_large() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("a".repeat(64)))
            .mount(&server)
            .await;

        let fetcher = small_fetcher(16);
        let result = fetcher
            .fetch_source(&RuleSource::remote(server.uri()))
            .await;

        assert!(matches!(
            result.status,
            SourceStatus::Failed(BlacklistError::TooLarge { max: 16, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_remote_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late.example.com")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let fetcher = small_fetcher(1024);
        let result = fetcher
            .fetch_source(&RuleSource::remote(server.uri()))
            .await;

        assert!(matches!(
            result.status,
            SourceStatus::Failed(BlacklistError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_malformed_locator() {
        let fetcher = small_fetcher(1024);
        let result = fetcher
            .fetch_source(&RuleSource::remote("not a url"))
            .await;
        assert!(matches!(
            result.status,
            SourceStatus::Failed(BlacklistError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_sources_preserves_order() {
        let server = MockServer::start().await;
        for (route, body) in [("/one", "one.example.com"), ("/two", "two.example.com")] {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_string(body))
                .mount(&server)
                .await;
        }

        let sources = vec![
            RuleSource::remote(format!("{}/two", server.uri())),
            RuleSource::parse("file:"),
            RuleSource::remote(format!("{}/one", server.uri())),
        ];
        let fetcher = small_fetcher(1024);
        let results = fetcher.fetch_sources(&sources).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].content, "two.example.com");
        assert_eq!(results[1].status, SourceStatus::Skipped);
        assert_eq!(results[2].content, "one.example.com");
    }

    #[test]
    fn test_source_status_is_loaded() {
        assert!(SourceStatus::Loaded.is_loaded());
        assert!(!SourceStatus::Skipped.is_loaded());
        assert!(!SourceStatus::Failed(BlacklistError::HttpStatus(404)).is_loaded());
    }
}
