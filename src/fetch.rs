//! Media acquisition: turn a remote locator into a local audio file.
//!
//! The pipeline only depends on the contract "given a locator, produce a
//! decodable local file"; everything network-shaped lives behind the
//! `MediaFetcher` trait so the pipeline and tests never touch it.

use crate::error::{Result, TapescriptError};
use async_trait::async_trait;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Download the recording at `locator` to `dest` and return the path.
    async fn fetch(&self, locator: &str, dest: &Path) -> Result<PathBuf>;
}

/// Streaming HTTP fetcher with an optional progress bar.
pub struct HttpFetcher {
    client: reqwest::Client,
    progress: bool,
}

impl HttpFetcher {
    pub fn new(progress: bool) -> Self {
        Self {
            client: reqwest::Client::new(),
            progress,
        }
    }
}

#[async_trait]
impl MediaFetcher for HttpFetcher {
    async fn fetch(&self, locator: &str, dest: &Path) -> Result<PathBuf> {
        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let response = self.client.get(locator).send().await.map_err(|e| {
            TapescriptError::Acquisition {
                message: format!("request to {locator} failed: {e}"),
            }
        })?;

        if !response.status().is_success() {
            return Err(TapescriptError::Acquisition {
                message: format!("{} returned status {}", locator, response.status()),
            });
        }

        let total_size = response.content_length().unwrap_or(0);
        let pb = if self.progress {
            let pb = ProgressBar::new(total_size);
            pb.set_style(
                // SAFETY: hardcoded template string, always valid
                #[allow(clippy::expect_used)]
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .expect("hardcoded progress bar template")
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut stream = response.bytes_stream();
        let mut file = fs::File::create(dest)?;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| TapescriptError::Acquisition {
                message: format!("download interrupted: {e}"),
            })?;
            file.write_all(&chunk)?;
            if let Some(ref pb) = pb {
                pb.inc(chunk.len() as u64);
            }
        }

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        log::debug!("downloaded {} to {}", locator, dest.display());
        Ok(dest.to_path_buf())
    }
}

/// Test fetcher that copies a local file instead of downloading.
pub struct MockFetcher {
    fixture: PathBuf,
    should_fail: bool,
}

impl MockFetcher {
    pub fn new(fixture: PathBuf) -> Self {
        Self {
            fixture,
            should_fail: false,
        }
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

#[async_trait]
impl MediaFetcher for MockFetcher {
    async fn fetch(&self, locator: &str, dest: &Path) -> Result<PathBuf> {
        if self.should_fail {
            return Err(TapescriptError::Acquisition {
                message: format!("mock fetch failure for {locator}"),
            });
        }
        fs::copy(&self.fixture, dest)?;
        Ok(dest.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn mock_fetcher_copies_fixture_to_destination() {
        let dir = tempdir().unwrap();
        let fixture = dir.path().join("fixture.wav");
        fs::write(&fixture, b"fake audio bytes").unwrap();

        let dest = dir.path().join("work").join("audio.wav");
        fs::create_dir_all(dest.parent().unwrap()).unwrap();

        let fetcher = MockFetcher::new(fixture);
        let path = fetcher.fetch("http://example.com/a.wav", &dest).await.unwrap();

        assert_eq!(path, dest);
        assert_eq!(fs::read(&dest).unwrap(), b"fake audio bytes");
    }

    #[tokio::test]
    async fn mock_fetcher_failure_is_acquisition_error() {
        let dir = tempdir().unwrap();
        let fetcher = MockFetcher::new(dir.path().join("unused.wav")).with_failure();

        let result = fetcher
            .fetch("http://example.com/a.wav", &dir.path().join("out.wav"))
            .await;

        assert!(matches!(
            result,
            Err(TapescriptError::Acquisition { .. })
        ));
    }

    #[tokio::test]
    async fn http_fetcher_rejects_invalid_locator() {
        let dir = tempdir().unwrap();
        let fetcher = HttpFetcher::new(false);

        let result = fetcher
            .fetch("not a url", &dir.path().join("out.wav"))
            .await;

        assert!(matches!(
            result,
            Err(TapescriptError::Acquisition { .. })
        ));
    }
}
