//! Transcription application entry point.
//!
//! Orchestrates the complete flow:
//! fetch → segment → parallel decode → reassemble → summarize → key points
//!
//! The decode pool is thread-based and runs under `spawn_blocking`,
//! keeping the async executor free for the HTTP collaborators. Cleanup is
//! tied to a scope guard so failed runs remove their artifacts too.

use crate::cli::Cli;
use crate::config::Config;
use crate::console;
use crate::decode::DecoderFactory;
use crate::error::{Result, TapescriptError};
use crate::fetch::{HttpFetcher, MediaFetcher};
use crate::pipeline::cleanup::ArtifactGuard;
use crate::pipeline::dispatcher::{Dispatcher, DispatcherConfig};
use crate::pipeline::segmenter::{self, SegmentConfig};
use crate::pipeline::types::{FailureMode, RunOutcome};
use crate::summarize::{self, RemoteSummarizer, Summarizer, SummaryParams};
use std::fs;
use std::io::IsTerminal;
use std::sync::Arc;

/// Fetch, segment, decode, and reassemble one recording.
///
/// Cleanup of the source file and chunk artifacts runs when this function
/// returns, on success and failure alike, unless `keep_artifacts` is set.
pub async fn transcribe(
    config: &Config,
    locator: &str,
    fetcher: &dyn MediaFetcher,
    factory: Arc<dyn DecoderFactory>,
    keep_artifacts: bool,
    quiet: bool,
) -> Result<RunOutcome> {
    let source = config.source_path();
    let chunk_dir = config.chunk_dir();

    let mut guard = ArtifactGuard::new(source.clone(), chunk_dir.clone());
    if keep_artifacts {
        guard.disarm();
    }

    if !quiet {
        console::status("Downloading audio...");
    }
    fetcher.fetch(locator, &source).await?;

    if !quiet {
        console::status("Transcribing audio...");
    }

    let segment_config = SegmentConfig {
        chunk_length_ms: config.pipeline.chunk_length_ms,
        sample_rate: config.pipeline.sample_rate,
        chunk_dir,
    };
    let dispatcher_config = DispatcherConfig {
        worker_count: config.pipeline.worker_count,
        frame_samples: config.pipeline.frame_samples,
        sample_rate: config.pipeline.sample_rate,
        failure_mode: if config.pipeline.fail_fast {
            FailureMode::FailFast
        } else {
            FailureMode::BestEffort
        },
    };

    let outcome = tokio::task::spawn_blocking(move || -> Result<RunOutcome> {
        let chunks = segmenter::segment(&source, &segment_config)?;
        Dispatcher::new(dispatcher_config, factory).run(chunks)
    })
    .await
    .map_err(|e| TapescriptError::Other(format!("decode task failed: {e}")))??;

    // Guard drops here: artifacts removed on the success path, and the
    // early-return paths above cleaned up whatever had been created.
    Ok(outcome)
}

/// Run the CLI flow end to end.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load_or_default(cli.config.as_deref())?.with_env_overrides();
    apply_cli_overrides(&mut config, &cli);
    config.validate()?;

    let locator = match &cli.url {
        Some(url) => url.clone(),
        None => console::prompt_source()?,
    };

    let factory = make_decoder(&config)?;
    let fetcher = HttpFetcher::new(!cli.quiet);

    let outcome = transcribe(
        &config,
        &locator,
        &fetcher,
        factory,
        cli.keep_artifacts,
        cli.quiet,
    )
    .await?;

    if !outcome.missing.is_empty() {
        console::warn_partial(&outcome.missing, &outcome.failures);
    }
    if !cli.quiet {
        console::status("Transcription complete.");
    }

    if let Some(path) = &cli.output {
        fs::write(path, &outcome.transcript)?;
        if !cli.quiet {
            console::status(&format!("Transcript written to {}", path.display()));
        }
    } else {
        console::print_transcript(&outcome.transcript);
    }

    if config.summary.enabled && !cli.no_summary && !outcome.transcript.is_empty() {
        let mut summarizer = RemoteSummarizer::new(config.summary.endpoint.clone());
        if let Some(token) = &config.summary.api_token {
            summarizer = summarizer.with_api_token(token.clone());
        }
        render_summary(
            &summarizer,
            &outcome.transcript,
            config.summary.char_budget,
            cli.quiet,
        )
        .await;
    }

    Ok(())
}

/// Summarize and extract key points, degrading to a warning on failure.
///
/// The transcript is the primary artifact; a summarizer outage never fails
/// the run.
async fn render_summary(
    summarizer: &dyn Summarizer,
    transcript: &str,
    char_budget: usize,
    quiet: bool,
) {
    if !quiet {
        console::status("Generating summary...");
    }

    let summary = match summarize::summarize_text(
        summarizer,
        transcript,
        SummaryParams::SUMMARY,
        char_budget,
    )
    .await
    {
        Ok(summary) => summary,
        Err(e) => {
            log::warn!("summarization failed: {e}");
            console::error(&format!("Skipping summary: {e}"));
            return;
        }
    };

    let page = !quiet && std::io::stdout().is_terminal();
    console::print_summary(&summary, page);

    if !quiet {
        console::status("Extracting key points...");
    }
    // Key points come from the summary, not the raw transcript: the
    // second pass distills what the first already kept.
    match summarize::extract_key_points(summarizer, &summary, char_budget).await {
        Ok(points) => console::print_key_points(&points),
        Err(e) => {
            log::warn!("key-point extraction failed: {e}");
            console::error(&format!("Skipping key points: {e}"));
        }
    }
}

fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    config.pipeline.chunk_length_ms = cli.chunk_length;
    if let Some(workers) = cli.workers {
        config.pipeline.worker_count = workers;
    }
    if let Some(dir) = &cli.work_dir {
        config.pipeline.work_dir = dir.clone();
    }
    if let Some(model) = &cli.model {
        config.decode.model_dir = Some(model.clone());
    }
    if cli.fail_fast {
        config.pipeline.fail_fast = true;
    }
}

#[cfg(feature = "vosk-backend")]
fn make_decoder(config: &Config) -> Result<Arc<dyn DecoderFactory>> {
    let model_dir =
        config
            .decode
            .model_dir
            .clone()
            .ok_or_else(|| TapescriptError::ConfigInvalidValue {
                key: "decode.model_dir".to_string(),
                message: "a recognizer model directory is required (--model or config)".to_string(),
            })?;
    Ok(Arc::new(crate::decode::vosk::VoskDecoderFactory::new(
        &model_dir,
    )?))
}

#[cfg(not(feature = "vosk-backend"))]
fn make_decoder(_config: &Config) -> Result<Arc<dyn DecoderFactory>> {
    Err(TapescriptError::Other(
        "no decoding backend compiled in; rebuild with --features vosk-backend".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::wav;
    use crate::decode::MockDecoderFactory;
    use crate::fetch::MockFetcher;
    use tempfile::tempdir;

    const RATE: u32 = 16_000;

    /// Write a fixture whose chunks each start with their position as the
    /// leading sample, matching the mock decoder's tagging.
    fn write_fixture(path: &std::path::Path, chunk_count: usize, chunk_ms: u64) {
        let samples_per_chunk = (chunk_ms * RATE as u64 / 1000) as usize;
        let mut samples = vec![0i16; chunk_count * samples_per_chunk];
        for position in 0..chunk_count {
            samples[position * samples_per_chunk] = position as i16;
        }
        wav::write_mono_wav(path, &samples, RATE).unwrap();
    }

    fn test_config(work_dir: &std::path::Path, chunk_ms: u64, workers: usize) -> Config {
        let mut config = Config::default();
        config.pipeline.work_dir = work_dir.to_path_buf();
        config.pipeline.chunk_length_ms = chunk_ms;
        config.pipeline.worker_count = workers;
        config
    }

    #[tokio::test]
    async fn transcribe_produces_ordered_transcript_and_cleans_up() {
        let dir = tempdir().unwrap();
        let fixture = dir.path().join("fixture.wav");
        write_fixture(&fixture, 3, 1000);

        let config = test_config(dir.path(), 1000, 2);
        let fetcher = MockFetcher::new(fixture);
        let factory = Arc::new(MockDecoderFactory::new());

        let outcome = transcribe(&config, "http://example.com/a.wav", &fetcher, factory, false, true)
            .await
            .unwrap();

        assert!(outcome.is_complete());
        assert_eq!(outcome.transcript, "tail-c0 tail-c1 tail-c2");
        assert!(!config.source_path().exists());
        assert!(!config.chunk_dir().exists());
    }

    #[tokio::test]
    async fn transcribe_keeps_artifacts_when_requested() {
        let dir = tempdir().unwrap();
        let fixture = dir.path().join("fixture.wav");
        write_fixture(&fixture, 2, 1000);

        let config = test_config(dir.path(), 1000, 2);
        let fetcher = MockFetcher::new(fixture);
        let factory = Arc::new(MockDecoderFactory::new());

        transcribe(&config, "http://example.com/a.wav", &fetcher, factory, true, true)
            .await
            .unwrap();

        assert!(config.source_path().exists());
        assert!(config.chunk_dir().join("chunk_0.wav").exists());
        assert!(config.chunk_dir().join("chunk_1.wav").exists());
    }

    #[tokio::test]
    async fn failed_acquisition_aborts_before_chunking_and_still_cleans() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path(), 1000, 2);
        let fetcher = MockFetcher::new(dir.path().join("unused.wav")).with_failure();
        let factory = Arc::new(MockDecoderFactory::new());

        let result = transcribe(&config, "http://example.com/a.wav", &fetcher, factory, false, true).await;

        assert!(matches!(result, Err(TapescriptError::Acquisition { .. })));
        assert!(!config.source_path().exists());
        assert!(!config.chunk_dir().exists());
    }

    #[tokio::test]
    async fn invalid_source_cleans_up_downloaded_file() {
        let dir = tempdir().unwrap();
        let fixture = dir.path().join("fixture.wav");
        std::fs::write(&fixture, b"not a wav container").unwrap();

        let config = test_config(dir.path(), 1000, 2);
        let fetcher = MockFetcher::new(fixture);
        let factory = Arc::new(MockDecoderFactory::new());

        let result = transcribe(&config, "http://example.com/a.wav", &fetcher, factory, false, true).await;

        assert!(matches!(result, Err(TapescriptError::Io(_))));
        // Guard removed the fetched-but-undecodable source.
        assert!(!config.source_path().exists());
    }

    #[test]
    fn cli_overrides_replace_config_values() {
        use clap::Parser;
        let cli = Cli::parse_from([
            "tapescript",
            "http://example.com/a.wav",
            "-c",
            "30s",
            "-w",
            "2",
            "--fail-fast",
        ]);

        let mut config = Config::default();
        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.pipeline.chunk_length_ms, 30_000);
        assert_eq!(config.pipeline.worker_count, 2);
        assert!(config.pipeline.fail_fast);
    }
}
