//! User-facing console rendering.
//!
//! Separate from diagnostic logging: status lines, the interactive source
//! prompt, the paged summary view, and key-point bullets all live here.
//! Everything degrades to plain flow when stdout is not a terminal.

use crate::error::{Result, TapescriptError};
use crate::pipeline::types::WorkerFailure;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, IsTerminal, Write};

/// Print a green status line.
pub fn status(message: &str) {
    println!("{}", message.green());
}

/// Print a red error line to stderr.
pub fn error(message: &str) {
    eprintln!("{}", message.red());
}

/// Prompt interactively for a source locator.
pub fn prompt_source() -> Result<String> {
    print!("{}", "Enter the recording URL: ".cyan());
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let locator = line.trim().to_string();
    if locator.is_empty() {
        return Err(TapescriptError::Acquisition {
            message: "no source locator provided".to_string(),
        });
    }
    Ok(locator)
}

/// Print the assembled transcript.
pub fn print_transcript(text: &str) {
    println!("{}", "Transcript:".yellow());
    println!("{text}");
}

/// Print the summary under a heading, pausing afterwards when interactive.
pub fn print_summary(summary: &str, page: bool) {
    println!("{}", "Summary:".yellow());
    for line in summary.lines() {
        println!("{line}");
    }

    if page && io::stdin().is_terminal() {
        print!("Press Enter to continue...");
        if io::stdout().flush().is_ok() {
            let mut discard = String::new();
            let _ = io::stdin().lock().read_line(&mut discard);
        }
    }
}

/// Print key points as a bulleted list.
pub fn print_key_points(points: &[String]) {
    println!("{}", "Key Points:".green());
    for point in points {
        println!("{}", format!("• {point}").cyan());
    }
}

/// Warn that the run is partial, naming the missing chunk positions.
pub fn warn_partial(missing: &[usize], failures: &[WorkerFailure]) {
    let positions = missing
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    eprintln!(
        "{}",
        format!("Warning: transcript is incomplete; no result for chunk position(s) {positions}")
            .yellow()
    );
    for failure in failures {
        eprintln!(
            "{}",
            format!(
                "  worker {} stopped at chunk {}: {}",
                failure.worker, failure.position, failure.message
            )
            .yellow()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Rendering writes straight to stdout/stderr; these are smoke tests
    // verifying nothing panics.

    #[test]
    fn status_and_error_render() {
        status("Downloading audio...");
        error("something went wrong");
    }

    #[test]
    fn transcript_and_key_points_render() {
        print_transcript("hello world");
        print_key_points(&["first".to_string(), "second".to_string()]);
        print_key_points(&[]);
    }

    #[test]
    fn summary_unpaged_renders() {
        print_summary("line one\nline two", false);
    }

    #[test]
    fn partial_warning_names_positions() {
        warn_partial(
            &[4],
            &[WorkerFailure {
                worker: 1,
                position: 4,
                message: "decode failed".to_string(),
            }],
        );
    }
}
