//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Process
//!
//! ```text
//! Processing 3 images from source/photos
//! 001 harbour
//!     Source: DSC_0001.jpg
//!     thumbnail.jpg: 400x267
//!     thumbnail.webp: 400x267
//!     medium.jpg: 1200x800
//!     medium.webp: 1200x800
//!     original.jpg: 2400x1600
//! 002 lisbon
//!     Source: lisbon.jpg
//!     complete, skipped
//! 003 (broken.jpg)
//!     Error: Image processing failed: ...
//!
//! 1 generated, 1 skipped, 1 failed (3 total)
//! ```
//!
//! ## Tags
//!
//! ```text
//! night (1)
//! water (2)
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::process::{BatchSummary, ProcessEvent};
use crate::rendition::RenditionOutcome;
use std::collections::BTreeMap;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

// ============================================================================
// Process output
// ============================================================================

/// Format a single process progress event as display lines.
///
/// Each image leads with its positional index and slug. The source file and
/// per-rendition results are shown as indented context.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started {
            source_dir,
            image_count,
        } => vec![format!(
            "Processing {} images from {}",
            image_count,
            source_dir.display()
        )],
        ProcessEvent::NoImages { source_dir } => {
            vec![format!("No images found in {}", source_dir.display())]
        }
        ProcessEvent::ImageProcessed {
            index,
            filename,
            slug,
            outcome,
        } => {
            let mut lines = vec![
                format!("{} {}", format_index(*index), slug),
                format!("{}Source: {}", indent(1), filename),
            ];
            match outcome {
                RenditionOutcome::Skipped => {
                    lines.push(format!("{}complete, skipped", indent(1)));
                }
                RenditionOutcome::Generated(files) => {
                    for f in files {
                        lines.push(format!("{}{}: {}x{}", indent(1), f.file, f.width, f.height));
                    }
                }
            }
            lines
        }
        ProcessEvent::ImageFailed {
            index,
            filename,
            error,
        } => vec![
            format!("{} ({})", format_index(*index), filename),
            format!("{}Error: {}", indent(1), error),
        ],
    }
}

/// Format the end-of-run summary, listing each failure.
pub fn format_summary(summary: &BatchSummary) -> Vec<String> {
    let mut lines = vec![String::new(), summary.to_string()];
    if !summary.failures.is_empty() {
        lines.push("Failed:".to_string());
        for failure in &summary.failures {
            lines.push(format!("{}{}: {}", indent(1), failure.filename, failure.error));
        }
    }
    lines
}

/// Print the end-of-run summary to stdout.
pub fn print_summary(summary: &BatchSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Catalog output
// ============================================================================

/// Format tag counts, one tag per line in name order.
pub fn format_tags(tags: &BTreeMap<String, usize>) -> Vec<String> {
    if tags.is_empty() {
        return vec!["No tags".to_string()];
    }
    tags.iter()
        .map(|(tag, count)| format!("{} ({})", tag, count))
        .collect()
}

/// Print tag counts to stdout.
pub fn print_tags(tags: &BTreeMap<String, usize>) {
    for line in format_tags(tags) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
