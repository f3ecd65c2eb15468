//! Subtitle file validation.
//!
//! Provides [`SubtitleFile::validate`](crate::SubtitleFile::validate), which
//! inspects parsed blocks and returns a [`ValidationReport`] describing the
//! file and anything that may degrade the reflow.
//!
//! # Example
//!
//! ```no_run
//! use subreflow::SubtitleFile;
//!
//! let file = SubtitleFile::open("input.srt")?;
//! let report = file.validate();
//! if report.is_valid() {
//!     println!("File is valid");
//! } else {
//!     for warning in &report.warnings {
//!         println!("Warning: {warning}");
//!     }
//! }
//! # Ok::<(), subreflow::ReflowError>(())
//! ```

use std::collections::HashSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::block::SourceBlock;

/// Findings about a parsed subtitle file, grouped by severity.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Block count and the line limits a reflow would default to.
    pub info: Vec<String>,
    /// Duplicate labels, out-of-order timestamps, and blocks without text.
    /// The file can still be reflowed, but output timing may drift.
    pub warnings: Vec<String>,
    /// Problems that leave nothing to reflow, such as a file with no blocks.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Whether the file can be reflowed. Warnings do not count against it.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of findings of any severity, including info lines.
    pub fn issue_count(&self) -> usize {
        self.info.len() + self.warnings.len() + self.errors.len()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for item in &self.info {
            writeln!(f, "[INFO] {item}")?;
        }
        for item in &self.warnings {
            writeln!(f, "[WARN] {item}")?;
        }
        for item in &self.errors {
            writeln!(f, "[ERROR] {item}")?;
        }
        if self.issue_count() == 0 {
            writeln!(f, "No issues found.")?;
        }
        Ok(())
    }
}

/// Run validation checks on parsed blocks.
pub(crate) fn validate_blocks(blocks: &[SourceBlock]) -> ValidationReport {
    let mut report = ValidationReport::default();

    if blocks.is_empty() {
        report
            .errors
            .push("File contains no subtitle blocks".to_string());
        return report;
    }

    let max_lines = blocks.iter().map(|block| block.lines.len()).max().unwrap_or(0);
    let longest_line = blocks.iter().map(SourceBlock::longest_line).max().unwrap_or(0);
    report.info.push(format!(
        "{} blocks, at most {max_lines} lines of at most {longest_line} characters",
        blocks.len(),
    ));

    // ── Labels ─────────────────────────────────────────────────────
    let mut seen = HashSet::new();
    for block in blocks {
        if !seen.insert(block.index.as_str()) {
            report
                .warnings
                .push(format!("Duplicate block label {}", block.index));
        }
    }

    // ── Timing ─────────────────────────────────────────────────────
    for pair in blocks.windows(2) {
        if pair[1].timestamp <= pair[0].timestamp {
            report.warnings.push(format!(
                "Block {} ({}) does not come after block {} ({})",
                pair[1].index, pair[1].timestamp, pair[0].index, pair[0].timestamp,
            ));
        }
    }

    // ── Text ───────────────────────────────────────────────────────
    let empty = blocks
        .iter()
        .filter(|block| block.text().trim().is_empty())
        .count();
    if empty > 0 {
        report
            .warnings
            .push(format!("{empty} blocks have no text and will receive no budget"));
    }

    for warning in &report.warnings {
        log::warn!("{warning}");
    }

    report
}
