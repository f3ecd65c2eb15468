//! Reflow configuration.
//!
//! [`ReflowOptions`] is a builder that carries line limits, the size metric,
//! translation languages, and a progress callback through a reflow run.
//!
//! # Example
//!
//! ```no_run
//! use subreflow::{Formality, ReflowOptions, SizeMetric};
//!
//! let options = ReflowOptions::new()
//!     .with_source_language("EN")
//!     .with_target_language("DE")
//!     .with_formality(Formality::More)
//!     .with_max_lines(2)
//!     .with_max_line_length(42)
//!     .with_metric(SizeMetric::Words);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::block::{SizeMetric, SourceBlock};
use crate::error::ReflowError;
use crate::placement::PlacementLimits;
use crate::progress::{NoOpProgress, ProgressCallback};
use crate::translate::Formality;

/// Default source language code.
pub const DEFAULT_SOURCE_LANGUAGE: &str = "NL";
/// Default target language code.
pub const DEFAULT_TARGET_LANGUAGE: &str = "FR";

/// Settings for a reflow run.
///
/// Line limits left unset are taken from the source file: the largest line
/// count and the longest line among its blocks.
#[derive(Clone)]
pub struct ReflowOptions {
    pub(crate) source_language: String,
    pub(crate) target_language: String,
    pub(crate) formality: Formality,
    pub(crate) max_lines: Option<usize>,
    pub(crate) max_line_length: Option<usize>,
    pub(crate) metric: SizeMetric,
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for ReflowOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ReflowOptions")
            .field("source_language", &self.source_language)
            .field("target_language", &self.target_language)
            .field("formality", &self.formality)
            .field("max_lines", &self.max_lines)
            .field("max_line_length", &self.max_line_length)
            .field("metric", &self.metric)
            .finish()
    }
}

impl Default for ReflowOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ReflowOptions {
    /// Create options with default settings.
    ///
    /// Defaults: `NL` → `FR`, default formality, character metric, line
    /// limits taken from the source, no progress callback.
    pub fn new() -> Self {
        Self {
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            formality: Formality::Default,
            max_lines: None,
            max_line_length: None,
            metric: SizeMetric::Characters,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Set the source language code (e.g. `EN`).
    #[must_use]
    pub fn with_source_language(mut self, code: &str) -> Self {
        self.source_language = code.to_uppercase();
        self
    }

    /// Set the target language code (e.g. `DE`).
    #[must_use]
    pub fn with_target_language(mut self, code: &str) -> Self {
        self.target_language = code.to_uppercase();
        self
    }

    /// Set the requested register of the translation.
    #[must_use]
    pub fn with_formality(mut self, formality: Formality) -> Self {
        self.formality = formality;
        self
    }

    /// Cap the number of lines per output block.
    #[must_use]
    pub fn with_max_lines(mut self, lines: usize) -> Self {
        self.max_lines = Some(lines);
        self
    }

    /// Cap the number of characters per output line.
    #[must_use]
    pub fn with_max_line_length(mut self, length: usize) -> Self {
        self.max_line_length = Some(length);
        self
    }

    /// Choose how block sizes are measured.
    #[must_use]
    pub fn with_metric(mut self, metric: SizeMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// The source language code.
    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    /// The target language code.
    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// The size metric.
    pub fn metric(&self) -> SizeMetric {
        self.metric
    }

    /// Resolve the line limits against `blocks`.
    ///
    /// # Errors
    ///
    /// [`ReflowError::InvalidConfiguration`] if an explicit limit is zero,
    /// or if a limit is left unset and `blocks` give nothing to derive it
    /// from.
    pub fn resolve_limits(&self, blocks: &[SourceBlock]) -> Result<PlacementLimits, ReflowError> {
        let max_lines = match self.max_lines {
            Some(lines) => lines,
            None => blocks.iter().map(|block| block.lines.len()).max().unwrap_or(0),
        };
        let max_line_length = match self.max_line_length {
            Some(length) => length,
            None => blocks.iter().map(SourceBlock::longest_line).max().unwrap_or(0),
        };

        if max_lines == 0 {
            return Err(ReflowError::InvalidConfiguration(
                "max lines per block must be greater than zero".to_string(),
            ));
        }
        if max_line_length == 0 {
            return Err(ReflowError::InvalidConfiguration(
                "max line length must be greater than zero".to_string(),
            ));
        }

        Ok(PlacementLimits {
            max_lines,
            max_line_length,
            metric: self.metric,
        })
    }
}
