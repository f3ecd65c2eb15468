//! Core [`SubtitleFile`] implementation.
//!
//! `SubtitleFile` is the main entry point for the crate. It holds the
//! parsed source blocks and drives a reflow run: sentence segmentation,
//! one batch call to a [`Translator`], budget assignment, and placement of
//! the translated words into new blocks.

use std::path::{Path, PathBuf};

use crate::block::{SourceBlock, TargetBlock};
use crate::budget::{assign_capacities, expansion_factor};
use crate::configuration::ReflowOptions;
use crate::error::ReflowError;
use crate::placement::{PlacementLimits, PlacementSummary, Placer, TranslatedSentence};
use crate::progress::{ProgressTracker, Stage};
use crate::segment::{Segmenter, Sentence};
use crate::subtitle::{format_blocks, parse_blocks, read_blocks, write_blocks};
use crate::translate::{TranslationRequest, Translator};
use crate::validation::{ValidationReport, validate_blocks};

/// A parsed subtitle file, ready to be translated and reflowed.
///
/// # Example
///
/// ```no_run
/// use subreflow::{DeeplTranslator, ReflowError, ReflowOptions, SubtitleFile};
///
/// let file = SubtitleFile::open("movie.srt")?;
/// let translator = DeeplTranslator::new("my-key:fx")?;
/// let reflow = file.reflow(&translator, &ReflowOptions::new().with_target_language("EN"))?;
/// reflow.save("movie.en.srt", false)?;
/// # Ok::<(), ReflowError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SubtitleFile {
    pub(crate) blocks: Vec<SourceBlock>,
    pub(crate) file_path: Option<PathBuf>,
}

/// The result of a reflow run.
#[derive(Debug, Clone)]
pub struct Reflow {
    /// Output blocks, one per source block, in source order.
    pub blocks: Vec<TargetBlock>,
    /// Translated sentences with their provenance, in placement order.
    pub sentences: Vec<TranslatedSentence>,
    /// Ratio of translated size to source size.
    pub expansion_factor: f64,
    /// Line limits the placement ran with.
    pub limits: PlacementLimits,
    /// What happened during placement.
    pub summary: PlacementSummary,
}

impl Reflow {
    /// Render the output blocks as subtitle text.
    pub fn to_subtitle_string(&self) -> String {
        format_blocks(&self.blocks)
    }

    /// Write the output blocks to `path`.
    ///
    /// # Errors
    ///
    /// - [`ReflowError::OutputExists`] if `path` exists and `overwrite` is
    ///   false.
    /// - [`ReflowError::IoError`] if writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P, overwrite: bool) -> Result<(), ReflowError> {
        write_blocks(path, &self.blocks, overwrite)
    }
}

impl SubtitleFile {
    /// Open and parse a subtitle file.
    ///
    /// # Errors
    ///
    /// - [`ReflowError::FileOpen`] if the file cannot be read.
    /// - [`ReflowError::NotSubtitleFile`] or [`ReflowError::MalformedBlock`]
    ///   if it does not parse.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReflowError> {
        let path = path.as_ref();
        log::debug!("Opening subtitle file: {}", path.display());

        Ok(Self {
            blocks: read_blocks(path)?,
            file_path: Some(path.to_path_buf()),
        })
    }

    /// Parse subtitle text held in memory.
    ///
    /// # Errors
    ///
    /// Same parse errors as [`open`](SubtitleFile::open).
    pub fn parse(content: &str) -> Result<Self, ReflowError> {
        Ok(Self {
            blocks: parse_blocks(content)?,
            file_path: None,
        })
    }

    /// Wrap already-parsed blocks.
    pub fn from_blocks(blocks: Vec<SourceBlock>) -> Self {
        Self {
            blocks,
            file_path: None,
        }
    }

    /// The source blocks, in file order.
    pub fn blocks(&self) -> &[SourceBlock] {
        &self.blocks
    }

    /// The path this file was opened from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Check the file for issues that may degrade the reflow.
    pub fn validate(&self) -> ValidationReport {
        validate_blocks(&self.blocks)
    }

    /// Reconstruct the sentences that will be sent for translation.
    pub fn sentences(&self) -> Vec<Sentence> {
        self.segment_with(&ReflowOptions::new())
    }

    /// Translate the file with `translator` and reflow the result.
    ///
    /// Line limits are resolved before anything is sent, so configuration
    /// errors never cost a provider call.
    ///
    /// # Errors
    ///
    /// - [`ReflowError::InvalidConfiguration`] if the line limits are zero.
    /// - Any error returned by `translator`.
    /// - [`ReflowError::CardinalityMismatch`] if the translator returns a
    ///   different number of strings than it was sent.
    pub fn reflow<T: Translator + ?Sized>(
        &self,
        translator: &T,
        options: &ReflowOptions,
    ) -> Result<Reflow, ReflowError> {
        options.resolve_limits(&self.blocks)?;
        let sentences = self.segment_with(options);
        let texts: Vec<String> = sentences
            .iter()
            .map(|sentence| sentence.text.clone())
            .collect();

        let mut tracker =
            ProgressTracker::new(options.progress.as_ref(), Stage::Translation, Some(1));
        tracker.report();
        let translations = translator.translate(&TranslationRequest {
            texts: &texts,
            source_language: &options.source_language,
            target_language: &options.target_language,
            formality: options.formality,
        })?;
        tracker.advance(1);

        self.apply_translations(&sentences, translations, options)
    }

    /// Reflow translations obtained elsewhere.
    ///
    /// `translations[i]` must be the translation of `sentences[i]`.
    ///
    /// # Errors
    ///
    /// - [`ReflowError::InvalidConfiguration`] if the line limits are zero.
    /// - [`ReflowError::CardinalityMismatch`] if the lengths differ.
    pub fn apply_translations(
        &self,
        sentences: &[Sentence],
        translations: Vec<String>,
        options: &ReflowOptions,
    ) -> Result<Reflow, ReflowError> {
        if translations.len() != sentences.len() {
            return Err(ReflowError::CardinalityMismatch {
                expected: sentences.len(),
                actual: translations.len(),
            });
        }

        let limits = options.resolve_limits(&self.blocks)?;
        let factor = expansion_factor(&self.blocks, &translations, limits.metric);
        let mut blocks = assign_capacities(&self.blocks, factor, limits.metric);

        let translated: Vec<TranslatedSentence> = sentences
            .iter()
            .zip(translations)
            .map(|(sentence, text)| TranslatedSentence {
                text,
                provenance: sentence.provenance.clone(),
            })
            .collect();

        let mut tracker = ProgressTracker::new(
            options.progress.as_ref(),
            Stage::Placement,
            Some(translated.len() as u64),
        );
        let mut placer = Placer::new(&mut blocks, limits);
        for sentence in &translated {
            placer.place_sentence(&sentence.text, &sentence.provenance);
            tracker.advance(1);
        }
        let summary = placer.finish();

        log::debug!(
            "Placed {} words into {} blocks ({} regressions, exhausted: {})",
            summary.words,
            blocks.len(),
            summary.regressions,
            summary.exhausted,
        );

        Ok(Reflow {
            blocks,
            sentences: translated,
            expansion_factor: factor,
            limits,
            summary,
        })
    }

    fn segment_with(&self, options: &ReflowOptions) -> Vec<Sentence> {
        let mut tracker = ProgressTracker::new(
            options.progress.as_ref(),
            Stage::Segmentation,
            Some(self.blocks.len() as u64),
        );
        let mut segmenter = Segmenter::new();
        for block in &self.blocks {
            segmenter.push(block);
            tracker.advance(1);
        }
        segmenter.finish()
    }
}
