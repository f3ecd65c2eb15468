//! # subreflow
//!
//! Re-time machine-translated subtitles onto the original timeline.
//!
//! Subtitle blocks cut sentences at arbitrary points, and translating them
//! block by block gives the translator fragments with no context.
//! `subreflow` instead:
//!
//! 1. rebuilds whole sentences across block boundaries, remembering which
//!    blocks each sentence came from,
//! 2. sends all sentences to a translation provider in a single batch, and
//! 3. reflows the translated words back into one output block per source
//!    block, honoring line-count and line-length limits and scaling each
//!    block's budget by how much the translation grew or shrank.
//!
//! ## Quick Start
//!
//! ### Translate a File
//!
//! ```no_run
//! use subreflow::{DeeplTranslator, ReflowOptions, SubtitleFile};
//!
//! let file = SubtitleFile::open("movie.srt").unwrap();
//! let translator = DeeplTranslator::new("my-key:fx").unwrap();
//! let options = ReflowOptions::new()
//!     .with_source_language("NL")
//!     .with_target_language("FR");
//!
//! let reflow = file.reflow(&translator, &options).unwrap();
//! reflow.save("movie.fr.srt", false).unwrap();
//! ```
//!
//! ### Preview Sentences
//!
//! ```no_run
//! use subreflow::SubtitleFile;
//!
//! let file = SubtitleFile::open("movie.srt").unwrap();
//! for sentence in file.sentences() {
//!     println!("{:?}: {}", sentence.provenance, sentence.text);
//! }
//! ```
//!
//! ## Features
//!
//! - **Sentence segmentation** — `.`, `!` and `?` terminated sentences
//!   stitched across blocks, with per-sentence block provenance
//! - **Budgeting** — per-block capacity by character or word count, scaled
//!   by the global expansion factor
//! - **Greedy reflow** — deterministic word placement with overflow
//!   handling when translations run long or ahead of the timeline
//! - **DeepL client** — blocking batch translation with formality control
//! - **Validation** — duplicate labels, out-of-order timestamps, empty blocks
//! - **Progress callbacks** — per-stage progress snapshots

pub mod block;
pub mod budget;
pub mod configuration;
pub mod error;
pub mod placement;
pub mod progress;
pub mod reflow;
pub mod segment;
pub mod subtitle;
pub mod translate;
pub mod validation;

pub use block::{SizeMetric, SourceBlock, TargetBlock, Timestamp};
pub use configuration::ReflowOptions;
pub use error::ReflowError;
pub use placement::{PlacementLimits, PlacementSummary, Placer, TranslatedSentence, place};
pub use progress::{ProgressCallback, ProgressInfo, Stage};
pub use reflow::{Reflow, SubtitleFile};
pub use segment::{Segmenter, Sentence, segment};
pub use translate::{DeeplTranslator, Formality, TranslationRequest, Translator};
pub use validation::ValidationReport;
