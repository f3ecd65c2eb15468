//! Sentence reconstruction across block boundaries.
//!
//! Subtitle blocks cut sentences at arbitrary points. Translating block by
//! block would hand the provider fragments, so [`segment`] first stitches
//! the text back into whole sentences, remembering which blocks each one
//! came from.
//!
//! Only `.`, `!` and `?` terminate a sentence. Blocks are joined with a
//! single space, which can occasionally merge or split what a reader would
//! consider sentences; that is accepted.
//!
//! # Example
//!
//! ```
//! use subreflow::{SourceBlock, segment};
//!
//! let blocks = vec![
//!     SourceBlock::new("1", "1", vec!["Hello world.".to_string()]),
//!     SourceBlock::new("2", "2", vec!["How are you".to_string()]),
//!     SourceBlock::new("3", "3", vec!["today?".to_string()]),
//! ];
//!
//! let sentences = segment(&blocks);
//! assert_eq!(sentences[0].text, "Hello world.");
//! assert_eq!(sentences[1].text, "How are you today?");
//! assert_eq!(sentences[1].provenance.len(), 2);
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::block::{SourceBlock, Timestamp};

/// A run of non-terminators followed by one or more terminators.
static COMPLETE_SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]*[.!?]+").expect("sentence pattern is valid"));

/// A reconstructed sentence and the blocks that contributed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sentence {
    /// Trimmed sentence text. May be punctuation only.
    pub text: String,
    /// Timestamps of contributing blocks, earliest first.
    pub provenance: Vec<Timestamp>,
}

impl Sentence {
    /// Timestamp of the first contributing block.
    pub fn start(&self) -> Option<&Timestamp> {
        self.provenance.first()
    }
}

/// Running state of one segmentation pass.
///
/// Feed blocks in order with [`push`](Segmenter::push), then call
/// [`finish`](Segmenter::finish) to flush the unterminated remainder.
#[derive(Debug, Default)]
pub struct Segmenter {
    carry: String,
    pending_provenance: Vec<Timestamp>,
    sentences: Vec<Sentence>,
}

impl Segmenter {
    /// Create an empty segmenter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one block.
    pub fn push(&mut self, block: &SourceBlock) {
        let text = block.text();
        let found: Vec<_> = COMPLETE_SENTENCE.find_iter(&text).collect();

        let Some(last) = found.last() else {
            append_spaced(&mut self.carry, text.trim());
            self.pending_provenance.push(block.timestamp.clone());
            return;
        };
        let remainder = text[last.end()..].trim().to_string();

        for (position, found_sentence) in found.iter().enumerate() {
            let mut sentence_text = found_sentence.as_str().trim().to_string();
            let mut provenance = Vec::new();

            if position == 0 {
                if !self.carry.is_empty() {
                    let mut joined = std::mem::take(&mut self.carry);
                    append_spaced(&mut joined, &sentence_text);
                    sentence_text = joined;
                }
                provenance.append(&mut self.pending_provenance);
            }
            provenance.push(block.timestamp.clone());

            self.sentences.push(Sentence {
                text: sentence_text,
                provenance,
            });
        }

        if !remainder.is_empty() {
            self.pending_provenance.push(block.timestamp.clone());
        }
        self.carry = remainder;
    }

    /// Flush the remainder as a final sentence and return everything
    /// emitted so far.
    pub fn finish(mut self) -> Vec<Sentence> {
        if !self.carry.is_empty() {
            self.sentences.push(Sentence {
                text: self.carry,
                provenance: self.pending_provenance,
            });
        }
        log::debug!("Segmented into {} sentences", self.sentences.len());
        self.sentences
    }
}

/// Reconstruct the sentences of `blocks`, in order.
pub fn segment(blocks: &[SourceBlock]) -> Vec<Sentence> {
    let mut segmenter = Segmenter::new();
    for block in blocks {
        segmenter.push(block);
    }
    segmenter.finish()
}

fn append_spaced(target: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}
