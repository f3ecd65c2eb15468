//! Greedy reflow of translated words into target blocks.
//!
//! Words are placed one at a time, in sentence order, into the block the
//! sentence started in. A block is considered full once it has reached
//! `max_lines` and the next word would push its last line past
//! `max_line_length`, or once the last line would reach the block's fair
//! share (`capacity / max_lines`). Placement then moves on to the next
//! later block.
//!
//! Two conditions relax the fair-share check:
//!
//! - **Overflow**: a sentence nominally starts before the block placement
//!   has already advanced to. It is clamped to that block and the
//!   fair-share ceiling is lifted until a later block is reached.
//! - **Exhaustion**: there is no later block. Everything that remains goes
//!   to the last block, with no fullness check at all. This never ends.
//!
//! No word is ever dropped. A word longer than `max_line_length` still gets
//! its own line.

use serde::Serialize;

use crate::block::{SizeMetric, Timestamp, TargetBlock};
use crate::budget::fair_share;

/// Line limits applied while placing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementLimits {
    /// Maximum number of lines per block.
    pub max_lines: usize,
    /// Maximum characters per line.
    pub max_line_length: usize,
    /// Unit of block capacities, used for the fair-share check.
    pub metric: SizeMetric,
}

/// A translated sentence paired with the provenance of its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedSentence {
    /// Translated text.
    pub text: String,
    /// Source block timestamps, earliest first.
    pub provenance: Vec<Timestamp>,
}

/// What happened during a placement pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementSummary {
    /// Number of words placed.
    pub words: usize,
    /// Number of sentences that started before the block placement had
    /// already reached.
    pub regressions: usize,
    /// Whether placement ran out of blocks and spilled into the last one.
    pub exhausted: bool,
}

/// Running state of one placement pass over a set of target blocks.
///
/// The placer is the only thing that mutates the blocks while it lives.
#[derive(Debug)]
pub struct Placer<'a> {
    blocks: &'a mut [TargetBlock],
    limits: PlacementLimits,
    current: usize,
    last_consumed: Option<usize>,
    overflow_active: bool,
    exhausted: bool,
    summary: PlacementSummary,
}

impl<'a> Placer<'a> {
    /// Start a pass over `blocks`, which must be ordered by timestamp.
    pub fn new(blocks: &'a mut [TargetBlock], limits: PlacementLimits) -> Self {
        Self {
            blocks,
            limits: PlacementLimits {
                max_lines: limits.max_lines.max(1),
                ..limits
            },
            current: 0,
            last_consumed: None,
            overflow_active: false,
            exhausted: false,
            summary: PlacementSummary::default(),
        }
    }

    /// Whether the fair-share check is currently lifted because of a
    /// timing regression.
    pub fn is_overflowing(&self) -> bool {
        self.overflow_active
    }

    /// Whether placement has run out of blocks.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Place every word of one translated sentence.
    pub fn place_sentence(&mut self, text: &str, provenance: &[Timestamp]) {
        if self.blocks.is_empty() {
            return;
        }

        self.select_start(provenance.first());
        for word in text.split_whitespace() {
            self.place_word(word);
        }
    }

    /// Finish the pass.
    pub fn finish(self) -> PlacementSummary {
        PlacementSummary {
            exhausted: self.exhausted,
            ..self.summary
        }
    }

    fn select_start(&mut self, start: Option<&Timestamp>) {
        if self.exhausted {
            return;
        }
        let Some(start) = start else {
            return;
        };

        if let Some(last) = self.last_consumed {
            if *start < self.blocks[last].timestamp {
                log::debug!(
                    "Sentence starting at {start} is behind block {}, overflowing",
                    self.blocks[last].timestamp
                );
                self.current = last;
                self.overflow_active = true;
                self.summary.regressions += 1;
                return;
            }
        }

        let selected = self
            .blocks
            .iter()
            .position(|block| block.timestamp >= *start)
            .unwrap_or(self.blocks.len() - 1);
        if selected > self.current {
            self.overflow_active = false;
        }
        self.current = selected;
    }

    fn place_word(&mut self, word: &str) {
        if !self.exhausted && self.is_full(word) {
            self.advance();
        }

        let relaxed = self.overflow_active || self.exhausted;
        let limits = self.limits;
        let block = &mut self.blocks[self.current];
        let share = fair_share(block.capacity, limits.max_lines);
        let line_count = block.lines.len();

        let open_line = match block.last_line() {
            None => true,
            Some(last) => {
                let too_long = appended_length(last, word) > limits.max_line_length;
                let over_share = !relaxed && breaches_share(last, word, share, limits.metric);
                let may_open_line = line_count < limits.max_lines || relaxed;
                may_open_line && (too_long || over_share)
            }
        };

        if open_line {
            block.lines.push(word.to_string());
        } else if let Some(last) = block.lines.last_mut() {
            last.push(' ');
            last.push_str(word);
        }

        log::trace!("Placed {word:?} in block {}", block.timestamp);
        self.summary.words += 1;
    }

    fn is_full(&self, word: &str) -> bool {
        let block = &self.blocks[self.current];
        let Some(last) = block.last_line() else {
            return false;
        };

        let physically_full = block.lines.len() >= self.limits.max_lines
            && appended_length(last, word) > self.limits.max_line_length;
        if physically_full {
            return true;
        }

        !self.overflow_active
            && breaches_share(
                last,
                word,
                fair_share(block.capacity, self.limits.max_lines),
                self.limits.metric,
            )
    }

    fn advance(&mut self) {
        let current_timestamp = &self.blocks[self.current].timestamp;
        let next = self.blocks[self.current + 1..]
            .iter()
            .position(|block| block.timestamp > *current_timestamp);

        match next {
            Some(offset) => {
                self.current += 1 + offset;
                self.last_consumed = Some(self.current);
                self.overflow_active = false;
            }
            None => {
                log::warn!(
                    "Translated text outgrew the available blocks, spilling into the last one"
                );
                self.exhausted = true;
                self.current = self.blocks.len() - 1;
            }
        }
    }
}

/// Reflow `sentences` into `blocks`.
///
/// `blocks` must be ordered by timestamp and already carry their
/// capacities. Lines are appended to whatever the blocks already hold.
pub fn place(
    sentences: &[TranslatedSentence],
    blocks: &mut [TargetBlock],
    limits: PlacementLimits,
) -> PlacementSummary {
    let mut placer = Placer::new(blocks, limits);
    for sentence in sentences {
        placer.place_sentence(&sentence.text, &sentence.provenance);
    }
    placer.finish()
}

/// Characters in `line` after appending `word` with a separating space.
fn appended_length(line: &str, word: &str) -> usize {
    line.chars().count() + 1 + word.chars().count()
}

/// Whether appending `word` to `line` would meet or exceed `share`,
/// measured in `metric` units.
fn breaches_share(line: &str, word: &str, share: f64, metric: SizeMetric) -> bool {
    let appended = match metric {
        SizeMetric::Characters => appended_length(line, word),
        SizeMetric::Words => line.split_whitespace().count() + 1,
    };
    appended as f64 >= share
}
