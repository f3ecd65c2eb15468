//! Timestamped subtitle blocks.
//!
//! A [`SourceBlock`] is one parsed unit of the input file. A [`TargetBlock`]
//! is its counterpart in the output: same label and timestamp, but lines
//! rebuilt from translated words by the [placement engine](crate::placement).

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;

/// Opaque, totally ordered timing key of a block.
///
/// Holds the raw timestamp line (e.g. `00:00:01,000 --> 00:00:03,500`).
/// Ordering is lexical, which matches temporal order for the zero-padded
/// time ranges subtitle files use.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Wrap a raw timestamp line.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw timestamp text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for Timestamp {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// How the size of a piece of text is measured for budgeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeMetric {
    /// Count characters. This is the default.
    #[default]
    Characters,
    /// Count whitespace-delimited words.
    Words,
}

impl SizeMetric {
    /// Measure `text` with this metric.
    pub fn measure(self, text: &str) -> usize {
        match self {
            SizeMetric::Characters => text.chars().count(),
            SizeMetric::Words => text.split_whitespace().count(),
        }
    }
}

impl Display for SizeMetric {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SizeMetric::Characters => write!(f, "characters"),
            SizeMetric::Words => write!(f, "words"),
        }
    }
}

/// One block of the source subtitle file. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBlock {
    /// Sequence label. Not required to be unique or contiguous.
    pub index: String,
    /// Timing key.
    pub timestamp: Timestamp,
    /// Text lines in display order.
    pub lines: Vec<String>,
}

impl SourceBlock {
    /// Create a block from its parts.
    pub fn new(
        index: impl Into<String>,
        timestamp: impl Into<Timestamp>,
        lines: Vec<String>,
    ) -> Self {
        Self {
            index: index.into(),
            timestamp: timestamp.into(),
            lines,
        }
    }

    /// All lines joined with single spaces.
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }

    /// Size of [`text`](SourceBlock::text) under `metric`.
    pub fn size(&self, metric: SizeMetric) -> usize {
        metric.measure(&self.text())
    }

    /// Length in characters of the longest line.
    pub fn longest_line(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
    }
}

impl From<String> for Timestamp {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// An output block being filled with translated words.
///
/// Created empty from a [`SourceBlock`] with
/// [`TargetBlock::placeholder`]; the budget calculator sets its capacity
/// and the placement engine appends lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetBlock {
    /// Label copied from the source block.
    pub index: String,
    /// Timestamp copied from the source block.
    pub timestamp: Timestamp,
    /// Size budget, in the unit of the configured [`SizeMetric`].
    pub capacity: usize,
    /// Lines placed so far.
    pub lines: Vec<String>,
}

impl TargetBlock {
    /// An empty block carrying `source`'s label and timestamp, with zero
    /// capacity until budgets are assigned.
    pub fn placeholder(source: &SourceBlock) -> Self {
        Self {
            index: source.index.clone(),
            timestamp: source.timestamp.clone(),
            capacity: 0,
            lines: Vec::new(),
        }
    }

    /// The last line, if any.
    pub fn last_line(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    /// All lines joined with single spaces.
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }
}
