//! Per-block size budgets.
//!
//! Translations rarely have the same length as their source. The budget
//! calculator measures how much the whole text grew or shrank and scales
//! every block's own size by that factor, so each output block is asked to
//! hold roughly the share of the translation its source block held of the
//! original.

use crate::block::{SizeMetric, SourceBlock, TargetBlock};

/// Ratio of the translated size to the source size, both measured with
/// `metric`.
///
/// Returns `1.0` when the source is empty, leaving budgets unscaled.
pub fn expansion_factor<S: AsRef<str>>(
    sources: &[SourceBlock],
    translations: &[S],
    metric: SizeMetric,
) -> f64 {
    let source_total: usize = sources.iter().map(|block| block.size(metric)).sum();
    let translated_total: usize = translations
        .iter()
        .map(|text| metric.measure(text.as_ref()))
        .sum();

    if source_total == 0 {
        return 1.0;
    }
    translated_total as f64 / source_total as f64
}

/// Budget of one block: `ceil(size × factor)`.
pub fn capacity(source: &SourceBlock, factor: f64, metric: SizeMetric) -> usize {
    (source.size(metric) as f64 * factor).ceil() as usize
}

/// Build one empty [`TargetBlock`] per source block, with its capacity set.
pub fn assign_capacities(
    sources: &[SourceBlock],
    factor: f64,
    metric: SizeMetric,
) -> Vec<TargetBlock> {
    log::debug!("Expansion factor {factor:.3} ({metric})");
    sources
        .iter()
        .map(|source| {
            let mut target = TargetBlock::placeholder(source);
            target.capacity = capacity(source, factor, metric);
            target
        })
        .collect()
}

/// Soft per-line ceiling of a block: its capacity spread evenly over
/// `max_lines` lines.
pub fn fair_share(capacity: usize, max_lines: usize) -> f64 {
    capacity as f64 / max_lines.max(1) as f64
}
