//! Subtitle block codec.
//!
//! Reads SubRip-style text into [`SourceBlock`]s and writes
//! [`TargetBlock`]s back out. Each block is a label line, a timestamp line,
//! and its text lines, with blocks separated by blank lines:
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:03,500
//! Hello world.
//!
//! 2
//! 00:00:04,000 --> 00:00:06,000
//! How are you
//! ```
//!
//! Timestamps are kept as opaque text; nothing here interprets them.

use std::fs;
use std::path::{Path, PathBuf};

use crate::block::{SourceBlock, TargetBlock, Timestamp};
use crate::error::ReflowError;

/// File extension of subtitle files picked up by [`find_subtitle_file`].
pub const SUBTITLE_EXTENSION: &str = "srt";

/// Parse subtitle text into blocks.
///
/// A leading byte-order mark is ignored and CRLF line endings are accepted.
///
/// # Errors
///
/// - [`ReflowError::NotSubtitleFile`] if the text does not start with a
///   digit.
/// - [`ReflowError::MalformedBlock`] if a block lacks its timestamp line or
///   has no text lines.
pub fn parse_blocks(content: &str) -> Result<Vec<SourceBlock>, ReflowError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    match content.chars().next() {
        Some(first) if first.is_ascii_digit() => {}
        Some(first) => {
            return Err(ReflowError::NotSubtitleFile(format!(
                "expected a block label, found {first:?}"
            )));
        }
        None => return Err(ReflowError::NotSubtitleFile("input is empty".to_string())),
    }

    let mut blocks = Vec::new();
    let mut chunk: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !chunk.is_empty() {
                blocks.push(parse_block(&chunk, blocks.len() + 1)?);
                chunk.clear();
            }
        } else {
            chunk.push(line);
        }
    }
    if !chunk.is_empty() {
        blocks.push(parse_block(&chunk, blocks.len() + 1)?);
    }

    log::debug!("Parsed {} subtitle blocks", blocks.len());
    Ok(blocks)
}

fn parse_block(chunk: &[&str], position: usize) -> Result<SourceBlock, ReflowError> {
    match chunk {
        [label, timestamp, first, rest @ ..] => Ok(SourceBlock {
            index: label.trim().to_string(),
            timestamp: Timestamp::new(timestamp.trim()),
            lines: std::iter::once(first)
                .chain(rest)
                .map(|line| line.trim().to_string())
                .collect(),
        }),
        [_, _] => Err(ReflowError::MalformedBlock {
            block: position,
            reason: "expected at least one text line after the timestamp".to_string(),
        }),
        _ => Err(ReflowError::MalformedBlock {
            block: position,
            reason: "expected a label line followed by a timestamp line".to_string(),
        }),
    }
}

/// Render one block: label, timestamp, text lines, then a blank line.
pub fn format_block(block: &TargetBlock) -> String {
    let mut output = String::new();
    output.push_str(&block.index);
    output.push('\n');
    output.push_str(block.timestamp.as_str());
    output.push('\n');
    for line in &block.lines {
        output.push_str(line);
        output.push('\n');
    }
    output.push('\n');
    output
}

/// Render all blocks in order.
pub fn format_blocks(blocks: &[TargetBlock]) -> String {
    blocks.iter().map(format_block).collect()
}

/// Read and parse a subtitle file.
///
/// # Errors
///
/// - [`ReflowError::FileOpen`] if the file cannot be read as UTF-8 text.
/// - Plus any errors from [`parse_blocks`].
pub fn read_blocks<P: AsRef<Path>>(path: P) -> Result<Vec<SourceBlock>, ReflowError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ReflowError::FileOpen {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_blocks(&content)
}

/// Write blocks to `path`.
///
/// # Errors
///
/// - [`ReflowError::OutputExists`] if `path` exists and `overwrite` is
///   false.
/// - [`ReflowError::IoError`] if writing fails.
pub fn write_blocks<P: AsRef<Path>>(
    path: P,
    blocks: &[TargetBlock],
    overwrite: bool,
) -> Result<(), ReflowError> {
    let path = path.as_ref();
    if path.exists() && !overwrite {
        return Err(ReflowError::OutputExists {
            path: path.to_path_buf(),
        });
    }
    fs::write(path, format_blocks(blocks))?;
    Ok(())
}

/// The first subtitle file in `directory`, by file name.
///
/// # Errors
///
/// Returns [`ReflowError::IoError`] if the directory cannot be listed.
pub fn find_subtitle_file<P: AsRef<Path>>(directory: P) -> Result<Option<PathBuf>, ReflowError> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(directory)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|extension| extension.eq_ignore_ascii_case(SUBTITLE_EXTENSION))
        })
        .collect();
    candidates.sort();
    Ok(candidates.into_iter().next())
}

/// Default output path: `input` with its extension replaced by
/// `<language>.srt`, e.g. `movie.srt` → `movie.fr.srt`.
pub fn translated_path(input: &Path, target_language: &str) -> PathBuf {
    input.with_extension(format!(
        "{}.{SUBTITLE_EXTENSION}",
        target_language.to_lowercase()
    ))
}
