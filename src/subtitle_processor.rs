use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AppError, FormatError};
use crate::file_utils::FileManager;
use crate::text_transform::TextTransform;
use crate::time_utils;

// @module: Cue model and SRT reading/writing

// @const: SRT time-range regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+):(\d+):(\d+),(\d+) --> (\d+):(\d+):(\d+),(\d+)").unwrap()
});

// @struct: Single subtitle cue
#[derive(Debug, Clone)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in seconds
    pub start_secs: f64,

    // @field: End time in seconds
    pub end_secs: f64,

    // @field: Subtitle text
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_secs: f64, end_secs: f64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_secs,
            end_secs,
            text,
        }
    }

    // @returns: Cue length in seconds
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        time_utils::seconds_to_clock(self.start_secs)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        time_utils::seconds_to_clock(self.end_secs)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Collection of subtitle cues in chronological order
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create an empty subtitle collection
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
        }
    }

    /// Read and parse an SRT file
    pub fn from_srt_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let entries = Self::parse_srt_string(&content)?;

        debug!("Parsed {} subtitle entries from {:?}", entries.len(), path);

        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            entries,
        })
    }

    /// Parse SRT format string into subtitle entries.
    ///
    /// Each block is an index line, a time-range line and one text line,
    /// separated by blank lines. Only the first text line of a block is kept;
    /// multi-line cue text is not supported.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>, FormatError> {
        // SRT files frequently arrive with a BOM and Windows line endings
        let content = content.trim_start_matches('\u{feff}').replace("\r\n", "\n");

        fn finish_block(
            block: &[&str],
            start_line: usize,
            entries: &mut Vec<SubtitleEntry>,
        ) -> Result<(), FormatError> {
            if block.is_empty() {
                return Ok(());
            }

            // index line, time-range line, one text line
            if block.len() < 3 {
                return Err(FormatError::TruncatedBlock { line: start_line });
            }

            let time_line = block[1];
            let caps = TIMESTAMP_REGEX.captures(time_line).ok_or_else(|| {
                FormatError::BadTimeRange {
                    line: start_line + 1,
                    content: time_line.to_string(),
                }
            })?;

            let start_secs = SubtitleCollection::captured_clock_to_seconds(&caps, 1);
            let end_secs = SubtitleCollection::captured_clock_to_seconds(&caps, 5);

            if block.len() > 3 {
                warn!(
                    "Cue block at line {} has {} text lines; keeping the first",
                    start_line,
                    block.len() - 2
                );
            }

            entries.push(SubtitleEntry::new(
                entries.len() + 1,
                start_secs,
                end_secs,
                block[2].to_string(),
            ));

            Ok(())
        }

        let mut entries = Vec::new();
        let mut block: Vec<&str> = Vec::new();
        let mut block_start_line = 1;

        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                finish_block(&block, block_start_line, &mut entries)?;
                block.clear();
                block_start_line = idx + 2;
            } else {
                block.push(line);
            }
        }
        finish_block(&block, block_start_line, &mut entries)?;

        Ok(entries)
    }

    /// Serialize all entries to SRT text with regenerated 1-based indices
    pub fn to_srt_string(&self) -> String {
        let mut output = String::new();

        for (i, entry) in self.entries.iter().enumerate() {
            let numbered = SubtitleEntry {
                seq_num: i + 1,
                ..entry.clone()
            };
            output.push_str(&numbered.to_string());
        }

        output
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<(), AppError> {
        FileManager::write_atomic(path, &self.to_srt_string())
            .map_err(|e| AppError::File(e.to_string()))
    }

    /// Shift every cue by the same signed amount, in seconds.
    ///
    /// Times are not clamped at zero; a large negative offset produces
    /// negative timestamps.
    pub fn shift_by(&mut self, offset_secs: f64) {
        for entry in &mut self.entries {
            entry.start_secs += offset_secs;
            entry.end_secs += offset_secs;
        }
    }

    /// Apply a text transform to every cue
    pub fn apply_transform(&mut self, transform: &TextTransform) {
        if transform.is_identity() {
            return;
        }

        for entry in &mut self.entries {
            entry.text = transform.apply(&entry.text);
        }
    }

    /// Combine regex clock captures starting at `start_idx` into seconds
    fn captured_clock_to_seconds(caps: &regex::Captures, start_idx: usize) -> f64 {
        let component = |idx: usize| -> u64 {
            caps.get(start_idx + idx)
                .map_or(0, |m| m.as_str().parse().unwrap_or(0))
        };

        time_utils::clock_to_seconds(component(0), component(1), component(2), component(3))
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
