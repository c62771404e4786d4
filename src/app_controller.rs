use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::subtitle_processor::SubtitleCollection;
use crate::text_transform::TextTransform;
use crate::timeline_processor;

// @module: Application controller for subtitle conversion

/// The two file formats the converter reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    /// SubRip sequential subtitles (`.srt`)
    Srt,
    /// Final Cut Pro XML timeline (`.fcpxml`)
    Fcpxml,
}

impl SubtitleFormat {
    /// Detect a format from a path's suffix, case-insensitively
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());

        match extension.as_deref() {
            Some("srt") => Ok(SubtitleFormat::Srt),
            Some("fcpxml") => Ok(SubtitleFormat::Fcpxml),
            _ => Err(AppError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Main application controller for subtitle conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self { config })
    }

    // @returns: Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the conversion pipeline end to end.
    ///
    /// Reads the input into the cue list, applies the optional global offset
    /// and the text transform, then writes the output format. Both suffixes
    /// are checked up front so an unsupported path fails before anything is
    /// read or written.
    pub fn run(
        &self,
        input: &Path,
        output: &Path,
        transform: &TextTransform,
        offset_secs: Option<f64>,
    ) -> Result<(), AppError> {
        let start_time = std::time::Instant::now();

        let input_format = SubtitleFormat::from_path(input)?;
        let output_format = SubtitleFormat::from_path(output)?;

        if !FileManager::file_exists(input) {
            return Err(AppError::File(format!(
                "Input file does not exist: {:?}",
                input
            )));
        }

        info!("Converting {:?} -> {:?}", input, output);

        let mut collection = match input_format {
            SubtitleFormat::Srt => SubtitleCollection::from_srt_file(input)?,
            SubtitleFormat::Fcpxml => {
                let entries = timeline_processor::read_timeline_file(input)?;
                let mut collection = SubtitleCollection::new(input.to_path_buf());
                collection.entries = entries;
                collection
            }
        };

        debug!("Read {} cues", collection.entries.len());

        if let Some(offset) = offset_secs {
            // the shift is applied as-is; a negative offset may push cue
            // times below zero
            info!("Shifting all cues by {:+.3}s", offset);
            collection.shift_by(offset);
        }

        if !transform.is_identity() {
            debug!("Applying text transform '{}'", transform.name());
        }
        collection.apply_transform(transform);

        match output_format {
            SubtitleFormat::Srt => collection.write_to_srt(output)?,
            SubtitleFormat::Fcpxml => {
                let event_name = Self::derive_event_name(input);
                let template_path = Path::new(&self.config.template);
                let template_xml = fs::read_to_string(template_path).map_err(|e| {
                    AppError::File(format!(
                        "Failed to read template {:?}: {}",
                        template_path, e
                    ))
                })?;

                let xml = timeline_processor::render_timeline(
                    &template_xml,
                    &collection.entries,
                    &event_name,
                    self.config.framerate,
                )?;

                FileManager::write_atomic(output, &xml)
                    .map_err(|e| AppError::File(e.to_string()))?;
            }
        }

        info!(
            "Wrote {} cues to {:?} in {:.1}ms",
            collection.entries.len(),
            output,
            start_time.elapsed().as_secs_f64() * 1000.0
        );

        Ok(())
    }

    /// Default event name: the input file name with its suffix stripped
    fn derive_event_name(input: &Path) -> String {
        input
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string())
    }
}
