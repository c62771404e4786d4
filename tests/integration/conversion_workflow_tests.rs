/*!
 * End-to-end conversion tests driving the controller
 */

use anyhow::Result;
use subspine::app_config::Config;
use subspine::app_controller::Controller;
use subspine::errors::{AppError, ConfigError};
use subspine::file_utils::FileManager;
use subspine::subtitle_processor::SubtitleCollection;
use subspine::text_transform::TextTransform;
use crate::common;

/// Controller wired to a 10fps template inside the given directory
fn controller_with_template(dir: &std::path::Path, frame_duration: &str) -> Result<Controller> {
    let template_path =
        common::create_test_file(dir, "Template.xml", &common::template_xml(frame_duration))?;

    let config = Config {
        template: template_path.to_string_lossy().to_string(),
        framerate: 10.0,
        ..Config::default()
    };

    Ok(Controller::with_config(config)?)
}

/// Test SRT to fcpxml to SRT reproduces text exactly and times within a tick
#[test]
fn test_conversion_withSrtTimelineSrtRoundTrip_shouldPreserveCues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = controller_with_template(temp_dir.path(), "1/10s")?;

    let srt_in = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;
    let fcpxml_path = temp_dir.path().join("episode.fcpxml");
    let srt_out = temp_dir.path().join("roundtrip.srt");

    controller.run(&srt_in, &fcpxml_path, &TextTransform::identity(), None)?;
    controller.run(&fcpxml_path, &srt_out, &TextTransform::identity(), None)?;

    let original = SubtitleCollection::from_srt_file(&srt_in)?;
    let round_tripped = SubtitleCollection::from_srt_file(&srt_out)?;

    assert_eq!(original.entries.len(), round_tripped.entries.len());
    for (a, b) in original.entries.iter().zip(&round_tripped.entries) {
        // one 1/10s tick is the worst case the frame grid allows
        assert!((a.start_secs - b.start_secs).abs() < 0.1);
        assert!((a.end_secs - b.end_secs).abs() < 0.1);
        assert_eq!(a.text, b.text);
    }

    Ok(())
}

/// Test the generated fcpxml names the project after the input file
#[test]
fn test_conversion_withSrtInput_shouldDeriveEventName() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = controller_with_template(temp_dir.path(), "1/10s")?;

    let srt_in = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;
    let fcpxml_path = temp_dir.path().join("out.fcpxml");

    controller.run(&srt_in, &fcpxml_path, &TextTransform::identity(), None)?;

    let xml = FileManager::read_to_string(&fcpxml_path)?;
    assert!(xml.contains(r#"<project name="episode""#));
    assert!(xml.contains(r#"<event name="CC_XML""#));

    Ok(())
}

/// Test an unsupported input suffix fails before the output exists
#[test]
fn test_conversion_withUnsupportedInputSuffix_shouldFailEarly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = controller_with_template(temp_dir.path(), "1/10s")?;

    let txt_in = common::create_test_file(temp_dir.path(), "episode.txt", "not a subtitle")?;
    let srt_out = temp_dir.path().join("out.srt");

    let err = controller
        .run(&txt_in, &srt_out, &TextTransform::identity(), None)
        .unwrap_err();

    assert!(matches!(err, AppError::UnsupportedFormat(_)));
    assert!(!srt_out.exists());

    Ok(())
}

/// Test an unsupported output suffix fails before the output exists
#[test]
fn test_conversion_withUnsupportedOutputSuffix_shouldFailEarly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = controller_with_template(temp_dir.path(), "1/10s")?;

    let srt_in = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;
    let txt_out = temp_dir.path().join("out.txt");

    let err = controller
        .run(&srt_in, &txt_out, &TextTransform::identity(), None)
        .unwrap_err();

    assert!(matches!(err, AppError::UnsupportedFormat(_)));
    assert!(!txt_out.exists());

    Ok(())
}

/// Test a frame-rate mismatch aborts without writing the output file
#[test]
fn test_conversion_withFramerateMismatch_shouldWriteNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    // template implies 29.97fps, controller expects 24fps
    let template_path = common::create_test_file(
        temp_dir.path(),
        "Template.xml",
        &common::sample_template(),
    )?;
    let config = Config {
        template: template_path.to_string_lossy().to_string(),
        framerate: 24.0,
        ..Config::default()
    };
    let controller = Controller::with_config(config)?;

    let srt_in = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;
    let fcpxml_out = temp_dir.path().join("out.fcpxml");

    let err = controller
        .run(&srt_in, &fcpxml_out, &TextTransform::identity(), None)
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Config(ConfigError::FrameRateMismatch { .. })
    ));
    assert!(!fcpxml_out.exists());

    Ok(())
}

/// Test a global offset shifts every cue in the output
#[test]
fn test_conversion_withOffset_shouldShiftAllCues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = controller_with_template(temp_dir.path(), "1/10s")?;

    let srt_in = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;
    let srt_out = temp_dir.path().join("shifted.srt");

    controller.run(&srt_in, &srt_out, &TextTransform::identity(), Some(2.5))?;

    let original = SubtitleCollection::from_srt_file(&srt_in)?;
    let shifted = SubtitleCollection::from_srt_file(&srt_out)?;

    for (a, b) in original.entries.iter().zip(&shifted.entries) {
        // clock strings truncate to whole milliseconds
        assert!((b.start_secs - a.start_secs - 2.5).abs() < 0.002);
        assert!((b.end_secs - a.end_secs - 2.5).abs() < 0.002);
    }

    Ok(())
}

/// Test an injected transform rewrites the written text in both formats
#[test]
fn test_conversion_withInjectedTransform_shouldRewriteOutputText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = controller_with_template(temp_dir.path(), "1/10s")?;
    let transform = TextTransform::from_fn("upper", |text| text.to_uppercase());

    let srt_in = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;
    let srt_out = temp_dir.path().join("upper.srt");
    let fcpxml_out = temp_dir.path().join("upper.fcpxml");

    controller.run(&srt_in, &srt_out, &transform, None)?;
    controller.run(&srt_in, &fcpxml_out, &transform, None)?;

    let srt_output = FileManager::read_to_string(&srt_out)?;
    assert!(srt_output.contains("THIS IS A TEST SUBTITLE."));

    let xml_output = FileManager::read_to_string(&fcpxml_out)?;
    assert!(xml_output.contains(">THIS IS A TEST SUBTITLE.</text-style>"));
    assert!(xml_output.contains("{1} THIS IS A TEST SUBTITLE."));

    Ok(())
}

/// Test converting a missing input file reports a file error
#[test]
fn test_conversion_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = controller_with_template(temp_dir.path(), "1/10s")?;

    let err = controller
        .run(
            &temp_dir.path().join("absent.srt"),
            &temp_dir.path().join("out.srt"),
            &TextTransform::identity(),
            None,
        )
        .unwrap_err();

    assert!(matches!(err, AppError::File(_)));

    Ok(())
}
