mod commands;
mod settings;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use facecam_core::detection::domain::detector_selection::DetectorSelection;
use facecam_core::detection::infrastructure::detector_factory::build_detectors;
use facecam_core::detection::infrastructure::rustface_engine::RustfaceLoader;
use facecam_core::pipeline::configuration_controller::control_channel;
use facecam_core::pipeline::frame_processor::FrameProcessor;
use facecam_core::pipeline::pipeline_logger::FrameBudgetLogger;
use facecam_core::pipeline::stream_runner::StreamRunner;
use facecam_core::shared::constants::RELATIVE_FACE_SIZE_PRESETS;
use facecam_core::shared::model_stager::ModelStager;
use facecam_core::video::infrastructure::directory_permission_gate::DirectoryPermissionGate;
use facecam_core::video::infrastructure::image_file_sink::ImageFileSink;
use facecam_core::video::infrastructure::image_sequence_source::ImageSequenceSource;

use settings::Settings;

/// Live face detection over a stream of camera frames.
///
/// Frames are read from a directory of images in name order and the
/// annotated frames are written to the output directory.
#[derive(Parser)]
#[command(name = "facecam")]
struct Cli {
    /// Directory of input frames.
    input: PathBuf,

    /// Directory annotated frames are written to.
    output: PathBuf,

    /// SeetaFace cascade model file.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Minimum face size in percent of frame height: 50, 40, 30 or 20.
    #[arg(long)]
    face_size: Option<u32>,

    /// Detector to start with: scale-space or tracking.
    #[arg(long)]
    detector: Option<String>,

    /// Read live commands from stdin (50/40/30/20, t, tracking, scale-space, q).
    #[arg(long)]
    stdin_commands: bool,

    /// Per-frame time budget in milliseconds for the summary.
    #[arg(long)]
    frame_budget_ms: Option<f64>,

    /// Store the effective options as defaults for later runs.
    #[arg(long)]
    save_settings: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = merge(Settings::load(), &cli);
    validate(&cli, &settings)?;

    if cli.save_settings {
        let path = settings.save()?;
        log::info!("Saved settings to {}", path.display());
    }

    let selection: DetectorSelection = settings.detector.parse()?;
    let model_path = settings
        .model_path
        .as_ref()
        .ok_or("No cascade model configured; pass --model")?;
    let model = File::open(model_path)
        .map_err(|e| format!("Cannot open model {}: {e}", model_path.display()))?;

    let detectors = build_detectors(
        BufReader::new(model),
        &ModelStager::in_cache_dir()?,
        &RustfaceLoader,
        0,
    )?;
    let (handle, controller) = control_channel(settings.relative_face_size(), selection)?;
    let mut processor = FrameProcessor::new(detectors, controller)
        .with_logger(Box::new(FrameBudgetLogger::new(settings.frame_budget_ms)));

    let runner = StreamRunner::default();
    if cli.stdin_commands {
        let stdin = BufReader::new(std::io::stdin());
        commands::spawn_command_reader(stdin, handle, runner.cancel_flag());
        log::info!("Reading commands from stdin");
    } else {
        drop(handle);
    }

    let summary = runner.run(
        &DirectoryPermissionGate::new(&cli.input),
        &mut ImageSequenceSource::new(&cli.input),
        &mut processor,
        &mut ImageFileSink::new(&cli.output),
    )?;

    if !summary.authorized {
        return Err(format!("Cannot read frames from {}", cli.input.display()).into());
    }
    log::info!(
        "Processed {} frames ({} skipped, {} with errors), {} faces found",
        summary.frames_processed,
        summary.frames_skipped,
        summary.frames_with_errors,
        summary.faces_detected
    );
    Ok(())
}

/// Command-line flags override persisted settings.
fn merge(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(percent) = cli.face_size {
        settings.face_size_percent = percent;
    }
    if let Some(detector) = &cli.detector {
        settings.detector = detector.clone();
    }
    if let Some(budget) = cli.frame_budget_ms {
        settings.frame_budget_ms = budget;
    }
    if let Some(model) = &cli.model {
        settings.model_path = Some(model.clone());
    }
    settings
}

fn validate(cli: &Cli, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.is_dir() {
        return Err(format!("Input directory not found: {}", cli.input.display()).into());
    }
    let presets: Vec<u32> = RELATIVE_FACE_SIZE_PRESETS
        .iter()
        .map(|p| (p * 100.0).round() as u32)
        .collect();
    if !presets.contains(&settings.face_size_percent) {
        return Err(format!(
            "Face size must be one of {presets:?} percent, got {}",
            settings.face_size_percent
        )
        .into());
    }
    settings.detector.parse::<DetectorSelection>()?;
    if !(settings.frame_budget_ms.is_finite() && settings.frame_budget_ms > 0.0) {
        return Err(format!(
            "Frame budget must be a positive number of milliseconds, got {}",
            settings.frame_budget_ms
        )
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("facecam").chain(args.iter().copied()))
    }

    #[test]
    fn test_flags_override_settings() {
        let c = cli(&["in", "out", "--face-size", "40", "--detector", "tracking", "--model", "m.bin"]);
        let s = merge(Settings::default(), &c);

        assert_eq!(s.face_size_percent, 40);
        assert_eq!(s.detector, "tracking");
        assert_eq!(s.model_path, Some(PathBuf::from("m.bin")));
    }

    #[test]
    fn test_settings_kept_without_flags() {
        let stored = Settings {
            face_size_percent: 30,
            ..Settings::default()
        };
        assert_eq!(merge(stored.clone(), &cli(&["in", "out"])), stored);
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let tmp = TempDir::new().unwrap();
        let c = cli(&[tmp.path().to_str().unwrap(), "out"]);
        assert!(validate(&c, &Settings::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let tmp = TempDir::new().unwrap();
        let c = cli(&[tmp.path().to_str().unwrap(), "out"]);

        let odd_size = Settings {
            face_size_percent: 25,
            ..Settings::default()
        };
        assert!(validate(&c, &odd_size).is_err());

        let bad_detector = Settings {
            detector: "haar".into(),
            ..Settings::default()
        };
        assert!(validate(&c, &bad_detector).is_err());

        let bad_budget = Settings {
            frame_budget_ms: 0.0,
            ..Settings::default()
        };
        assert!(validate(&c, &bad_budget).is_err());
    }

    #[test]
    fn test_validate_rejects_missing_input() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        let c = cli(&[missing.to_str().unwrap(), "out"]);
        assert!(validate(&c, &Settings::default()).is_err());
    }
}
