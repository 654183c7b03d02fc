use std::io::BufRead;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use facecam_core::detection::domain::detector_selection::DetectorSelection;
use facecam_core::pipeline::configuration_controller::{ControlError, ControlHandle};
use facecam_core::shared::constants::RELATIVE_FACE_SIZE_PRESETS;

/// A line typed on stdin while the stream runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    FaceSize(f64),
    Toggle,
    Select(DetectorSelection),
    Quit,
}

/// Percent presets (`50`, `40%`, ...), `t`/`toggle`, a detector key, or
/// `q`/`quit`. Anything else is `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim().to_lowercase();
    match line.as_str() {
        "" => None,
        "t" | "toggle" => Some(Command::Toggle),
        "q" | "quit" => Some(Command::Quit),
        other => preset(other)
            .map(Command::FaceSize)
            .or_else(|| DetectorSelection::from_str(other).ok().map(Command::Select)),
    }
}

fn preset(text: &str) -> Option<f64> {
    let percent: u32 = text.trim_end_matches('%').parse().ok()?;
    RELATIVE_FACE_SIZE_PRESETS
        .into_iter()
        .find(|p| (p * 100.0).round() as u32 == percent)
}

fn dispatch(command: Command, handle: &ControlHandle) -> Result<(), ControlError> {
    match command {
        Command::FaceSize(relative) => handle.set_relative_face_size(relative),
        Command::Toggle => handle.toggle_detector(),
        Command::Select(selection) => handle.set_detector_selection(selection),
        Command::Quit => Ok(()),
    }
}

/// Forwards commands read from `input` to the processor until input ends,
/// `quit` is read, or the processor goes away.
pub fn spawn_command_reader<R>(input: R, handle: ControlHandle, cancelled: Arc<AtomicBool>) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || read_commands(input, &handle, &cancelled))
}

fn read_commands<R: BufRead>(input: R, handle: &ControlHandle, cancelled: &AtomicBool) {
    for line in input.lines() {
        let Ok(line) = line else { break };
        let Some(command) = parse_command(&line) else {
            if !line.trim().is_empty() {
                log::warn!("Unknown command '{}'", line.trim());
            }
            continue;
        };
        if command == Command::Quit {
            cancelled.store(true, Ordering::Relaxed);
            break;
        }
        match dispatch(command, handle) {
            Ok(()) => log::debug!("Queued {command:?}"),
            Err(ControlError::Disconnected) => break,
            Err(e) => log::warn!("{e}"),
        }
    }
}
