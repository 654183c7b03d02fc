use crossbeam_channel::{Receiver, Sender, TryRecvError};
use thiserror::Error;

use crate::detection::domain::detector_bank::DetectorBank;
use crate::detection::domain::detector_selection::DetectorSelection;

use super::face_size_threshold::{FaceSizeThreshold, InvalidFaceSize};

/// A configuration change sent from a control thread.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlCommand {
    SetRelativeFaceSize(f64),
    SetDetectorSelection(DetectorSelection),
    ToggleDetector,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    #[error(transparent)]
    InvalidFaceSize(#[from] InvalidFaceSize),
    #[error("frame processor is gone")]
    Disconnected,
}

/// Sending half of the configuration channel. Cheap to clone and safe to
/// move to any thread.
#[derive(Clone, Debug)]
pub struct ControlHandle {
    tx: Sender<ControlCommand>,
}

impl ControlHandle {
    /// Validated here so bad input is rejected on the caller's thread.
    pub fn set_relative_face_size(&self, relative: f64) -> Result<(), ControlError> {
        FaceSizeThreshold::new(relative)?;
        self.send(ControlCommand::SetRelativeFaceSize(relative))
    }

    pub fn set_detector_selection(&self, selection: DetectorSelection) -> Result<(), ControlError> {
        self.send(ControlCommand::SetDetectorSelection(selection))
    }

    pub fn toggle_detector(&self) -> Result<(), ControlError> {
        self.send(ControlCommand::ToggleDetector)
    }

    pub fn send(&self, command: ControlCommand) -> Result<(), ControlError> {
        self.tx.send(command).map_err(|_| ControlError::Disconnected)
    }
}

/// Owns the face-size threshold and the detector selection, and keeps the
/// tracking detector's started/stopped state in step with the selection.
///
/// Lives on the processing thread. Commands from other threads arrive via
/// [`ControlHandle`] and are applied by [`apply_pending`](Self::apply_pending).
pub struct ConfigurationController {
    threshold: FaceSizeThreshold,
    selection: DetectorSelection,
    inbox: Receiver<ControlCommand>,
    inbox_open: bool,
}

/// Creates a controller and the handle that feeds it.
pub fn control_channel(
    relative_face_size: f64,
    selection: DetectorSelection,
) -> Result<(ControlHandle, ConfigurationController), InvalidFaceSize> {
    let threshold = FaceSizeThreshold::new(relative_face_size)?;
    let (tx, rx) = crossbeam_channel::unbounded();
    Ok((
        ControlHandle { tx },
        ConfigurationController {
            threshold,
            selection,
            inbox: rx,
            inbox_open: true,
        },
    ))
}

impl ConfigurationController {
    pub fn selection(&self) -> DetectorSelection {
        self.selection
    }

    pub fn threshold(&self) -> &FaceSizeThreshold {
        &self.threshold
    }

    pub fn threshold_mut(&mut self) -> &mut FaceSizeThreshold {
        &mut self.threshold
    }

    pub fn set_relative_face_size(&mut self, relative: f64) -> Result<(), InvalidFaceSize> {
        self.threshold.set_relative(relative)?;
        log::info!("Relative face size set to {:.0}%", relative * 100.0);
        Ok(())
    }

    /// Switches detectors. The outgoing tracker is stopped before the
    /// incoming one is started, both within this call. No-op when unchanged.
    pub fn set_detector_selection(&mut self, selection: DetectorSelection, detectors: &mut DetectorBank) {
        if selection == self.selection {
            return;
        }
        if self.selection == DetectorSelection::Tracking {
            if let Some(tracker) = detectors.tracking() {
                tracker.stop();
            }
        }
        self.selection = selection;
        if selection == DetectorSelection::Tracking {
            if let Some(tracker) = detectors.tracking() {
                tracker.start();
            }
        }
        log::info!("{selection} detector enabled");
    }

    pub fn toggle_detector(&mut self, detectors: &mut DetectorBank) {
        self.set_detector_selection(self.selection.next(), detectors);
    }

    /// Brings the tracker's lifecycle in line with the current selection.
    /// Called once when the processor takes ownership of the detectors.
    pub fn sync_lifecycle(&self, detectors: &mut DetectorBank) {
        if let Some(tracker) = detectors.tracking() {
            match self.selection {
                DetectorSelection::Tracking => tracker.start(),
                DetectorSelection::ScaleSpace => tracker.stop(),
            }
        }
    }

    /// Applies every queued command in arrival order; returns how many.
    pub fn apply_pending(&mut self, detectors: &mut DetectorBank) -> usize {
        let mut applied = 0;
        while self.inbox_open {
            match self.inbox.try_recv() {
                Ok(command) => {
                    self.apply(command, detectors);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::debug!("All control handles dropped");
                    self.inbox_open = false;
                }
            }
        }
        applied
    }

    fn apply(&mut self, command: ControlCommand, detectors: &mut DetectorBank) {
        match command {
            ControlCommand::SetRelativeFaceSize(relative) => {
                if let Err(e) = self.set_relative_face_size(relative) {
                    log::warn!("Ignoring command: {e}");
                }
            }
            ControlCommand::SetDetectorSelection(selection) => {
                self.set_detector_selection(selection, detectors)
            }
            ControlCommand::ToggleDetector => self.toggle_detector(detectors),
        }
    }
}
