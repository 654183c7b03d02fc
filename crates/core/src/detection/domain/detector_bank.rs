use super::detector_selection::DetectorSelection;
use super::face_detector::{DetectionError, FaceDetector, TrackingFaceDetector};
use crate::shared::frame::LumaImage;
use crate::shared::region::FaceRegion;

/// The two interchangeable detectors the frame processor switches between.
///
/// Either slot may be empty when its detector could not be built; frames
/// routed to an empty slot are reported as a configuration error.
#[derive(Default)]
pub struct DetectorBank {
    scale_space: Option<Box<dyn FaceDetector>>,
    tracking: Option<Box<dyn TrackingFaceDetector>>,
}

impl DetectorBank {
    pub fn new(
        scale_space: Option<Box<dyn FaceDetector>>,
        tracking: Option<Box<dyn TrackingFaceDetector>>,
    ) -> Self {
        Self {
            scale_space,
            tracking,
        }
    }

    /// Pushes the minimum face size into the detector for `selection`.
    /// Returns false when that slot is empty.
    pub fn configure(&mut self, selection: DetectorSelection, min_face_size: u32) -> bool {
        match selection {
            DetectorSelection::ScaleSpace => self.scale_space.as_mut().map(|d| d.configure(min_face_size)),
            DetectorSelection::Tracking => self.tracking.as_mut().map(|d| d.configure(min_face_size)),
        }
        .is_some()
    }

    /// Runs the detector for `selection`, or `None` when that slot is empty.
    pub fn detect(
        &mut self,
        selection: DetectorSelection,
        image: &LumaImage,
    ) -> Option<Result<Vec<FaceRegion>, DetectionError>> {
        match selection {
            DetectorSelection::ScaleSpace => self.scale_space.as_mut().map(|d| d.detect(image)),
            DetectorSelection::Tracking => self.tracking.as_mut().map(|d| d.detect(image)),
        }
    }

    pub fn tracking(&mut self) -> Option<&mut (dyn TrackingFaceDetector + 'static)> {
        self.tracking.as_deref_mut()
    }

    pub fn is_tracking_started(&self) -> bool {
        self.tracking.as_ref().is_some_and(|t| t.is_started())
    }

    pub fn has(&self, selection: DetectorSelection) -> bool {
        match selection {
            DetectorSelection::ScaleSpace => self.scale_space.is_some(),
            DetectorSelection::Tracking => self.tracking.is_some(),
        }
    }
}
