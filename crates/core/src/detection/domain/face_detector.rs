use thiserror::Error;

use crate::shared::frame::LumaImage;
use crate::shared::region::FaceRegion;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectionError {
    #[error("cannot detect on an empty {width}x{height} image")]
    EmptyImage { width: u32, height: u32 },
    #[error("unsupported frame layout: {0} channels")]
    UnsupportedChannels(u8),
}

/// Domain interface for face detection on a luminance image.
///
/// Implementations may be stateful (e.g., tracking across frames),
/// hence `&mut self`.
pub trait FaceDetector {
    /// Minimum face size in pixels; smaller candidates are discarded from
    /// the next `detect` on.
    fn configure(&mut self, min_face_size: u32);

    /// Returns the faces found in `image`. No faces is `Ok(vec![])`.
    fn detect(&mut self, image: &LumaImage) -> Result<Vec<FaceRegion>, DetectionError>;
}

/// A detector that carries face tracks between frames and must be started
/// before it reports anything.
pub trait TrackingFaceDetector: FaceDetector {
    /// Begins tracking with an empty history. No-op when already started.
    fn start(&mut self);

    /// Stops tracking and discards all track history.
    fn stop(&mut self);

    fn is_started(&self) -> bool;
}

/// Rejects images a detector cannot search.
pub fn ensure_searchable(image: &LumaImage) -> Result<(), DetectionError> {
    if image.is_empty() {
        return Err(DetectionError::EmptyImage {
            width: image.width(),
            height: image.height(),
        });
    }
    Ok(())
}
