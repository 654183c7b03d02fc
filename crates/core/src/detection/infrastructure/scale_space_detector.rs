use crate::detection::domain::cascade_engine::{CascadeEngine, SearchParams};
use crate::detection::domain::face_detector::{ensure_searchable, DetectionError, FaceDetector};
use crate::shared::constants::{MIN_NEIGHBORS, SCALE_FACTOR};
use crate::shared::frame::LumaImage;
use crate::shared::region::FaceRegion;

/// Stateless detector: every call searches the whole image at all scales.
///
/// Nothing survives between calls except the configured minimum size.
pub struct ScaleSpaceDetector {
    engine: Box<dyn CascadeEngine>,
    params: SearchParams,
}

impl ScaleSpaceDetector {
    pub fn new(engine: Box<dyn CascadeEngine>) -> Self {
        Self {
            engine,
            params: SearchParams {
                scale_factor: SCALE_FACTOR,
                min_neighbors: MIN_NEIGHBORS,
                min_face_size: 0,
            },
        }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }
}

impl FaceDetector for ScaleSpaceDetector {
    fn configure(&mut self, min_face_size: u32) {
        self.params.min_face_size = min_face_size;
    }

    fn detect(&mut self, image: &LumaImage) -> Result<Vec<FaceRegion>, DetectionError> {
        ensure_searchable(image)?;
        let min_size = self.params.min_face_size;
        Ok(self
            .engine
            .detect_multi_scale(image, &self.params)
            .into_iter()
            .filter(|r| !r.is_smaller_than(min_size))
            .collect())
    }
}
