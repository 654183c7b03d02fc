use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::detection::domain::cascade_engine::{
    CascadeEngine, EngineError, EngineLoader, SearchParams,
};
use crate::shared::frame::LumaImage;
use crate::shared::region::FaceRegion;

/// Smallest face the SeetaFace funnel cascade accepts.
const MIN_ENGINE_FACE_SIZE: u32 = 20;
const SCORE_THRESHOLD: f64 = 2.0;
const SLIDE_WINDOW_STEP: u32 = 4;

/// [`CascadeEngine`] backed by the `rustface` SeetaFace detector.
///
/// rustface merges overlapping windows internally, so `min_neighbors` has
/// no effect here.
pub struct RustfaceEngine {
    detector: Box<dyn rustface::Detector>,
}

impl RustfaceEngine {
    pub fn new(model: rustface::Model) -> Self {
        let mut detector = rustface::create_detector_with_model(model);
        detector.set_score_thresh(SCORE_THRESHOLD);
        detector.set_slide_window_step(SLIDE_WINDOW_STEP, SLIDE_WINDOW_STEP);
        Self { detector }
    }
}

/// rustface expects a shrink factor in (0.01, 0.99) between pyramid levels.
fn pyramid_factor(scale_factor: f64) -> f32 {
    if scale_factor <= 1.0 {
        return 0.8;
    }
    ((1.0 / scale_factor) as f32).clamp(0.02, 0.98)
}

impl CascadeEngine for RustfaceEngine {
    fn detect_multi_scale(&mut self, image: &LumaImage, params: &SearchParams) -> Vec<FaceRegion> {
        let min_size = params.min_face_size.max(MIN_ENGINE_FACE_SIZE);
        if image.width() < min_size || image.height() < min_size {
            return Vec::new();
        }
        self.detector.set_min_face_size(min_size);
        self.detector
            .set_pyramid_scale_factor(pyramid_factor(params.scale_factor));

        let data = rustface::ImageData::new(image.data(), image.width(), image.height());
        self.detector
            .detect(&data)
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                FaceRegion::new(bbox.x(), bbox.y(), bbox.width() as i32, bbox.height() as i32)
                    .clip_to(image.width(), image.height())
            })
            .collect()
    }
}

/// Reads a SeetaFace model file into a fresh engine per call.
pub struct RustfaceLoader;

impl EngineLoader for RustfaceLoader {
    fn load(&self, model_path: &Path) -> Result<Box<dyn CascadeEngine>, EngineError> {
        let load_error = |source| EngineError::Load {
            path: model_path.display().to_string(),
            source,
        };
        let file = File::open(model_path).map_err(load_error)?;
        if file.metadata().map_err(load_error)?.len() == 0 {
            return Err(EngineError::EmptyModel(model_path.display().to_string()));
        }
        let model = rustface::read_model(BufReader::new(file)).map_err(load_error)?;
        log::info!("Loaded cascade model from {}", model_path.display());
        Ok(Box::new(RustfaceEngine::new(model)))
    }
}
