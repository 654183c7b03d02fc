use std::path::Path;

use thiserror::Error;

use crate::shared::frame::LumaImage;
use crate::shared::region::FaceRegion;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to load cascade model from {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cascade model {0} is empty")]
    EmptyModel(String),
}

/// Parameters of one multi-scale search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchParams {
    /// Size ratio between consecutive pyramid levels (> 1).
    pub scale_factor: f64,
    pub min_neighbors: u32,
    /// Smallest face side, in pixels, worth searching for.
    pub min_face_size: u32,
}

/// The detection-model provider: runs the cascade over an image.
///
/// Overlapping-window merging is the engine's business; callers take the
/// returned regions as final.
pub trait CascadeEngine {
    fn detect_multi_scale(&mut self, image: &LumaImage, params: &SearchParams) -> Vec<FaceRegion>;
}

/// Builds engines from a staged model file.
///
/// Each call opens the file independently, so the file may be removed once
/// every engine has been built.
pub trait EngineLoader {
    fn load(&self, model_path: &Path) -> Result<Box<dyn CascadeEngine>, EngineError>;
}
