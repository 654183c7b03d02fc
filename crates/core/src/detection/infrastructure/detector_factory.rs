use std::io::Read;

use thiserror::Error;

use crate::detection::domain::cascade_engine::{EngineError, EngineLoader};
use crate::detection::domain::detector_bank::DetectorBank;
use crate::shared::constants::CASCADE_MODEL_NAME;
use crate::shared::model_stager::{ModelStageError, ModelStager};

use super::scale_space_detector::ScaleSpaceDetector;
use super::tracking_detector::TrackingDetector;

#[derive(Error, Debug)]
pub enum DetectorBuildError {
    #[error(transparent)]
    Stage(#[from] ModelStageError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Stages `resource`, builds both detectors from the staged file, then
/// removes the staging directory on every exit path.
///
/// `initial_min_face_size` seeds the tracking detector until the frame
/// processor configures it.
pub fn build_detectors<R: Read>(
    resource: R,
    stager: &ModelStager,
    loader: &dyn EngineLoader,
    initial_min_face_size: u32,
) -> Result<DetectorBank, DetectorBuildError> {
    let artifact = stager.stage(resource, CASCADE_MODEL_NAME)?;

    let built = loader.load(artifact.path()).and_then(|scale_engine| {
        let tracking_engine = loader.load(artifact.path())?;
        Ok((scale_engine, tracking_engine))
    });
    artifact.release();

    let (scale_engine, tracking_engine) = built?;
    log::info!("Built scale-space and tracking detectors");
    Ok(DetectorBank::new(
        Some(Box::new(ScaleSpaceDetector::new(scale_engine))),
        Some(Box::new(TrackingDetector::new(
            tracking_engine,
            initial_min_face_size,
        ))),
    ))
}
