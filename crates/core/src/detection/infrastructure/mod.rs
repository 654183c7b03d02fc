pub mod detector_factory;
pub mod face_tracker;
pub mod rustface_engine;
pub mod scale_space_detector;
pub mod tracking_detector;
